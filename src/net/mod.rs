//! Networking modules for the backend REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs authenticated requests, `error` defines the single failure
//! type callers see, `http` is the transport seam, and `types` holds the wire
//! schema.

pub mod api;
pub mod error;
pub mod http;
pub mod types;
