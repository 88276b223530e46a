//! Shared client-side state.
//!
//! DESIGN
//! ======
//! `session` holds the framework-free session store; `context` provisions it
//! (and the API client) to Leptos components.

pub mod context;
pub mod session;
