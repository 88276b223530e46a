//! Identity-provider integration.
//!
//! SYSTEM CONTEXT
//! ==============
//! `provider` defines the boundary the session store consumes, `gotrue` is the
//! hosted-provider adapter, and `subscription` supplies the disposer handles
//! used for pushed session changes.

pub mod gotrue;
pub mod provider;
pub mod subscription;
