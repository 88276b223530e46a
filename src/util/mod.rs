//! UI-facing helpers shared by pages and components.

pub mod auth;
pub mod initials;
pub mod validation;
