//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates rendering details
//! to `components`. Form pages expose their submit logic as plain async
//! functions over [`crate::state::session::SessionStore`] so it can be tested
//! without a browser.

pub mod dashboard;
pub mod home;
pub mod signin;
pub mod signup;
