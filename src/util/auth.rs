//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route applies the same decision: wait while the session
//! resolves, send anonymous viewers to sign-in, otherwise render.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::SessionState;

/// Entry point unauthenticated viewers are redirected to.
pub const SIGN_IN_PATH: &str = "/auth/signin";

/// What a protected route should do for a given session state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not resolved yet: show the placeholder only.
    Loading,
    /// Resolved with nobody signed in: navigate to the given path.
    Redirect(&'static str),
    /// Signed in: render the protected content.
    Render,
}

pub fn guard_decision(state: &SessionState) -> GuardDecision {
    if state.is_loading {
        GuardDecision::Loading
    } else if state.user.is_none() {
        GuardDecision::Redirect(SIGN_IN_PATH)
    } else {
        GuardDecision::Render
    }
}

/// Navigate away whenever the guard decides to redirect.
pub fn install_unauth_redirect<F>(state: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if let GuardDecision::Redirect(path) = state.with(guard_decision) {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
