//! Route wrapper that withholds protected content until the session resolves.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::context::use_session;
use crate::util::auth::{GuardDecision, guard_decision, install_unauth_redirect};

/// Render `children` only for a signed-in viewer. Shows a neutral placeholder
/// while the session resolves and while redirecting anonymous viewers to
/// sign-in.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let state = use_session().state();
    install_unauth_redirect(state, use_navigate());

    view! {
        <Show
            when=move || state.with(guard_decision) == GuardDecision::Render
            fallback=|| view! { <LoadingPlaceholder/> }
        >
            {children()}
        </Show>
    }
}

#[component]
pub fn LoadingPlaceholder() -> impl IntoView {
    view! {
        <div class="auth-loading" aria-busy="true">
            <div class="auth-loading__spinner"></div>
        </div>
    }
}
