//! Dashboard shell: sidebar navigation plus the signed-in user's card.
//!
//! SYSTEM CONTEXT
//! ==============
//! The only authenticated route. Everything below [`ProtectedRoute`] may
//! assume a resolved, non-empty session.

use leptos::prelude::*;

use crate::components::protected_route::ProtectedRoute;
use crate::components::user_nav::UserNav;
use crate::state::context::use_session;

/// Sidebar entries, in display order.
pub const NAV_ITEMS: [&str; 3] = ["Dashboard", "URLs", "Analytics"];

#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <div class="dashboard">
                <aside class="dashboard-sidebar">
                    <a class="dashboard-sidebar__brand" href="/dashboard">
                        <span class="dashboard-sidebar__logo">"⚡"</span>
                        <span>"Shortn"</span>
                    </a>
                    <nav class="dashboard-sidebar__nav">
                        <button class="dashboard-sidebar__create" type="button">"Quick Create Link"</button>
                        <ul>
                            {NAV_ITEMS
                                .iter()
                                .map(|title| view! { <li class="dashboard-sidebar__item">{*title}</li> })
                                .collect_view()}
                        </ul>
                    </nav>
                    <div class="dashboard-sidebar__footer">
                        <UserNav/>
                    </div>
                </aside>
                <main class="dashboard-main">
                    <PageHeader/>
                </main>
            </div>
        </ProtectedRoute>
    }
}

#[component]
fn PageHeader() -> impl IntoView {
    let state = use_session().state();
    let email = move || state.with(|s| s.user.as_ref().map(|u| u.email.clone()).unwrap_or_default());

    view! {
        <header class="page-header">
            <h1>"Dashboard"</h1>
            <span class="page-header__account">{email}</span>
        </header>
    }
}
