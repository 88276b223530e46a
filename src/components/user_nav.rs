//! Sidebar footer showing the signed-in user's backend profile.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reference consumer of the token + API client pair: asks the session store
//! for a fresh token, calls `/api/user-info`, and renders either the profile
//! (with avatar initials) or the API error's message and status.

#[cfg(test)]
#[path = "user_nav_test.rs"]
mod user_nav_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::net::api::{ApiClient, fetch_user_info};
use crate::net::error::ApiError;
use crate::net::types::User;
use crate::state::session::SessionStore;
#[cfg(feature = "hydrate")]
use crate::state::context::{use_api_client, use_session};
use crate::util::initials::initials;

/// Fetch the profile for whoever the provider currently has signed in.
///
/// # Errors
///
/// 401 without a session (no request is sent), otherwise whatever the API
/// client reports.
pub async fn load_profile(store: &SessionStore, client: &ApiClient) -> Result<User, ApiError> {
    let token = store.get_token().await;
    match &token {
        Some(t) => log::debug!("user-nav: token available (length: {})", t.len()),
        None => log::debug!("user-nav: no token available"),
    }
    fetch_user_info(client, token.as_deref()).await
}

/// Text shown in place of the profile when loading fails.
pub fn profile_error_message(err: &ApiError) -> String {
    format!("Error: {err}")
}

#[component]
pub fn UserNav() -> impl IntoView {
    let profile = RwSignal::new(None::<User>);
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(true);
    let menu_open = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let (session, api) = (use_session(), use_api_client());

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        match load_profile(&session.store(), &api.client()).await {
            Ok(user) => profile.set(Some(user)),
            Err(e) => error.set(Some(profile_error_message(&e))),
        }
        loading.set(false);
    });

    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();
    let on_sign_out = move |_| {
        menu_open.set(false);
        #[cfg(feature = "hydrate")]
        {
            let store = session.store();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match store.sign_out().await {
                    Ok(()) => navigate(crate::util::auth::SIGN_IN_PATH, NavigateOptions::default()),
                    Err(e) => error.set(Some(format!("Sign out failed: {e}"))),
                }
            });
        }
    };

    view! {
        <div class="user-nav">
            {move || {
                if loading.get() {
                    return view! {
                        <div class="user-nav__row user-nav__row--loading">
                            <div class="user-nav__avatar skeleton"></div>
                            <div class="user-nav__text">
                                <div class="skeleton skeleton--line"></div>
                                <div class="skeleton skeleton--line skeleton--short"></div>
                            </div>
                        </div>
                    }
                        .into_any();
                }
                let Some(user) = profile.get() else {
                    return view! {
                        <div class="user-nav__row user-nav__row--error">
                            <div class="user-nav__avatar user-nav__avatar--error">"!"</div>
                            <div class="user-nav__text">
                                <span class="user-nav__name">"Error loading user"</span>
                                <span class="user-nav__email">
                                    {error.get().unwrap_or_else(|| "Unknown error".to_owned())}
                                </span>
                            </div>
                        </div>
                    }
                        .into_any();
                };
                let fallback = initials(&user.name);
                view! {
                    <button class="user-nav__row" on:click=move |_| menu_open.update(|open| *open = !*open)>
                        <span class="user-nav__avatar">
                            {match user.avatar_url.clone() {
                                Some(src) => view! { <img src=src alt=user.name.clone()/> }.into_any(),
                                None => view! { <span>{fallback.clone()}</span> }.into_any(),
                            }}
                        </span>
                        <span class="user-nav__text">
                            <span class="user-nav__name">{user.name.clone()}</span>
                            <span class="user-nav__email">{user.email.clone()}</span>
                        </span>
                    </button>
                }
                    .into_any()
            }}
            <ul class="user-nav__menu" role="menu" hidden=move || !menu_open.get()>
                <li role="menuitem" class="user-nav__item user-nav__item--disabled">"Account"</li>
                <li role="menuitem" class="user-nav__item user-nav__item--disabled">"Billing"</li>
                <li role="menuitem" class="user-nav__item user-nav__item--disabled">"Notifications"</li>
                <li class="user-nav__separator" role="separator"></li>
                <li role="menuitem" class="user-nav__item" on:click=on_sign_out>"Log out"</li>
            </ul>
            <Show when=move || error.get().is_some() && profile.get().is_some()>
                <p class="user-nav__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
        </div>
    }
}
