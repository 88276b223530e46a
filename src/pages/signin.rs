//! Email + password sign-in page.

#[cfg(test)]
#[path = "signin_test.rs"]
mod signin_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionStore;
use crate::util::validation::validate_sign_in;

/// Where a successful sign-in lands.
pub const AFTER_SIGN_IN_PATH: &str = "/dashboard";

/// Validate the form and ask the provider to sign in.
///
/// # Errors
///
/// Returns the inline message to show: a validation message (the provider is
/// not called) or the provider's own rejection message.
pub async fn submit_sign_in(store: &SessionStore, email: &str, password: &str) -> Result<(), String> {
    let email = validate_sign_in(email, password).map_err(str::to_owned)?;
    store.sign_in(&email, password).await.map_err(|e| e.message)
}

#[component]
pub fn SignInPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let store = crate::state::context::use_session().store();
    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        busy.set(true);
        error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            let (email_value, password_value) = (email.get(), password.get());
            leptos::task::spawn_local(async move {
                match submit_sign_in(&store, &email_value, &password_value).await {
                    Ok(()) => navigate(AFTER_SIGN_IN_PATH, NavigateOptions::default()),
                    Err(message) => {
                        error.set(Some(message));
                        busy.set(false);
                    }
                }
            });
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                <p class="auth-card__subtitle">"Enter your email and password to access your links."</p>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label" for="signin-email">"Email"</label>
                    <input
                        id="signin-email"
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label class="auth-label" for="signin-password">"Password"</label>
                    <input
                        id="signin-password"
                        class="auth-input"
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=move || error.get().is_some()>
                        <p class="auth-message auth-message--error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <p class="auth-card__footer">
                    "Don't have an account? "
                    <a href="/auth/signup">"Sign up"</a>
                </p>
            </div>
        </div>
    }
}
