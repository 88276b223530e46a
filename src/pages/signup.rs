//! Account registration page.
//!
//! A provider success is not always a new account: a repeat registration of
//! a known email comes back with an empty identity list, and most setups
//! require email confirmation before a session exists. The form reports each
//! case separately and then moves the visitor on after [`REDIRECT_DELAY_MS`].

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use crate::auth::provider::SignUpOutcome;
use crate::pages::signin::AFTER_SIGN_IN_PATH;
use crate::state::session::SessionStore;
use crate::util::auth::SIGN_IN_PATH;
use crate::util::validation::{FormFeedback, validate_sign_up};

pub const ALREADY_REGISTERED: &str = "An account with this email already exists";
pub const CONFIRMATION_SENT: &str = "Registration successful! Please check your email to confirm your account.";
pub const SIGNED_IN_NOW: &str = "Registration successful! Redirecting to your dashboard...";

pub const REDIRECT_DELAY_MS: u32 = 3_000;

/// Result of one sign-up attempt as the form presents it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpResult {
    pub feedback: FormFeedback,
    /// Route to move to after the delay, if any.
    pub redirect_to: Option<&'static str>,
}

impl SignUpResult {
    fn error(message: impl Into<String>) -> Self {
        Self { feedback: FormFeedback::error(message), redirect_to: None }
    }

    fn success(message: &str, redirect_to: &'static str) -> Self {
        Self { feedback: FormFeedback::Success(message.to_owned()), redirect_to: Some(redirect_to) }
    }
}

/// Validate the form, register with the provider, and map the outcome to
/// what the visitor sees. Validation failures never reach the provider.
pub async fn submit_sign_up(store: &SessionStore, email: &str, password: &str, confirm: &str) -> SignUpResult {
    let email = match validate_sign_up(email, password, confirm) {
        Ok(email) => email,
        Err(message) => return SignUpResult::error(message),
    };

    match store.sign_up(&email, password).await {
        Ok(data) => match data.outcome() {
            SignUpOutcome::AlreadyRegistered => SignUpResult::error(ALREADY_REGISTERED),
            SignUpOutcome::ConfirmationPending => SignUpResult::success(CONFIRMATION_SENT, SIGN_IN_PATH),
            SignUpOutcome::SignedIn => SignUpResult::success(SIGNED_IN_NOW, AFTER_SIGN_IN_PATH),
        },
        Err(e) => SignUpResult::error(e.message),
    }
}

#[component]
pub fn SignUpPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let feedback = RwSignal::new(None::<FormFeedback>);
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
        feedback.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            let (email_value, password_value, confirm_value) = (email.get(), password.get(), confirm.get());
            leptos::task::spawn_local(async move {
                let result = submit_sign_up(&store, &email_value, &password_value, &confirm_value).await;
                feedback.set(Some(result.feedback));
                busy.set(false);
                if let Some(path) = result.redirect_to {
                    gloo_timers::future::TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    navigate(path, NavigateOptions::default());
                }
            });
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create an account"</h1>
                <p class="auth-card__subtitle">"Enter your email below to create your account."</p>
                <form class="auth-form" on:submit=on_submit>
                    <label class="auth-label" for="signup-email">"Email"</label>
                    <input
                        id="signup-email"
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label class="auth-label" for="signup-password">"Password"</label>
                    <input
                        id="signup-password"
                        class="auth-input"
                        type="password"
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <label class="auth-label" for="signup-confirm">"Confirm password"</label>
                    <input
                        id="signup-confirm"
                        class="auth-input"
                        type="password"
                        autocomplete="new-password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    {move || {
                        feedback
                            .get()
                            .map(|fb| {
                                let class = if fb.is_error() {
                                    "auth-message auth-message--error"
                                } else {
                                    "auth-message auth-message--success"
                                };
                                view! { <p class=class>{fb.message().to_owned()}</p> }
                            })
                    }}
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <p class="auth-card__footer">
                    "Already have an account? "
                    <a href="/auth/signin">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
