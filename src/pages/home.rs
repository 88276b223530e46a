//! Public landing page.

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home-page">
            <div class="home-page__logo">"⚡"</div>
            <h1>"Shortn"</h1>
            <div class="home-page__actions">
                <a class="auth-button auth-button--outline" href="/auth/signin">"Sign In"</a>
                <a class="auth-button" href="/auth/signup">"Sign Up"</a>
            </div>
        </div>
    }
}
