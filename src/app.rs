//! Root application component with routing and context providers.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::auth::gotrue::{BrowserSessionStorage, GoTrueProvider};
use crate::config::AppConfig;
use crate::net::api::ApiClient;
use crate::net::http::{BrowserTransport, HttpTransport};
use crate::pages::{dashboard::DashboardPage, home::HomePage, signin::SignInPage, signup::SignUpPage};
use crate::state::context::{provide_api_client, provide_session};
use crate::state::session::SessionStore;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

fn load_config() -> AppConfig {
    if cfg!(feature = "hydrate") { AppConfig::from_build_env() } else { AppConfig::from_env() }
}

/// Root application component.
///
/// Builds the identity provider and API client from [`AppConfig`], provisions
/// the session for every route, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = load_config();
    log::debug!("app: api={} auth={}", config.api_base_url, config.auth_url);

    let transport: Rc<dyn HttpTransport> = Rc::new(BrowserTransport);
    let provider = Rc::new(GoTrueProvider::new(
        config.auth_url,
        config.auth_anon_key,
        Rc::clone(&transport),
        Rc::new(BrowserSessionStorage::default()),
    ));
    #[cfg(feature = "hydrate")]
    crate::auth::gotrue::install_cross_tab_sync(Rc::clone(&provider));

    provide_session(SessionStore::new(provider));
    provide_api_client(ApiClient::new(config.api_base_url, transport));

    view! {
        <Stylesheet id="leptos" href="/pkg/shortn-web.css"/>
        <Title text="Shortn"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=(StaticSegment("auth"), StaticSegment("signin")) view=SignInPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("signup")) view=SignUpPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
            </Routes>
        </Router>
    }
}
