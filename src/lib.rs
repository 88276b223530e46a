//! # shortn-web
//!
//! Leptos + WASM frontend core for the Shortn link shortener: session
//! lifecycle against a hosted identity provider, an authenticated client for
//! the backend API, route protection, and the auth and dashboard screens.
//!
//! The session and API layers are framework-free and run under plain
//! `cargo test`; `state::context` bridges them into Leptos reactivity.

pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// WASM entry point: install browser logging and hydrate the server markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
