//! Deployment configuration.
//!
//! The WASM bundle cannot read the environment at runtime, so
//! [`AppConfig::from_build_env`] captures values when the crate is compiled.
//!
//! Keys (all optional):
//! - `SHORTN_API_URL`: backend origin, default `http://localhost:8080`
//! - `SHORTN_AUTH_URL`: identity provider origin, default `http://localhost:54321`
//! - `SHORTN_AUTH_ANON_KEY`: public provider key, default empty

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_AUTH_URL: &str = "http://localhost:54321";

pub const API_URL_KEY: &str = "SHORTN_API_URL";
pub const AUTH_URL_KEY: &str = "SHORTN_AUTH_URL";
pub const AUTH_ANON_KEY_KEY: &str = "SHORTN_AUTH_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub auth_url: String,
    pub auth_anon_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl AppConfig {
    /// Build from any key lookup. Blank values count as unset; URLs lose
    /// trailing slashes.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let url = |key: &str, default: &str| {
            get(key).unwrap_or_else(|| default.to_owned()).trim_end_matches('/').to_owned()
        };

        Self {
            api_base_url: url(API_URL_KEY, DEFAULT_API_BASE_URL),
            auth_url: url(AUTH_URL_KEY, DEFAULT_AUTH_URL),
            auth_anon_key: get(AUTH_ANON_KEY_KEY).unwrap_or_default(),
        }
    }

    /// Values baked in at compile time.
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                API_URL_KEY => option_env!("SHORTN_API_URL"),
                AUTH_URL_KEY => option_env!("SHORTN_AUTH_URL"),
                AUTH_ANON_KEY_KEY => option_env!("SHORTN_AUTH_ANON_KEY"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Values from the process environment (native builds and SSR).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}
