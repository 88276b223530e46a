use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_point_at_local_development() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.auth_url, DEFAULT_AUTH_URL);
    assert_eq!(cfg.auth_anon_key, "");
}

#[test]
fn overrides_are_applied_and_trimmed() {
    let cfg = AppConfig::from_lookup(lookup_from(&[
        ("SHORTN_API_URL", " https://api.shortn.test/ "),
        ("SHORTN_AUTH_URL", "https://auth.shortn.test//"),
        ("SHORTN_AUTH_ANON_KEY", "anon"),
    ]));
    assert_eq!(cfg.api_base_url, "https://api.shortn.test");
    assert_eq!(cfg.auth_url, "https://auth.shortn.test");
    assert_eq!(cfg.auth_anon_key, "anon");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("SHORTN_API_URL", "   ")]));
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn unrelated_keys_are_ignored() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("API_URL", "https://elsewhere.test")]));
    assert_eq!(cfg, AppConfig::default());
}
