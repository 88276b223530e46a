use super::*;
use crate::auth::provider::{AuthChangeEvent, AuthChangeKind, SignUpOutcome};
use crate::test_support::{FakeProvider, sample_session};
use futures::executor::block_on;
use std::cell::RefCell;

fn store_for(provider: &Rc<FakeProvider>) -> SessionStore {
    let provider: Rc<dyn IdentityProvider> = provider.clone();
    SessionStore::new(provider)
}

fn record_states(store: &SessionStore) -> (Rc<RefCell<Vec<SessionState>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = store.watch(move |state| sink.borrow_mut().push(state.clone()));
    (seen, sub)
}

// =============================================================
// Initialization
// =============================================================

#[test]
fn loading_before_initialize() {
    let store = store_for(&FakeProvider::new());
    let state = store.state();
    assert!(state.is_loading);
    assert!(state.user.is_none());
    assert!(state.session.is_none());
}

#[test]
fn initialize_without_session_ends_loading() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);

    let _sub = block_on(store.initialize());

    let state = store.state();
    assert!(!state.is_loading);
    assert!(state.user.is_none());
    assert_eq!(provider.listener_count(), 1);
}

#[test]
fn initialize_adopts_existing_session() {
    let provider = FakeProvider::with_session(sample_session("tok", "u1"));
    let store = store_for(&provider);

    let _sub = block_on(store.initialize());

    let state = store.state();
    assert!(!state.is_loading);
    assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("u1"));
    assert_eq!(state.token(), Some("tok"));
}

#[test]
fn initialize_queries_before_subscribing() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);

    let _sub = block_on(store.initialize());

    assert_eq!(*provider.calls.borrow(), vec!["current_session".to_owned(), "on_session_change".to_owned()]);
}

#[test]
fn failed_initial_query_still_ends_loading() {
    let provider = FakeProvider::new();
    *provider.current_session_error.borrow_mut() = Some(ProviderError::new("offline"));
    let store = store_for(&provider);

    let _sub = block_on(store.initialize());

    let state = store.state();
    assert!(!state.is_loading);
    assert!(!state.is_authenticated());
    assert_eq!(provider.listener_count(), 1);
}

// =============================================================
// Pushed events
// =============================================================

#[test]
fn last_delivered_event_wins() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let _sub = block_on(store.initialize());

    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));
    provider.emit(AuthChangeEvent::signed_out());
    provider.emit(AuthChangeEvent::signed_in(sample_session("b", "u2")));

    let state = store.state();
    assert_eq!(state.user.as_ref().map(|u| u.id.as_str()), Some("u2"));
    assert_eq!(state.token(), Some("b"));

    provider.emit(AuthChangeEvent { kind: AuthChangeKind::SignedOut, session: None });
    assert!(store.state().user.is_none());
    assert!(store.state().session.is_none());
}

#[test]
fn user_present_iff_session_present() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let (seen, _watch) = record_states(&store);
    let _sub = block_on(store.initialize());

    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));
    provider.emit(AuthChangeEvent::signed_out());

    for state in seen.borrow().iter() {
        assert_eq!(state.user.is_some(), state.session.is_some());
    }
}

#[test]
fn loading_flips_exactly_once() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let (seen, _watch) = record_states(&store);

    let _first = block_on(store.initialize());
    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));
    let _second = block_on(store.initialize());
    provider.emit(AuthChangeEvent::signed_out());

    assert!(!seen.borrow().is_empty());
    assert!(seen.borrow().iter().all(|state| !state.is_loading));
    assert!(!store.state().is_loading);
}

#[test]
fn duplicate_event_does_not_renotify() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let _sub = block_on(store.initialize());
    let (seen, _watch) = record_states(&store);

    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));
    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));

    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn released_subscription_stops_following_provider() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let sub = block_on(store.initialize());

    sub.unsubscribe();
    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));

    assert_eq!(provider.listener_count(), 0);
    assert!(store.state().user.is_none());
}

#[test]
fn events_after_store_dropped_are_ignored() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let _sub = block_on(store.initialize());
    drop(store);

    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));
}

// =============================================================
// Operations
// =============================================================

#[test]
fn sign_in_success_leaves_state_to_the_event() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let _sub = block_on(store.initialize());

    block_on(store.sign_in("a@b.com", "password123")).unwrap();
    assert!(store.state().user.is_none());

    provider.emit(AuthChangeEvent::signed_in(sample_session("a", "u1")));
    assert!(store.state().user.is_some());
}

#[test]
fn sign_in_failure_is_forwarded() {
    let provider = FakeProvider::new();
    *provider.sign_in_error.borrow_mut() = Some(ProviderError::new("Invalid login credentials").with_status(400));
    let store = store_for(&provider);

    let err = block_on(store.sign_in("a@b.com", "wrong")).unwrap_err();

    assert_eq!(err.message, "Invalid login credentials");
    assert_eq!(err.status, Some(400));
}

#[test]
fn sign_up_returns_provider_data() {
    let provider = FakeProvider::new();
    *provider.sign_up_result.borrow_mut() =
        Some(Ok(SignUpData { user: None, identities: Some(Vec::new()), session: None }));
    let store = store_for(&provider);

    let data = block_on(store.sign_up("a@b.com", "password123")).unwrap();

    assert_eq!(data.outcome(), SignUpOutcome::AlreadyRegistered);
    assert_eq!(provider.call_count("sign_up"), 1);
}

#[test]
fn sign_up_failure_is_forwarded() {
    let provider = FakeProvider::new();
    *provider.sign_up_result.borrow_mut() = Some(Err(ProviderError::new("Signups not allowed")));
    let store = store_for(&provider);

    let err = block_on(store.sign_up("a@b.com", "password123")).unwrap_err();

    assert_eq!(err.to_string(), "Signups not allowed");
}

#[test]
fn sign_out_clears_local_state_once_confirmed() {
    let provider = FakeProvider::with_session(sample_session("tok", "u1"));
    let store = store_for(&provider);
    let _sub = block_on(store.initialize());
    assert!(store.state().is_authenticated());

    block_on(store.sign_out()).unwrap();

    assert!(!store.state().is_authenticated());
    assert!(!store.state().is_loading);
    provider.emit(AuthChangeEvent::signed_out());
    assert!(!store.state().is_authenticated());
}

#[test]
fn failed_sign_out_keeps_session() {
    let provider = FakeProvider::with_session(sample_session("tok", "u1"));
    *provider.sign_out_error.borrow_mut() = Some(ProviderError::new("network down"));
    let store = store_for(&provider);
    let _sub = block_on(store.initialize());

    let err = block_on(store.sign_out()).unwrap_err();

    assert_eq!(err.message, "network down");
    assert!(store.state().is_authenticated());
}

#[test]
fn get_token_without_session_is_none() {
    let store = store_for(&FakeProvider::new());
    assert_eq!(block_on(store.get_token()), None);
}

#[test]
fn get_token_queries_provider_fresh() {
    let provider = FakeProvider::new();
    let store = store_for(&provider);
    let _sub = block_on(store.initialize());

    *provider.session.borrow_mut() = Some(sample_session("fresh", "u1"));

    assert!(store.state().session.is_none());
    assert_eq!(block_on(store.get_token()).as_deref(), Some("fresh"));
}

#[test]
fn get_token_on_provider_error_is_none() {
    let provider = FakeProvider::with_session(sample_session("tok", "u1"));
    *provider.current_session_error.borrow_mut() = Some(ProviderError::new("storage unavailable"));
    let store = store_for(&provider);

    assert_eq!(block_on(store.get_token()), None);
}
