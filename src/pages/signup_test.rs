use super::*;
use crate::auth::provider::{Identity, ProviderError, SignUpData};
use crate::test_support::{FakeProvider, sample_session, sample_user};
use crate::util::validation::{PASSWORD_TOO_SHORT, PASSWORDS_DO_NOT_MATCH};
use futures::executor::block_on;

fn email_identity() -> Identity {
    Identity { id: "i1".to_owned(), provider: "email".to_owned() }
}

// =============================================================
// Validation
// =============================================================

#[test]
fn short_password_never_reaches_provider() {
    let provider = FakeProvider::new();
    let store = SessionStore::new(provider.clone());

    let result = block_on(submit_sign_up(&store, "new@example.com", "short", "short"));

    assert_eq!(result.feedback, FormFeedback::error(PASSWORD_TOO_SHORT));
    assert_eq!(result.redirect_to, None);
    assert_eq!(provider.call_count("sign_up"), 0);
}

#[test]
fn mismatched_confirmation_never_reaches_provider() {
    let provider = FakeProvider::new();
    let store = SessionStore::new(provider.clone());

    let result = block_on(submit_sign_up(&store, "new@example.com", "password1", "password2"));

    assert_eq!(result.feedback.message(), PASSWORDS_DO_NOT_MATCH);
    assert_eq!(provider.call_count("sign_up"), 0);
}

// =============================================================
// Provider outcomes
// =============================================================

#[test]
fn empty_identities_means_already_registered() {
    let provider = FakeProvider::new();
    *provider.sign_up_result.borrow_mut() = Some(Ok(SignUpData {
        user: Some(sample_user("u1")),
        identities: Some(Vec::new()),
        session: None,
    }));
    let store = SessionStore::new(provider);

    let result = block_on(submit_sign_up(&store, "ada@example.com", "password1", "password1"));

    assert_eq!(result.feedback, FormFeedback::error(ALREADY_REGISTERED));
    assert_eq!(result.redirect_to, None);
}

#[test]
fn pending_confirmation_sends_visitor_to_sign_in() {
    let provider = FakeProvider::new();
    *provider.sign_up_result.borrow_mut() = Some(Ok(SignUpData {
        user: Some(sample_user("u9")),
        identities: Some(vec![email_identity()]),
        session: None,
    }));
    let store = SessionStore::new(provider.clone());

    let result = block_on(submit_sign_up(&store, "new@example.com", "password1", "password1"));

    assert_eq!(result.feedback, FormFeedback::Success(CONFIRMATION_SENT.to_owned()));
    assert_eq!(result.redirect_to, Some(SIGN_IN_PATH));
    assert_eq!(provider.call_count("sign_up"), 1);
}

#[test]
fn immediate_session_sends_visitor_to_dashboard() {
    let provider = FakeProvider::new();
    *provider.sign_up_result.borrow_mut() = Some(Ok(SignUpData {
        user: Some(sample_user("u9")),
        identities: Some(vec![email_identity()]),
        session: Some(sample_session("tok", "u9")),
    }));
    let store = SessionStore::new(provider);

    let result = block_on(submit_sign_up(&store, "new@example.com", "password1", "password1"));

    assert!(!result.feedback.is_error());
    assert_eq!(result.redirect_to, Some(AFTER_SIGN_IN_PATH));
}

#[test]
fn provider_rejection_is_shown_verbatim() {
    let provider = FakeProvider::new();
    *provider.sign_up_result.borrow_mut() =
        Some(Err(ProviderError::new("Signups not allowed for this instance").with_status(422)));
    let store = SessionStore::new(provider);

    let result = block_on(submit_sign_up(&store, "new@example.com", "password1", "password1"));

    assert_eq!(result.feedback, FormFeedback::error("Signups not allowed for this instance"));
}
