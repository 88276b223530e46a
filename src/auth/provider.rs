//! Identity-provider boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider is the system of record for credentials and sessions. The
//! session store only ever talks to it through [`IdentityProvider`], so the
//! hosted adapter (`gotrue`) and test fakes are interchangeable.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use super::subscription::Subscription;
use crate::net::types::User;

/// Provider-issued credential bundle. Owned by the provider's storage; the
/// rest of the application only reads it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expiry as seconds since the Unix epoch, if the provider reported one.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Session {
    pub fn bearer_token(&self) -> &str {
        &self.access_token
    }

    /// Whether the session is past its expiry at `now_secs`. Sessions without
    /// an expiry never expire locally.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now_secs)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user.id)
            .finish_non_exhaustive()
    }
}

/// Why the provider pushed a session change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthChangeKind {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// A pushed session change. `session` is the provider's session after the
/// change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthChangeEvent {
    pub kind: AuthChangeKind,
    pub session: Option<Session>,
}

impl AuthChangeEvent {
    pub fn signed_in(session: Session) -> Self {
        Self { kind: AuthChangeKind::SignedIn, session: Some(session) }
    }

    pub fn signed_out() -> Self {
        Self { kind: AuthChangeKind::SignedOut, session: None }
    }
}

/// Failure reported by the provider (bad credentials, duplicate sign-up,
/// unconfirmed email, network trouble). Forwarded to the UI verbatim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
    pub status: Option<u16>,
    /// Machine-readable provider code, e.g. `invalid_credentials`.
    pub code: Option<String>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), status: None, code: None }
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// One linked login method on a provider user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub provider: String,
}

/// What the provider returned from a successful sign-up call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignUpData {
    pub user: Option<User>,
    /// Identities linked to the returned user. An empty list means the email
    /// was already registered and nothing was created.
    pub identities: Option<Vec<Identity>>,
    /// Present when the provider signs the user in immediately.
    pub session: Option<Session>,
}

/// How a successful sign-up call should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    AlreadyRegistered,
    ConfirmationPending,
    SignedIn,
}

impl SignUpData {
    pub fn outcome(&self) -> SignUpOutcome {
        if self.identities.as_ref().is_some_and(Vec::is_empty) {
            SignUpOutcome::AlreadyRegistered
        } else if self.session.is_some() {
            SignUpOutcome::SignedIn
        } else {
            SignUpOutcome::ConfirmationPending
        }
    }
}

/// The five provider operations the session store depends on.
#[async_trait::async_trait(?Send)]
pub trait IdentityProvider {
    /// The provider's current session, if any.
    async fn current_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Register for pushed session changes until the returned handle is
    /// released.
    fn on_session_change(&self, listener: Box<dyn Fn(&AuthChangeEvent)>) -> Subscription;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), ProviderError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpData, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}
