//! Session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! [`SessionStore`] is the single source of truth for "who is logged in". It
//! resolves the provider's current session once at mount, then follows the
//! provider's pushed change events. Route guards and user-aware components
//! read the resulting [`SessionState`]; forms call the imperative operations.
//!
//! ORDERING
//! ========
//! Pushed events are applied in delivery order, last write wins. Sign-in and
//! sign-up results do not touch local state; the provider event that follows
//! them does. Sign-out additionally clears local state as soon as the provider
//! confirms it, so protected screens do not linger until the event arrives.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::auth::provider::{IdentityProvider, ProviderError, Session, SignUpData};
use crate::auth::subscription::{Subscribers, Subscription};
use crate::net::types::User;

/// Projection of the provider session the UI renders from.
///
/// `user` is present exactly when `session` is. `is_loading` starts `true`
/// and flips to `false` once, when the initial session query resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub is_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { user: None, session: None, is_loading: true }
    }
}

impl SessionState {
    fn resolved(session: Option<Session>) -> Self {
        let user = session.as_ref().map(|s| s.user.clone());
        Self { user, session, is_loading: false }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Bearer token of the cached session. Prefer [`SessionStore::get_token`],
    /// which asks the provider and so sees changes not yet delivered.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(Session::bearer_token)
    }
}

struct Inner {
    provider: Rc<dyn IdentityProvider>,
    state: RefCell<SessionState>,
    watchers: Subscribers<SessionState>,
}

/// Owns [`SessionState`] and bridges it to the identity provider.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl SessionStore {
    pub fn new(provider: Rc<dyn IdentityProvider>) -> Self {
        Self {
            inner: Rc::new(Inner {
                provider,
                state: RefCell::new(SessionState::default()),
                watchers: Subscribers::new(),
            }),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Observe every state change until the returned handle is released.
    pub fn watch(&self, listener: impl Fn(&SessionState) + 'static) -> Subscription {
        self.inner.watchers.subscribe(listener)
    }

    /// Resolve the provider's current session, end the loading phase, then
    /// follow pushed changes. The returned handle is the provider
    /// subscription; release it when the owning scope unmounts.
    ///
    /// A failing session query is treated as "no session" so the loading
    /// phase always ends.
    pub async fn initialize(&self) -> Subscription {
        let current = match self.inner.provider.current_session().await {
            Ok(session) => session,
            Err(e) => {
                log::warn!("session: initial session query failed: {e}");
                None
            }
        };
        self.apply(current);

        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        let subscription = self.inner.provider.on_session_change(Box::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                log::debug!("session: provider event {:?}", event.kind);
                SessionStore { inner }.apply(event.session.clone());
            }
        }));
        log::debug!("session: subscribed to provider changes");
        subscription
    }

    /// Verify credentials with the provider. Local state follows through the
    /// provider's change event, not through this call.
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let result = self.inner.provider.sign_in_with_password(email, password).await;
        if let Err(e) = &result {
            log::info!("session: sign-in rejected: {e}");
        }
        result
    }

    /// Register a new account. Callers enforce password policy beforehand and
    /// must inspect [`SignUpData::outcome`]: a success can still mean the
    /// email was already registered.
    ///
    /// # Errors
    ///
    /// Returns the provider's error unchanged.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpData, ProviderError> {
        let result = self.inner.provider.sign_up(email, password).await;
        match &result {
            Ok(data) => log::info!("session: sign-up completed: {:?}", data.outcome()),
            Err(e) => log::info!("session: sign-up rejected: {e}"),
        }
        result
    }

    /// End the provider session and clear local state once it confirms.
    ///
    /// # Errors
    ///
    /// Returns the provider's error; local state is left untouched then.
    pub async fn sign_out(&self) -> Result<(), ProviderError> {
        self.inner.provider.sign_out().await.inspect_err(|e| {
            log::warn!("session: sign-out failed: {e}");
        })?;
        self.apply(None);
        Ok(())
    }

    /// Bearer token of the provider's current session, queried fresh.
    /// Provider failures read as "no session".
    pub async fn get_token(&self) -> Option<String> {
        match self.inner.provider.current_session().await {
            Ok(session) => session.map(|s| s.access_token),
            Err(e) => {
                log::warn!("session: token lookup failed: {e}");
                None
            }
        }
    }

    fn apply(&self, session: Option<Session>) {
        let next = SessionState::resolved(session);
        {
            let mut state = self.inner.state.borrow_mut();
            if *state == next {
                return;
            }
            *state = next.clone();
        }
        match &next.user {
            Some(user) => log::info!("session: signed in as {}", user.id),
            None => log::info!("session: no active session"),
        }
        self.inner.watchers.emit(&next);
    }
}
