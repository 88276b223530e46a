//! Hosted auth (GoTrue REST) adapter for [`IdentityProvider`].
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the provider's side of the boundary: it owns session storage and
//! pushes change events. The session store never reads storage directly.
//!
//! Endpoints (relative to the configured auth URL):
//! - `POST /auth/v1/token?grant_type=password`
//! - `POST /auth/v1/signup`
//! - `POST /auth/v1/logout`
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-2xx responses become [`ProviderError`]s whose
//! message is taken from the provider's error body when it has one.

#[cfg(test)]
#[path = "gotrue_test.rs"]
mod gotrue_test;

use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::json;

use super::provider::{AuthChangeEvent, IdentityProvider, Identity, ProviderError, Session, SignUpData};
use super::subscription::{Subscribers, Subscription};
use crate::net::http::{HttpRequest, HttpResponse, HttpTransport, Method};
use crate::net::types::User;

/// `localStorage` key the browser storage keeps the session under.
pub const SESSION_STORAGE_KEY: &str = "shortn.auth.session";

// =============================================================================
// STORAGE
// =============================================================================

/// Where the provider keeps its serialized session.
pub trait SessionStorage {
    fn load(&self) -> Option<String>;

    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the value could not be written.
    fn save(&self, value: &str) -> Result<(), ProviderError>;
    fn clear(&self);
}

/// Process-local storage; sessions end with the page.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    value: RefCell<Option<String>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    fn save(&self, value: &str) -> Result<(), ProviderError> {
        *self.value.borrow_mut() = Some(value.to_owned());
        Ok(())
    }

    fn clear(&self) {
        self.value.borrow_mut().take();
    }
}

/// Browser `localStorage`, shared by every tab on the origin. Without the
/// `hydrate` feature it reads nothing and refuses writes.
#[derive(Debug, Clone)]
pub struct BrowserSessionStorage {
    key: String,
}

impl Default for BrowserSessionStorage {
    fn default() -> Self {
        Self { key: SESSION_STORAGE_KEY.to_owned() }
    }
}

impl SessionStorage for BrowserSessionStorage {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
            storage.get_item(&self.key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, value: &str) -> Result<(), ProviderError> {
        #[cfg(feature = "hydrate")]
        {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .ok_or_else(|| ProviderError::new("Session storage is not available"))?;
            storage
                .set_item(&self.key, value)
                .map_err(|e| ProviderError::new(format!("Could not store session: {e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&self.key, value);
            Err(ProviderError::new("Session storage not available on server"))
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
                let _ = storage.remove_item(&self.key);
            }
        }
    }
}

// =============================================================================
// WIRE SHAPES
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
    #[serde(default)]
    identities: Option<Vec<Identity>>,
}

impl GoTrueUser {
    fn into_parts(self) -> (User, Option<Vec<Identity>>) {
        let email = self.email.unwrap_or_default();
        let name = self
            .user_metadata
            .full_name
            .or(self.user_metadata.name)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_owned());
        let user = User {
            id: self.id,
            email,
            name,
            avatar_url: self.user_metadata.avatar_url,
            role: self.role,
            created_at: self.created_at,
        };
        (user, self.identities)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    user: GoTrueUser,
}

impl TokenResponse {
    fn into_session(self, now_secs: i64) -> (Session, Option<Vec<Identity>>) {
        let expires_at = self.expires_at.or_else(|| self.expires_in.map(|secs| now_secs + secs));
        let (user, identities) = self.user.into_parts();
        let session = Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_owned()),
            expires_at,
            user,
        };
        (session, identities)
    }
}

/// Pull a display message and machine code out of a provider error body.
fn provider_error_from(resp: &HttpResponse) -> ProviderError {
    let body: serde_json::Value = serde_json::from_str(&resp.body).unwrap_or(serde_json::Value::Null);
    let text = |key: &str| body.get(key).and_then(serde_json::Value::as_str).map(str::to_owned);

    let message = ["error_description", "msg", "message", "error"]
        .into_iter()
        .find_map(|key| text(key))
        .unwrap_or_else(|| format!("Authentication request failed ({})", resp.status));
    let mut err = ProviderError::new(message).with_status(resp.status);
    if let Some(code) = text("error_code").or_else(|| text("error")) {
        err = err.with_code(code);
    }
    err
}

fn decode_error(e: &serde_json::Error) -> ProviderError {
    ProviderError::new(format!("Unexpected response from auth server: {e}"))
}

fn now_secs() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let secs = (js_sys::Date::now() / 1000.0) as i64;
        secs
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
    }
}

// =============================================================================
// PROVIDER
// =============================================================================

/// Identity provider backed by the hosted auth REST API.
pub struct GoTrueProvider {
    auth_url: String,
    anon_key: String,
    transport: Rc<dyn HttpTransport>,
    storage: Rc<dyn SessionStorage>,
    clock: Rc<dyn Fn() -> i64>,
    subscribers: Subscribers<AuthChangeEvent>,
}

impl GoTrueProvider {
    pub fn new(
        auth_url: impl Into<String>,
        anon_key: impl Into<String>,
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn SessionStorage>,
    ) -> Self {
        Self {
            auth_url: auth_url.into().trim_end_matches('/').to_owned(),
            anon_key: anon_key.into(),
            transport,
            storage,
            clock: Rc::new(now_secs),
            subscribers: Subscribers::new(),
        }
    }

    /// Replace the wall clock (seconds since the Unix epoch) used for expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + 'static) -> Self {
        self.clock = Rc::new(clock);
        self
    }

    /// The stored session. An unreadable or expired one is cleared and
    /// announced as a sign-out.
    fn stored_session(&self) -> Option<Session> {
        let raw = self.storage.load()?;
        let session = match serde_json::from_str::<Session>(&raw) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("auth: discarding unreadable stored session: {e}");
                self.discard_stored();
                return None;
            }
        };
        if session.is_expired_at((self.clock)()) {
            log::info!("auth: stored session expired");
            self.discard_stored();
            return None;
        }
        Some(session)
    }

    fn discard_stored(&self) {
        self.storage.clear();
        self.subscribers.emit(&AuthChangeEvent::signed_out());
    }

    fn persist(&self, session: &Session) -> Result<(), ProviderError> {
        let raw = serde_json::to_string(session)
            .map_err(|e| ProviderError::new(format!("Could not serialize session: {e}")))?;
        self.storage.save(&raw).inspect_err(|e| {
            log::warn!("auth: could not persist session: {e}");
        })
    }

    /// Re-read storage and announce whatever it now holds. Another tab may
    /// have signed in or out on the same origin.
    pub fn sync_from_storage(&self) {
        let had_value = self.storage.load().is_some();
        match self.stored_session() {
            Some(session) => self.subscribers.emit(&AuthChangeEvent::signed_in(session)),
            // A discarded value was already announced.
            None if had_value => {}
            None => self.subscribers.emit(&AuthChangeEvent::signed_out()),
        }
    }

    fn request(&self, method: Method, path: &str, bearer: Option<&str>, body: Option<serde_json::Value>) -> HttpRequest {
        let bearer = bearer.unwrap_or(&self.anon_key);
        HttpRequest {
            method,
            url: format!("{}/auth/v1{path}", self.auth_url),
            headers: vec![
                ("Content-Type".to_owned(), "application/json".to_owned()),
                ("apikey".to_owned(), self.anon_key.clone()),
                ("Authorization".to_owned(), format!("Bearer {bearer}")),
            ],
            body: body.map(|b| b.to_string()),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
        let resp = self.transport.send(request).await.map_err(|e| ProviderError::new(e.0))?;
        if !resp.is_success() {
            return Err(provider_error_from(&resp));
        }
        Ok(resp)
    }

    /// Store an issued session, then announce it. Nothing is announced when
    /// the session cannot be stored.
    fn adopt(&self, session: Session) -> Result<(), ProviderError> {
        self.persist(&session)?;
        log::debug!("auth: session issued for {}", session.user.id);
        self.subscribers.emit(&AuthChangeEvent::signed_in(session));
        Ok(())
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for GoTrueProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.stored_session())
    }

    fn on_session_change(&self, listener: Box<dyn Fn(&AuthChangeEvent)>) -> Subscription {
        self.subscribers.subscribe(listener)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let body = json!({ "email": email, "password": password });
        let req = self.request(Method::Post, "/token?grant_type=password", None, Some(body));
        let resp = self.send(req).await?;
        let token: TokenResponse = serde_json::from_str(&resp.body).map_err(|e| decode_error(&e))?;
        let (session, _) = token.into_session((self.clock)());
        self.adopt(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpData, ProviderError> {
        let body = json!({ "email": email, "password": password });
        let req = self.request(Method::Post, "/signup", None, Some(body));
        let resp = self.send(req).await?;
        let value: serde_json::Value = serde_json::from_str(&resp.body).map_err(|e| decode_error(&e))?;

        // With auto-confirm the provider answers with a full session; otherwise
        // with the bare user awaiting email confirmation.
        if value.get("access_token").is_some() {
            let token: TokenResponse = serde_json::from_value(value).map_err(|e| decode_error(&e))?;
            let (session, identities) = token.into_session((self.clock)());
            let user = session.user.clone();
            self.adopt(session.clone())?;
            return Ok(SignUpData { user: Some(user), identities, session: Some(session) });
        }
        let gotrue_user: GoTrueUser = serde_json::from_value(value).map_err(|e| decode_error(&e))?;
        let (user, identities) = gotrue_user.into_parts();
        Ok(SignUpData { user: Some(user), identities, session: None })
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        if let Some(session) = self.stored_session() {
            let req = self.request(Method::Post, "/logout", Some(session.bearer_token()), None);
            match self.send(req).await {
                Ok(_) => {}
                // The server already considers the session gone.
                Err(e) if matches!(e.status, Some(401 | 403 | 404)) => {
                    log::debug!("auth: logout answered {e}, clearing locally");
                }
                Err(e) => return Err(e),
            }
        }
        self.storage.clear();
        self.subscribers.emit(&AuthChangeEvent::signed_out());
        Ok(())
    }
}

/// Follow `storage` events so a sign-in or sign-out in another tab reaches
/// this tab's subscribers.
#[cfg(feature = "hydrate")]
pub fn install_cross_tab_sync(provider: Rc<GoTrueProvider>) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        return;
    };
    let listener = Closure::<dyn Fn()>::new(move || provider.sync_from_storage());
    if window
        .add_event_listener_with_callback("storage", listener.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("auth: could not install cross-tab listener");
        return;
    }
    // Lives as long as the page.
    listener.forget();
}
