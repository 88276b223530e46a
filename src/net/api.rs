//! Authenticated REST client for the backend API.
//!
//! One call, one attempt: [`ApiClient::request`] attaches the bearer token,
//! performs a single exchange through the [`HttpTransport`], and returns either
//! the payload or an [`ApiError`]. Retry policy belongs to the caller.
//!
//! ERROR HANDLING
//! ==============
//! - token required but absent -> 401 before any network I/O
//! - transport failure         -> 500 with the transport's message
//! - malformed JSON payload    -> 500 with the decoder's message
//! - non-2xx status            -> that status, payload `message` when present

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::http::{HttpRequest, HttpTransport, Method};
use super::types::{User, UserInfoResponse};

pub const USER_INFO_ENDPOINT: &str = "/api/user-info";

const JSON_CONTENT_TYPE: &str = "application/json";

/// A response body, tagged by the content kind the response declared.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// `application/json` body, decoded.
    Structured(serde_json::Value),
    /// Anything else, kept as text.
    Opaque(String),
}

impl Payload {
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(value) => Some(value),
            Self::Opaque(_) => None,
        }
    }

    /// Top-level field of a structured object payload.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.as_structured()?.as_object()?.get(name)
    }

    /// Decode a structured payload into `T`.
    ///
    /// # Errors
    ///
    /// Returns a 500 [`ApiError`] when the payload is opaque text or does not
    /// match `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Self::Structured(value) => serde_json::from_value(value).map_err(|e| ApiError::parse(e.to_string())),
            Self::Opaque(_) => Err(ApiError::parse("expected a JSON response")),
        }
    }
}

/// Per-request knobs. Defaults: `GET`, no extra headers, no body, auth required.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub require_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::Get, headers: Vec::new(), body: None, require_auth: true }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self::default().with_method(Method::Post).with_body(body)
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Allow the request to go out without a bearer token.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.require_auth = false;
        self
    }
}

/// Backend API client bound to one origin.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn HttpTransport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, transport }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request against `endpoint` (a path such as `/api/user-info`).
    ///
    /// # Errors
    ///
    /// See the module docs for the failure classification.
    pub async fn request(
        &self,
        endpoint: &str,
        token: Option<&str>,
        options: RequestOptions,
    ) -> Result<Payload, ApiError> {
        let token = token.filter(|t| !t.is_empty());
        if options.require_auth && token.is_none() {
            log::debug!("api: {endpoint} refused locally, no token");
            return Err(ApiError::unauthenticated());
        }

        let request = build_request(&self.base_url, endpoint, token, options);
        let method = request.method;
        let resp = self.transport.send(request).await.map_err(|e| {
            log::warn!("api: {method} {endpoint} transport failure: {e}");
            ApiError::transport(e.0)
        })?;

        let status = resp.status;
        let ok = resp.is_success();
        let payload = if resp.declares_json() {
            let value = serde_json::from_str(&resp.body).map_err(|e| {
                log::warn!("api: {method} {endpoint} returned malformed JSON: {e}");
                ApiError::parse(e.to_string())
            })?;
            Payload::Structured(value)
        } else {
            Payload::Opaque(resp.body)
        };

        if !ok {
            let err = ApiError::response(status, &payload);
            log::warn!("api: {method} {endpoint} failed: {err}");
            return Err(err);
        }
        Ok(payload)
    }
}

fn build_request(base_url: &str, endpoint: &str, token: Option<&str>, options: RequestOptions) -> HttpRequest {
    let mut headers = vec![("Content-Type".to_owned(), JSON_CONTENT_TYPE.to_owned())];
    for (name, value) in options.headers {
        set_header(&mut headers, name, value);
    }
    if let Some(token) = token {
        set_header(&mut headers, "Authorization".to_owned(), format!("Bearer {token}"));
    }

    HttpRequest {
        method: options.method,
        url: format!("{base_url}{endpoint}"),
        headers,
        body: options.body.map(|body| body.to_string()),
    }
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    if let Some(slot) = headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
        *slot = (name, value);
    } else {
        headers.push((name, value));
    }
}

/// Fetch the signed-in user's profile from [`USER_INFO_ENDPOINT`].
///
/// # Errors
///
/// Propagates the request failure, or a 500 when the payload carries no
/// well-formed `user` field.
pub async fn fetch_user_info(client: &ApiClient, token: Option<&str>) -> Result<User, ApiError> {
    let payload = client.request(USER_INFO_ENDPOINT, token, RequestOptions::get()).await?;
    let body: UserInfoResponse = payload.into_json()?;
    Ok(body.user)
}
