//! Scriptable fakes shared by unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::auth::provider::{AuthChangeEvent, IdentityProvider, ProviderError, Session, SignUpData};
use crate::auth::subscription::{Subscribers, Subscription};
use crate::net::api::ApiClient;
use crate::net::http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::net::types::User;

pub fn sample_user(id: &str) -> User {
    User {
        id: id.to_owned(),
        email: format!("{id}@example.com"),
        name: "Test User".to_owned(),
        avatar_url: None,
        role: Some("authenticated".to_owned()),
        created_at: None,
    }
}

pub fn sample_session(token: &str, user_id: &str) -> Session {
    Session {
        access_token: token.to_owned(),
        refresh_token: Some(format!("refresh-{token}")),
        token_type: "bearer".to_owned(),
        expires_at: None,
        user: sample_user(user_id),
    }
}

pub fn json_response(status: u16, body: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_owned(), "application/json".to_owned())],
        body: body.to_string(),
    }
}

pub fn text_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_owned(), "text/plain".to_owned())],
        body: body.to_owned(),
    }
}

/// Records every request and answers from a queue of scripted results.
#[derive(Default)]
pub struct RecordingTransport {
    pub requests: RefCell<Vec<HttpRequest>>,
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
}

impl RecordingTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn respond(&self, response: HttpResponse) {
        self.responses.borrow_mut().push_back(Ok(response));
    }

    pub fn fail(&self, message: &str) {
        self.responses.borrow_mut().push_back(Err(TransportError(message.to_owned())));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request recorded")
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
    }
}

pub fn client_with(transport: &Rc<RecordingTransport>) -> ApiClient {
    let transport: Rc<dyn HttpTransport> = transport.clone();
    ApiClient::new("http://api.test", transport)
}

/// In-memory identity provider. Events are only pushed when a test calls
/// [`FakeProvider::emit`], so tests control delivery order.
#[derive(Default)]
pub struct FakeProvider {
    pub session: RefCell<Option<Session>>,
    pub current_session_error: RefCell<Option<ProviderError>>,
    pub sign_in_error: RefCell<Option<ProviderError>>,
    pub sign_up_result: RefCell<Option<Result<SignUpData, ProviderError>>>,
    pub sign_out_error: RefCell<Option<ProviderError>>,
    pub calls: RefCell<Vec<String>>,
    subscribers: Subscribers<AuthChangeEvent>,
}

impl FakeProvider {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn with_session(session: Session) -> Rc<Self> {
        let provider = Self::default();
        *provider.session.borrow_mut() = Some(session);
        Rc::new(provider)
    }

    /// Push an event to subscribers and update the provider's own session.
    pub fn emit(&self, event: AuthChangeEvent) {
        self.session.borrow_mut().clone_from(&event.session);
        self.subscribers.emit(&event);
    }

    pub fn listener_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|call| call.as_str() == name).count()
    }

    fn record(&self, name: &str) {
        self.calls.borrow_mut().push(name.to_owned());
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        self.record("current_session");
        if let Some(err) = self.current_session_error.borrow().clone() {
            return Err(err);
        }
        Ok(self.session.borrow().clone())
    }

    fn on_session_change(&self, listener: Box<dyn Fn(&AuthChangeEvent)>) -> Subscription {
        self.record("on_session_change");
        self.subscribers.subscribe(listener)
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<(), ProviderError> {
        self.record("sign_in_with_password");
        match self.sign_in_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<SignUpData, ProviderError> {
        self.record("sign_up");
        self.sign_up_result.borrow().clone().unwrap_or_else(|| Ok(SignUpData::default()))
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        self.record("sign_out");
        match self.sign_out_error.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
