//! Reactive provisioning scope for the session store and API client.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` calls [`provide_session`] once per mount. The store itself is
//! framework-free; this module mirrors its state into an `RwSignal` so
//! components re-render on change, and ties the provider subscription to the
//! reactive owner so it is released when the scope is torn down.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use leptos::prelude::*;

use super::session::{SessionState, SessionStore};
use crate::auth::subscription::Subscription;
use crate::net::api::ApiClient;

/// Handle to the provisioned session. `Copy`, so closures can capture it.
#[derive(Clone, Copy)]
pub struct SessionContext {
    state: RwSignal<SessionState>,
    store: StoredValue<SessionStore, LocalStorage>,
}

impl SessionContext {
    /// Reactive view of the session state.
    pub fn state(&self) -> RwSignal<SessionState> {
        self.state
    }

    /// The underlying store, for sign-in/sign-up/sign-out/get-token.
    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }
}

/// Provide `store` to every descendant and start following the provider.
///
/// Initialization runs in the browser only; during SSR the state stays in its
/// loading phase so guarded routes render their placeholder.
pub fn provide_session(store: SessionStore) -> SessionContext {
    let state = RwSignal::new(store.state());
    let mirror = store.watch(move |next| {
        state.try_set(next.clone());
    });
    let held: StoredValue<Vec<Subscription>, LocalStorage> = StoredValue::new_local(vec![mirror]);

    let ctx = SessionContext { state, store: StoredValue::new_local(store.clone()) };
    provide_context(ctx);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let subscription = store.initialize().await;
        // If the scope went away while the initial query was in flight, the
        // closure is dropped unrun and the subscription with it.
        if held.try_update_value(move |subs| subs.push(subscription)).is_none() {
            log::debug!("session: scope gone before initialization finished");
        }
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = store;

    on_cleanup(move || {
        held.try_update_value(Vec::clear);
        log::debug!("session: provisioning scope released");
    });

    ctx
}

/// The session provisioned by an ancestor [`provide_session`] call.
///
/// # Panics
///
/// Panics when called outside that scope; that is a wiring defect.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .unwrap_or_else(|| panic!("use_session() called outside the session provisioning scope"))
}

/// Handle to the provisioned backend API client.
#[derive(Clone, Copy)]
pub struct ApiContext {
    client: StoredValue<ApiClient, LocalStorage>,
}

impl ApiContext {
    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }
}

pub fn provide_api_client(client: ApiClient) -> ApiContext {
    let ctx = ApiContext { client: StoredValue::new_local(client) };
    provide_context(ctx);
    ctx
}

/// # Panics
///
/// Panics when no ancestor called [`provide_api_client`].
pub fn use_api_client() -> ApiContext {
    use_context::<ApiContext>().unwrap_or_else(|| panic!("use_api_client() called outside the provisioning scope"))
}
