//! Session context for the browser app
//!
//! Owns the reactive [`Session`]; components read it and call the named
//! operations below. Durable keys live in `localStorage`.

use crate::api;
use crate::i18n::I18n;
use crate::storage::LocalStorage;
use epiboard_types::{
    clear_credentials, restore_session, CountryCode, DurableStorage, LoginRequest, Session,
    StorageKey, User,
};
use leptos::logging::{log, warn};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct AuthContext {
    session: RwSignal<Session>,
}

impl AuthContext {
    fn new() -> Self {
        Self {
            session: RwSignal::new(Session::loading()),
        }
    }

    /// Rebuild the session from storage; the token is trusted until an API call rejects it
    fn hydrate(&self) {
        let session = restore_session(&LocalStorage);
        log!("Session hydrated (authenticated: {})", session.is_authenticated());
        self.session.set(session);
    }

    pub fn session(&self) -> Session {
        self.session.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_authenticated())
    }

    pub fn user(&self) -> Option<User> {
        self.session.with(|s| s.user.clone())
    }

    /// Active country, falling back to the persisted selection
    pub fn country(&self) -> CountryCode {
        self.session
            .with(|s| s.country())
            .or_else(|| LocalStorage.country())
            .unwrap_or_default()
    }

    /// Exchange credentials for a token. The error is ready for display.
    pub async fn login(&self, username: String, password: String) -> Result<User, String> {
        let request = LoginRequest { username, password };
        let response = api::login(&request)
            .await
            .map_err(|err| err.or_message("Login failed"))?;

        let country = LocalStorage.country().unwrap_or_default();
        LocalStorage
            .set(StorageKey::AuthToken, &response.access_token)
            .map_err(|e| e.to_string())?;
        LocalStorage
            .set(StorageKey::SelectedCountry, country.as_str())
            .map_err(|e| e.to_string())?;

        self.session.update(|s| s.login(response, country));
        self.user().ok_or_else(|| "Login failed".to_string())
    }

    pub fn logout(&self) {
        if let Err(e) = clear_credentials(&LocalStorage) {
            warn!("Failed to clear credentials: {}", e);
        }
        self.session.update(|s| s.logout());
    }

    /// Patch the user's country; the route guard re-evaluates on the next render
    pub fn switch_country(&self, country: CountryCode, i18n: I18n) {
        if let Err(e) = LocalStorage.set(StorageKey::SelectedCountry, country.as_str()) {
            warn!("Failed to persist country: {}", e);
        }
        self.session.update(|s| {
            s.switch_country(country);
        });
        i18n.follow_country(country);
    }
}

/// Create, hydrate and provide the session context
pub fn provide_auth() -> AuthContext {
    let auth = AuthContext::new();
    auth.hydrate();
    provide_context(auth);
    auth
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}
