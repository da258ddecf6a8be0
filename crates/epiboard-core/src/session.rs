//! Session store
//!
//! Process-wide owner of the [`Session`]. Other components read snapshots or
//! subscribe to [`SessionEvent`]s; only the named operations below mutate it.

use crate::api::ApiClient;
use crate::error::CoreError;
use crate::event::{EventBus, SessionEvent};
use epiboard_types::{
    clear_credentials, restore_session, CountryCode, DurableStorage, Language, LoginRequest,
    LoginResponse, Session, StorageKey, User,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

pub type SharedStorage = Arc<dyn DurableStorage + Send + Sync>;

pub struct SessionStore {
    state: RwLock<Session>,
    storage: SharedStorage,
    events: EventBus,
}

impl SessionStore {
    /// New store in the `Loading` state; call [`hydrate`](Self::hydrate) next
    pub fn new(storage: SharedStorage) -> Self {
        Self {
            state: RwLock::new(Session::loading()),
            storage,
            events: EventBus::default(),
        }
    }

    /// Startup hydration: a stored token is trusted until an API call rejects it
    pub fn hydrate(&self) -> Session {
        let session = restore_session(self.storage.as_ref());
        *self.state.write() = session.clone();
        info!(
            authenticated = session.is_authenticated(),
            country = ?session.country(),
            "Session hydrated"
        );
        self.events.publish(SessionEvent::Hydrated {
            authenticated: session.is_authenticated(),
        });
        session
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    /// Bearer token as persisted, read fresh for every request
    pub fn token(&self) -> Option<String> {
        self.storage
            .get(StorageKey::AuthToken)
            .filter(|t| !t.is_empty())
    }

    /// Persisted country selection, `usa` when none
    pub fn selected_country(&self) -> CountryCode {
        self.storage.country().unwrap_or_default()
    }

    pub fn language(&self) -> Language {
        self.storage
            .language()
            .unwrap_or_else(|| Language::default_for(self.selected_country()))
    }

    pub fn set_language(&self, language: Language) -> Result<(), CoreError> {
        self.storage.set(StorageKey::Language, language.as_str())?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Authenticate against the backend and replace the session.
    ///
    /// Failures carry the server's `detail` or `"Login failed"`.
    pub async fn login(
        &self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<User, CoreError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = api.authenticate(&request).await.map_err(|err| {
            warn!(username, status = ?err.status, "Login rejected");
            let message = err.clone().or_message("Login failed");
            CoreError::Api(epiboard_types::ApiError { message, ..err })
        })?;
        self.complete_login(response)
    }

    /// Store the token and user from a successful login response
    pub fn complete_login(&self, response: LoginResponse) -> Result<User, CoreError> {
        let country = self.selected_country();
        self.storage
            .set(StorageKey::AuthToken, &response.access_token)?;
        self.storage
            .set(StorageKey::SelectedCountry, country.as_str())?;

        let user = {
            let mut state = self.state.write();
            state.login(response, country);
            state.user.clone().ok_or(CoreError::NotAuthenticated)?
        };

        info!(username = %user.username, country = %country, "Logged in");
        self.events.publish(SessionEvent::LoggedIn {
            username: user.username.clone(),
        });
        Ok(user)
    }

    /// Clear the session and the stored credentials. Never needs the server.
    pub fn logout(&self) -> Result<(), CoreError> {
        self.state.write().logout();
        clear_credentials(self.storage.as_ref())?;
        info!("Logged out");
        self.events.publish(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Patch the user's country and persist the selection.
    ///
    /// Permissions are not re-checked here; the next guarded navigation does it.
    pub fn switch_country(&self, country: CountryCode) -> Result<(), CoreError> {
        self.storage
            .set(StorageKey::SelectedCountry, country.as_str())?;
        let patched = self.state.write().switch_country(country);
        info!(country = %country, patched, "Country switched");
        self.events.publish(SessionEvent::CountrySwitched(country));
        Ok(())
    }

    /// Forced transition after a 401/403, driven by the API client
    pub fn force_logout(&self, status: u16) {
        let was_authenticated = {
            let mut state = self.state.write();
            let was = state.is_authenticated();
            state.logout();
            was
        };
        if let Err(e) = clear_credentials(self.storage.as_ref()) {
            warn!(error = %e, "Failed to clear credentials after auth failure");
        }
        if was_authenticated {
            warn!(status, "Session expired");
            self.events.publish(SessionEvent::Expired { status });
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}
