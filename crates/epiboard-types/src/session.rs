//! Session state machine
//!
//! `Loading -> {Authenticated, Unauthenticated}`; `Authenticated -> Unauthenticated`
//! via logout or a forced logout after a 401/403. Holders of a `Session` mutate it
//! only through these named transitions.

use crate::models::{LoginResponse, User};
use crate::permissions::CountryCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Loading,
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    pub status: SessionStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self::loading()
    }
}

impl Session {
    /// Initial state before hydration
    pub fn loading() -> Self {
        Self {
            user: None,
            token: None,
            status: SessionStatus::Loading,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            user: None,
            token: None,
            status: SessionStatus::Unauthenticated,
        }
    }

    /// Rebuild from durable storage. A stored token is trusted until the first API call rejects it.
    pub fn hydrate(token: Option<String>, country: Option<CountryCode>) -> Self {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => Self {
                user: Some(User::restored(country.unwrap_or_default())),
                token: Some(token),
                status: SessionStatus::Authenticated,
            },
            None => Self::unauthenticated(),
        }
    }

    /// Replace the session with a fresh login
    pub fn login(&mut self, response: LoginResponse, country: CountryCode) {
        self.user = Some(User::from_profile(response.user, country));
        self.token = Some(response.access_token);
        self.status = SessionStatus::Authenticated;
    }

    /// Patch only the user's country. Returns false when there is no user.
    pub fn switch_country(&mut self, country: CountryCode) -> bool {
        match self.user.as_mut() {
            Some(user) => {
                user.country = country;
                true
            }
            None => false,
        }
    }

    pub fn logout(&mut self) {
        *self = Self::unauthenticated();
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    pub fn country(&self) -> Option<CountryCode> {
        self.user.as_ref().map(|u| u.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthenticatedUser, Role};
    use crate::permissions::{home_route, RouteKey};

    fn login_response() -> LoginResponse {
        LoginResponse {
            access_token: "tok-1".to_string(),
            token_type: "bearer".to_string(),
            expires_in: Some(3600),
            user: AuthenticatedUser {
                id: 7,
                username: "admin".to_string(),
                email: "admin@example.org".to_string(),
                role: Role::Admin,
                is_active: true,
                created_at: None,
                last_login: None,
            },
        }
    }

    #[test]
    fn test_hydrate_with_and_without_token() {
        let session = Session::hydrate(Some("abc".into()), Some(CountryCode::Ch));
        assert!(session.is_authenticated());
        assert_eq!(session.country(), Some(CountryCode::Ch));

        let session = Session::hydrate(None, Some(CountryCode::Ch));
        assert_eq!(session.status, SessionStatus::Unauthenticated);

        let session = Session::hydrate(Some(String::new()), None);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_login_replaces_session() {
        let mut session = Session::loading();
        session.login(login_response(), CountryCode::Fr);
        assert!(session.is_authenticated());
        assert_eq!(session.token.as_deref(), Some("tok-1"));
        assert_eq!(session.user.as_ref().unwrap().username, "admin");
    }

    #[test]
    fn test_switch_country_patches_only_country() {
        let mut session = Session::loading();
        session.login(login_response(), CountryCode::Usa);
        let before = session.clone();

        assert!(session.switch_country(CountryCode::Ch));

        let mut expected = before;
        if let Some(user) = expected.user.as_mut() {
            user.country = CountryCode::Ch;
        }
        assert_eq!(session, expected);
    }

    #[test]
    fn test_switch_country_without_user() {
        let mut session = Session::unauthenticated();
        assert!(!session.switch_country(CountryCode::Fr));
        assert_eq!(session, Session::unauthenticated());
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut session = Session::loading();
        session.login(login_response(), CountryCode::Usa);
        session.logout();
        assert_eq!(session, Session::unauthenticated());
    }

    #[test]
    fn test_login_lands_on_country_home() {
        let mut session = Session::unauthenticated();
        session.login(login_response(), CountryCode::Ch);
        let home = session.country().map(home_route);
        assert_eq!(home, Some(RouteKey::Prediction));
        assert_eq!(home.map(|route| route.path()), Some("/prediction"));
    }
}
