//! Authentication payloads and the session user

use crate::permissions::CountryCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server role; roles this client does not know decode as `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User profile as returned by `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthenticatedUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Active user held by the session: server profile plus selected country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub country: CountryCode,
}

impl User {
    pub fn from_profile(profile: AuthenticatedUser, country: CountryCode) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            email: profile.email,
            role: profile.role,
            country,
        }
    }

    /// Placeholder reconstructed from a stored token on startup
    pub fn restored(country: CountryCode) -> Self {
        Self {
            id: 0,
            username: "restored".to_string(),
            email: String::new(),
            role: Role::User,
            country,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_minimal_payload() {
        let json = r#"{"access_token":"abc","user":{"id":3,"username":"ana","role":"admin"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token_type, "bearer");
        assert!(resp.user.is_active);

        let user = User::from_profile(resp.user, CountryCode::Fr);
        assert!(user.is_admin());
        assert_eq!(user.country, CountryCode::Fr);
    }

    #[test]
    fn test_unknown_role_still_logs_in() {
        let json = r#"{"access_token":"abc","user":{"id":4,"username":"bo","role":"analyst"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.user.role, Role::Other);

        let user = User::from_profile(resp.user, CountryCode::Usa);
        assert!(!user.is_admin());
        assert_eq!(user.role.to_string(), "other");
    }
}
