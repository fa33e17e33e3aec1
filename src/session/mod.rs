//! Client session lifecycle
//!
//! Owns the bearer token and user identity for a running client, tracks the
//! token's self-reported expiration and forces a logout when it lapses or
//! when the backend rejects it.

pub mod clock;
pub mod expiry;
pub mod host;
pub mod manager;
pub mod token;

use serde::{Deserialize, Serialize};

pub use clock::{Clock, SystemClock};
pub use expiry::{expiration_instant, is_token_expired, time_until_expiry};
pub use host::SessionHost;
pub use manager::{
    InvalidTokenNotifier, MAX_CHECK_INTERVAL, MIN_CHECK_INTERVAL, SessionManager, SessionSettings,
};

/// Identity of the signed-in user, as returned by the backend login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    pub email: String,
    pub role_id: i64,
    pub role_name: String,
}

/// An authenticated session: token and user always travel together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Observable state of the session manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Durable storage has not been read yet
    Loading,
    /// No session
    Anonymous,
    /// Signed in
    Authenticated(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.session().map(|s| s.token.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            user_id: 1,
            user_name: "alice".to_string(),
            email: "a@x.com".to_string(),
            role_id: 2,
            role_name: "User".to_string(),
        }
    }

    #[test]
    fn test_user_json_layout() {
        let json = serde_json::to_value(alice()).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["userName"], "alice");
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["roleId"], 2);
        assert_eq!(json["roleName"], "User");
    }

    #[test]
    fn test_user_ignores_extra_fields() {
        let user: User = serde_json::from_str(
            r#"{"userId":1,"userName":"alice","email":"a@x.com","roleId":2,"roleName":"User","avatar":"x.png"}"#,
        )
        .unwrap();
        assert_eq!(user, alice());
    }

    #[test]
    fn test_user_requires_all_fields() {
        let result = serde_json::from_str::<User>(r#"{"userId":1,"userName":"alice"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_state_accessors() {
        assert!(SessionState::Loading.is_loading());
        assert!(!SessionState::Loading.is_authenticated());
        assert!(SessionState::Anonymous.user().is_none());

        let state = SessionState::Authenticated(Session {
            token: "a.b.c".to_string(),
            user: alice(),
        });
        assert!(state.is_authenticated());
        assert!(!state.is_loading());
        assert_eq!(state.token(), Some("a.b.c"));
        assert_eq!(state.user().map(|u| u.user_name.as_str()), Some("alice"));
    }
}
