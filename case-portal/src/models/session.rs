use super::role::Role;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Profile persisted under the durable `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn redirect_identity(&self) -> RedirectIdentity {
        RedirectIdentity {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Non-sensitive identity written to the `user_data` cookie so route
/// middleware can redirect by role without seeing the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectIdentity {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Authenticated identity held for the current browsing context.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserProfile,
    pub access_token: Secret<String>,
}

impl Session {
    pub fn new(user: UserProfile, access_token: String) -> Self {
        Self {
            user,
            access_token: Secret::new(access_token),
        }
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.user.created_at
    }

    pub fn token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user && self.token() == other.token()
    }
}

impl Eq for Session {}

/// Observable lifecycle of the in-memory session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Persistence has not been checked yet.
    #[default]
    Loading,
    Resolved(Option<Session>),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Resolved(session) => session.as_ref(),
            SessionState::Loading => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            name: "Ada Vance".to_string(),
            email: "ada@firm.test".to_string(),
            role: Role::Lawyer,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::new(profile(), "bearer-secret".to_string());
        let printed = format!("{:?}", session);
        assert!(!printed.contains("bearer-secret"));
    }

    #[test]
    fn redirect_identity_drops_id_and_timestamp() {
        let json = serde_json::to_value(profile().redirect_identity()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Ada Vance", "email": "ada@firm.test", "role": "lawyer"})
        );
    }

    #[test]
    fn loading_state_has_no_session() {
        let state = SessionState::default();
        assert!(state.is_loading());
        assert!(!state.is_authenticated());
    }
}
