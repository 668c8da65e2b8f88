//! Owner of the in-memory session.
//!
//! Persistence is a two-phase write across the durable store and the cookie
//! layer, reconciled on load by one rule: trust the session only when both
//! layers hold it and agree. Anything else is purged from both.

use crate::config::SessionSettings;
use crate::error::PortalError;
use crate::models::{Session, SessionState, UserProfile};
use crate::navigation::History;
use crate::services::auth_client::{AuthApi, RemoteUser};
use crate::services::session_store::{parse_profile, SessionStore, StoredLayers};
use crate::utils::cookie;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

pub struct AuthSessionManager {
    store: SessionStore,
    api: Arc<dyn AuthApi>,
    history: Arc<dyn History>,
    settings: SessionSettings,
    state: watch::Sender<SessionState>,
    initialized: AtomicBool,
}

impl AuthSessionManager {
    pub fn new(
        store: SessionStore,
        api: Arc<dyn AuthApi>,
        history: Arc<dyn History>,
        settings: SessionSettings,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            store,
            api,
            history,
            settings,
            state,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn login_route(&self) -> &str {
        &self.settings.login_route
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    /// Notifications for every state change after subscription.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Waits until the first load has resolved.
    pub async fn resolved(&self) -> SessionState {
        let mut receiver = self.subscribe();
        let state = match receiver.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            // Sender lives in self, so the channel cannot close while borrowed.
            Err(_) => self.current(),
        };
        state
    }

    fn publish(&self, session: Option<Session>) {
        self.state.send_replace(SessionState::Resolved(session));
    }

    /// Hydrates from persistence once. Later calls return the current state
    /// without re-reading.
    pub async fn initialize(&self) -> SessionState {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return self.resolved().await;
        }

        let layers = self.store.read_layers();
        let session = match reconcile(&layers) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding inconsistent stored session");
                self.store.clear();
                None
            }
        };

        match &session {
            Some(session) => tracing::info!(
                user_id = %session.user.id,
                role = %session.role(),
                "Session restored"
            ),
            None => tracing::debug!("No stored session"),
        }

        self.publish(session);
        self.current()
    }

    /// Exchanges credentials for a session. Nothing is persisted on failure.
    pub async fn login(&self, identity: &str, secret: &str) -> Result<Session, PortalError> {
        let envelope = self.api.sign_in(identity, secret).await.map_err(|e| {
            tracing::error!("Login request failed: {:#}", e);
            PortalError::network(e)
        })?;

        if let Some(error) = envelope.error {
            tracing::info!(identity, reason = error.message(), "Login rejected");
            return Err(PortalError::CredentialRejected(error.message().to_string()));
        }

        let Some(data) = envelope.data else {
            tracing::info!(identity, "Login returned no session");
            return Err(PortalError::CredentialRejected(
                "No session returned by the auth service".to_string(),
            ));
        };

        let profile = profile_from_remote(data.user, Utc::now());
        let session = Session::new(profile, data.access_token);

        self.persist(&session)?;
        self.publish(Some(session.clone()));
        self.initialized.store(true, Ordering::SeqCst);

        tracing::info!(
            user_id = %session.user.id,
            role = %session.role(),
            "User logged in successfully"
        );

        self.history.push(&session.role().dashboard_path());
        Ok(session)
    }

    /// Token, then profile, then cookie identity.
    fn persist(&self, session: &Session) -> Result<(), PortalError> {
        self.store.set_token(session.token());
        let written = self
            .store
            .set_profile(&session.user)
            .and_then(|_| self.store.set_identity(&session.user.redirect_identity()));

        if let Err(e) = written {
            tracing::error!(error = %e, "Failed to persist session, rolling back");
            self.store.clear();
            return Err(e);
        }
        Ok(())
    }

    /// Revokes remotely when possible, then always clears local state and
    /// returns to the login route.
    pub async fn logout(&self) {
        if let Some(token) = self.store.token() {
            match self.api.revoke(&token).await {
                Ok(envelope) => match envelope.error {
                    Some(error) => {
                        tracing::warn!(reason = error.message(), "Token revocation rejected")
                    }
                    None => tracing::info!("Token revoked successfully"),
                },
                Err(e) => tracing::error!("Failed to revoke token during logout: {:#}", e),
            }
        }

        self.sign_out_locally();
    }

    fn sign_out_locally(&self) {
        self.store.clear();
        self.publish(None);
        self.initialized.store(true, Ordering::SeqCst);
        self.history.replace(&self.settings.login_route);
    }

    /// Re-reads the durable store only, after out-of-band local edits.
    pub fn refresh(&self) -> Option<Session> {
        let session = match (self.store.token(), self.store.profile()) {
            (Some(token), Ok(Some(profile))) => Some(Session::new(profile, token)),
            (_, Err(e)) => {
                tracing::warn!(error = %e, "Discarding corrupt stored profile");
                self.store.clear();
                None
            }
            _ => None,
        };

        self.publish(session.clone());
        session
    }

    /// Checks the stored token with the auth service and refreshes the
    /// persisted identity from its answer.
    pub async fn revalidate(&self) -> Result<Option<Session>, PortalError> {
        let Some(current) = self.session() else {
            return Ok(None);
        };

        let envelope = self
            .api
            .current_user(current.token())
            .await
            .map_err(|e| {
                tracing::error!("Session revalidation failed: {:#}", e);
                PortalError::network(e)
            })?;

        match (envelope.data, envelope.error) {
            (Some(data), None) => {
                let profile = profile_from_remote(data.user, current.created_at());
                let session = Session::new(profile, current.token().to_string());
                self.persist(&session)?;
                self.publish(Some(session.clone()));
                Ok(Some(session))
            }
            (_, error) => {
                let reason = error
                    .map(|e| e.message().to_string())
                    .unwrap_or_else(|| "no user returned".to_string());
                tracing::info!(reason = %reason, "Stored session no longer accepted");
                self.sign_out_locally();
                Ok(None)
            }
        }
    }
}

fn profile_from_remote(user: RemoteUser, created_at: chrono::DateTime<Utc>) -> UserProfile {
    UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        created_at,
    }
}

/// The single read rule: all three pieces present, parseable and agreeing,
/// or nothing at all.
pub fn reconcile(layers: &StoredLayers) -> Result<Option<Session>, PortalError> {
    match (&layers.token, &layers.profile, &layers.identity) {
        (None, None, None) => Ok(None),
        (Some(token), Some(profile), Some(identity)) => {
            let profile = parse_profile(profile)?;
            let identity = cookie::decode_identity(identity)?;
            if identity != profile.redirect_identity() {
                return Err(PortalError::PersistenceCorruption(
                    "cookie identity does not match stored profile".to_string(),
                ));
            }
            Ok(Some(Session::new(profile, token.clone())))
        }
        _ => Err(PortalError::PersistenceCorruption(format!(
            "partial session (token: {}, profile: {}, cookie: {})",
            layers.token.is_some(),
            layers.profile.is_some(),
            layers.identity.is_some()
        ))),
    }
}
