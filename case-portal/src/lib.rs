pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod navigation;
pub mod services;
pub mod startup;
pub mod utils;

pub use error::PortalError;

use crate::config::Settings;
use crate::models::RoleAllowList;
use crate::navigation::{History, ModalMode, ModalStateController};
use crate::services::{AuthApi, AuthSessionManager, HttpAuthApi, NavigationGuard, SessionStore};
use std::sync::Arc;

/// Everything a page layer needs: the session manager plus the shared
/// history it redirects through. Built once per browsing context.
#[derive(Clone)]
pub struct PortalContext {
    pub session: Arc<AuthSessionManager>,
    pub history: Arc<dyn History>,
}

impl PortalContext {
    pub fn new(
        store: SessionStore,
        api: Arc<dyn AuthApi>,
        history: Arc<dyn History>,
        settings: &Settings,
    ) -> Self {
        let session = AuthSessionManager::new(
            store.with_cookie_max_age(settings.session.cookie_max_age_secs),
            api,
            history.clone(),
            settings.session.clone(),
        );
        Self {
            session: Arc::new(session),
            history,
        }
    }

    /// Context talking to the configured auth service over HTTP.
    pub fn with_http_api(store: SessionStore, history: Arc<dyn History>, settings: &Settings) -> Self {
        let api = Arc::new(HttpAuthApi::new(settings.auth_service.clone()));
        Self::new(store, api, history, settings)
    }

    pub fn guard(&self, allow: RoleAllowList) -> NavigationGuard {
        NavigationGuard::new(allow, self.session.login_route())
    }

    pub fn modal(&self, param: &str, mode: ModalMode) -> ModalStateController {
        ModalStateController::new(self.history.clone(), param, mode)
    }
}
