#![allow(dead_code)]

use async_trait::async_trait;
use case_portal::config::SessionSettings;
use case_portal::models::Role;
use case_portal::navigation::MemoryHistory;
use case_portal::services::auth_client::{
    ApiEnvelope, AuthApi, CurrentUserData, RemoteUser, SignInData,
};
use case_portal::services::{
    AuthSessionManager, MemoryCookieStore, MemoryDurableStore, SessionStore,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Scripted auth service: each call pops the next queued reply.
#[derive(Default)]
pub struct FakeAuthApi {
    pub sign_in_replies: Mutex<VecDeque<anyhow::Result<ApiEnvelope<SignInData>>>>,
    pub revoke_replies: Mutex<VecDeque<anyhow::Result<ApiEnvelope<serde_json::Value>>>>,
    pub current_user_replies: Mutex<VecDeque<anyhow::Result<ApiEnvelope<CurrentUserData>>>>,
    pub revoked_tokens: Mutex<Vec<String>>,
}

impl FakeAuthApi {
    pub fn accepting(user: RemoteUser, token: &str) -> Self {
        let api = Self::default();
        api.queue_sign_in(Ok(ApiEnvelope::ok(SignInData {
            access_token: token.to_string(),
            user,
        })));
        api
    }

    pub fn queue_sign_in(&self, reply: anyhow::Result<ApiEnvelope<SignInData>>) {
        self.sign_in_replies.lock().push_back(reply);
    }

    pub fn queue_revoke(&self, reply: anyhow::Result<ApiEnvelope<serde_json::Value>>) {
        self.revoke_replies.lock().push_back(reply);
    }

    pub fn queue_current_user(&self, reply: anyhow::Result<ApiEnvelope<CurrentUserData>>) {
        self.current_user_replies.lock().push_back(reply);
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn sign_in(&self, _identity: &str, _secret: &str) -> anyhow::Result<ApiEnvelope<SignInData>> {
        self.sign_in_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiEnvelope::failure("Invalid login credentials")))
    }

    async fn revoke(&self, access_token: &str) -> anyhow::Result<ApiEnvelope<serde_json::Value>> {
        self.revoked_tokens.lock().push(access_token.to_string());
        self.revoke_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiEnvelope::empty()))
    }

    async fn current_user(&self, _access_token: &str) -> anyhow::Result<ApiEnvelope<CurrentUserData>> {
        self.current_user_replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiEnvelope::failure("JWT expired")))
    }
}

pub fn remote_user(role: Role) -> RemoteUser {
    RemoteUser {
        id: format!("{}-7", role),
        name: "Jordan Reyes".to_string(),
        email: "jordan@portal.test".to_string(),
        role,
    }
}

/// A browsing context: both persistence layers, a history and a manager.
pub struct Harness {
    pub durable: Arc<MemoryDurableStore>,
    pub cookies: Arc<MemoryCookieStore>,
    pub history: Arc<MemoryHistory>,
    pub api: Arc<FakeAuthApi>,
    pub manager: AuthSessionManager,
}

impl Harness {
    pub fn new(api: FakeAuthApi) -> Self {
        Self::with_layers(
            api,
            Arc::new(MemoryDurableStore::new()),
            Arc::new(MemoryCookieStore::new()),
        )
    }

    /// Fresh manager over existing persistence, as after a page reload.
    pub fn with_layers(
        api: FakeAuthApi,
        durable: Arc<MemoryDurableStore>,
        cookies: Arc<MemoryCookieStore>,
    ) -> Self {
        let history = Arc::new(MemoryHistory::new("/login"));
        let api = Arc::new(api);
        let store = SessionStore::new(durable.clone(), cookies.clone());
        let manager = AuthSessionManager::new(
            store,
            api.clone(),
            history.clone(),
            SessionSettings::default(),
        );
        Self {
            durable,
            cookies,
            history,
            api,
            manager,
        }
    }

    pub fn reload(&self) -> Harness {
        Harness::with_layers(FakeAuthApi::default(), self.durable.clone(), self.cookies.clone())
    }

    pub fn layers_empty(&self) -> bool {
        self.durable.is_empty() && self.cookies.is_empty()
    }
}
