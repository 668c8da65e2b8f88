//! The two persistence layers behind a session and the thin wrapper over them.
//!
//! The durable store holds the token and full profile. The cookie layer holds
//! only the redirect identity, readable by route middleware on the server.

use crate::error::PortalError;
use crate::models::{RedirectIdentity, UserProfile};
use crate::utils::cookie::{self, USER_DATA_COOKIE};
use axum_extra::extract::cookie::Cookie;
use dashmap::DashMap;
use std::sync::Arc;
use time::OffsetDateTime;

/// Durable store keys.
pub mod keys {
    pub const AUTH_TOKEN: &str = "authToken";
    pub const USER: &str = "user";
}

/// Client-side key/value storage that survives reloads.
pub trait DurableStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

/// Cookie jar of the browsing context. Writing an expired cookie deletes it.
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, cookie: Cookie<'static>);
}

#[derive(Default)]
pub struct MemoryDurableStore {
    entries: DashMap<String, String>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DurableStore for MemoryDurableStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// Browser-like jar: honours `Max-Age` and `Expires`.
#[derive(Default)]
pub struct MemoryCookieStore {
    cookies: DashMap<String, (Cookie<'static>, Option<OffsetDateTime>)>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Cookie` request header for the live cookies, as a browser would send it.
    pub fn header_value(&self) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        let mut pairs: Vec<String> = self
            .cookies
            .iter()
            .filter(|entry| entry.value().1.map_or(true, |deadline| deadline > now))
            .map(|entry| entry.value().0.stripped().to_string())
            .collect();
        if pairs.is_empty() {
            return None;
        }
        pairs.sort();
        Some(pairs.join("; "))
    }

    pub fn is_empty(&self) -> bool {
        self.header_value().is_none()
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        let entry = self.cookies.get(name)?;
        let (cookie, deadline) = entry.value();
        match deadline {
            Some(deadline) if *deadline <= now => None,
            _ => Some(cookie.value().to_string()),
        }
    }

    fn set(&self, cookie: Cookie<'static>) {
        let now = OffsetDateTime::now_utc();
        if cookie::is_expired(&cookie, now) {
            self.cookies.remove(cookie.name());
            return;
        }
        let deadline = match cookie.max_age() {
            Some(max_age) => Some(now + max_age),
            None => cookie.expires_datetime(),
        };
        self.cookies
            .insert(cookie.name().to_string(), (cookie, deadline));
    }
}

/// Raw contents of both layers, before any reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredLayers {
    pub token: Option<String>,
    pub profile: Option<String>,
    pub identity: Option<String>,
}

impl StoredLayers {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.profile.is_none() && self.identity.is_none()
    }
}

/// Get/set/clear over the durable store and the cookie layer.
#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn DurableStore>,
    cookies: Arc<dyn CookieStore>,
    cookie_max_age_secs: i64,
}

impl SessionStore {
    pub fn new(durable: Arc<dyn DurableStore>, cookies: Arc<dyn CookieStore>) -> Self {
        Self {
            durable,
            cookies,
            cookie_max_age_secs: cookie::DEFAULT_MAX_AGE_SECS,
        }
    }

    pub fn with_cookie_max_age(mut self, secs: i64) -> Self {
        self.cookie_max_age_secs = secs;
        self
    }

    pub fn read_layers(&self) -> StoredLayers {
        StoredLayers {
            token: self.token(),
            profile: self.durable.get(keys::USER),
            identity: self.cookies.get(USER_DATA_COOKIE),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.durable.get(keys::AUTH_TOKEN)
    }

    pub fn set_token(&self, token: &str) {
        self.durable.set(keys::AUTH_TOKEN, token.to_string());
    }

    pub fn profile(&self) -> Result<Option<UserProfile>, PortalError> {
        self.durable
            .get(keys::USER)
            .map(|raw| parse_profile(&raw))
            .transpose()
    }

    pub fn set_profile(&self, profile: &UserProfile) -> Result<(), PortalError> {
        let raw = serde_json::to_string(profile)
            .map_err(|e| PortalError::PersistenceCorruption(e.to_string()))?;
        self.durable.set(keys::USER, raw);
        Ok(())
    }

    pub fn identity(&self) -> Result<Option<RedirectIdentity>, PortalError> {
        self.cookies
            .get(USER_DATA_COOKIE)
            .map(|raw| cookie::decode_identity(&raw))
            .transpose()
    }

    pub fn set_identity(&self, identity: &RedirectIdentity) -> Result<(), PortalError> {
        let value = cookie::encode_identity(identity)?;
        self.cookies
            .set(cookie::identity_cookie(value, self.cookie_max_age_secs));
        Ok(())
    }

    /// Empties both layers.
    pub fn clear(&self) {
        self.durable.remove(keys::AUTH_TOKEN);
        self.durable.remove(keys::USER);
        self.cookies.set(cookie::expired_cookie(USER_DATA_COOKIE));
    }
}

pub fn parse_profile(raw: &str) -> Result<UserProfile, PortalError> {
    serde_json::from_str(raw)
        .map_err(|e| PortalError::PersistenceCorruption(format!("stored user is not a profile: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn store() -> (SessionStore, Arc<MemoryDurableStore>, Arc<MemoryCookieStore>) {
        let durable = Arc::new(MemoryDurableStore::new());
        let cookies = Arc::new(MemoryCookieStore::new());
        (
            SessionStore::new(durable.clone(), cookies.clone()),
            durable,
            cookies,
        )
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "c-9".to_string(),
            name: "Morgan Client".to_string(),
            email: "morgan@home.test".to_string(),
            role: Role::Client,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn writes_land_in_their_layers() {
        let (store, durable, cookies) = store();
        let profile = profile();
        store.set_token("tok-1");
        store.set_profile(&profile).unwrap();
        store.set_identity(&profile.redirect_identity()).unwrap();

        assert_eq!(durable.get(keys::AUTH_TOKEN).as_deref(), Some("tok-1"));
        assert_eq!(store.profile().unwrap(), Some(profile.clone()));
        assert_eq!(store.identity().unwrap(), Some(profile.redirect_identity()));
        assert!(cookies.header_value().unwrap().starts_with("user_data="));
    }

    #[test]
    fn clear_empties_both_layers() {
        let (store, durable, cookies) = store();
        store.set_token("tok-1");
        store.set_profile(&profile()).unwrap();
        store.set_identity(&profile().redirect_identity()).unwrap();

        store.clear();

        assert!(durable.is_empty());
        assert!(cookies.is_empty());
        assert!(store.read_layers().is_empty());
    }

    #[test]
    fn corrupt_profile_is_reported() {
        let (store, durable, _) = store();
        durable.set(keys::USER, "{not json".to_string());
        assert!(matches!(
            store.profile(),
            Err(PortalError::PersistenceCorruption(_))
        ));
    }

    #[test]
    fn zero_max_age_cookie_is_never_stored() {
        let cookies = MemoryCookieStore::new();
        cookies.set(cookie::identity_cookie("x".to_string(), 0));
        assert_eq!(cookies.get(USER_DATA_COOKIE), None);
    }
}
