//! `user_data` cookie codec shared by the session store and route middleware.

use crate::error::PortalError;
use crate::models::RedirectIdentity;
use axum_extra::extract::cookie::Cookie;
use time::{Duration, OffsetDateTime};

pub const USER_DATA_COOKIE: &str = "user_data";

/// Seven days.
pub const DEFAULT_MAX_AGE_SECS: i64 = 604_800;

/// URL-encoded JSON of the identity.
pub fn encode_identity(identity: &RedirectIdentity) -> Result<String, PortalError> {
    let json = serde_json::to_string(identity)
        .map_err(|e| PortalError::PersistenceCorruption(e.to_string()))?;
    Ok(urlencoding::encode(&json).into_owned())
}

pub fn decode_identity(raw: &str) -> Result<RedirectIdentity, PortalError> {
    let json = urlencoding::decode(raw)
        .map_err(|e| PortalError::PersistenceCorruption(format!("cookie is not UTF-8: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| PortalError::PersistenceCorruption(format!("cookie is not identity JSON: {}", e)))
}

pub fn identity_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((USER_DATA_COOKIE, value))
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .build()
}

/// Overwrites the cookie with one that expired at the epoch.
pub fn expired_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), String::new()))
        .path("/")
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Whether a browser holding this cookie at `now` would drop it.
pub fn is_expired(cookie: &Cookie<'_>, now: OffsetDateTime) -> bool {
    if let Some(max_age) = cookie.max_age() {
        return max_age <= Duration::ZERO;
    }
    cookie
        .expires_datetime()
        .map(|expires| expires <= now)
        .unwrap_or(false)
}
