use crate::config::AuthServiceSettings;
use crate::models::Role;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `{data?, error?}` response shape of every auth call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(ApiError::Message(message.into())),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

/// Auth services report errors either as a bare string or as `{message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiError {
    Message(String),
    Detailed { message: String },
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::Message(message) | ApiError::Detailed { message } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInData {
    pub access_token: String,
    pub user: RemoteUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserData {
    pub user: RemoteUser,
}

/// Remote side of authentication. `Err` means the call never produced an
/// envelope (transport or decoding failure); rejections arrive as `Ok` with
/// `error` set.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_in(&self, identity: &str, secret: &str) -> Result<ApiEnvelope<SignInData>>;

    async fn revoke(&self, access_token: &str) -> Result<ApiEnvelope<serde_json::Value>>;

    async fn current_user(&self, access_token: &str) -> Result<ApiEnvelope<CurrentUserData>>;
}

/// `AuthApi` over HTTP against the auth service.
pub struct HttpAuthApi {
    client: Client,
    settings: AuthServiceSettings,
}

impl HttpAuthApi {
    pub fn new(settings: AuthServiceSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.settings.url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn sign_in(&self, identity: &str, secret: &str) -> Result<ApiEnvelope<SignInData>> {
        let url = self.url(&self.settings.login_path);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "email": identity,
                "password": secret,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        read_envelope(response).await
    }

    async fn revoke(&self, access_token: &str) -> Result<ApiEnvelope<serde_json::Value>> {
        let url = self.url(&self.settings.logout_path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        read_envelope(response).await
    }

    async fn current_user(&self, access_token: &str) -> Result<ApiEnvelope<CurrentUserData>> {
        let url = self.url(&self.settings.session_path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send GET request to {}: {}", url, e);
                anyhow::anyhow!("HTTP request failed: {}", e)
            })?;

        read_envelope(response).await
    }
}

/// Non-2xx responses without an envelope error become a synthetic one so
/// callers can rely on `error` for rejections.
async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<ApiEnvelope<T>> {
    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read auth service response body")?;

    parse_envelope(status, &body)
}

fn parse_envelope<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<ApiEnvelope<T>> {
    let parsed = serde_json::from_str::<ApiEnvelope<T>>(body);

    if status.is_success() {
        return parsed.with_context(|| format!("Malformed auth service response ({})", status));
    }

    match parsed {
        Ok(envelope) if envelope.error.is_some() => Ok(envelope),
        _ => Ok(ApiEnvelope::failure(format!(
            "Auth service responded with {}",
            status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn parses_sign_in_payload() {
        let body = r#"{"data":{"access_token":"tok","user":{"id":"1","name":"Ada","email":"a@x.test","role":"lawyer"}}}"#;
        let envelope: ApiEnvelope<SignInData> = parse_envelope(StatusCode::OK, body).unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.access_token, "tok");
        assert_eq!(data.user.role, Role::Lawyer);
    }

    #[test]
    fn error_accepts_string_or_object() {
        let plain: ApiEnvelope<SignInData> =
            parse_envelope(StatusCode::OK, r#"{"error":"Invalid login credentials"}"#).unwrap();
        assert_eq!(plain.error.unwrap().message(), "Invalid login credentials");

        let detailed: ApiEnvelope<SignInData> = parse_envelope(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Email not confirmed"}}"#,
        )
        .unwrap();
        assert_eq!(detailed.error.unwrap().message(), "Email not confirmed");
    }

    #[test]
    fn non_success_without_envelope_becomes_failure() {
        let envelope: ApiEnvelope<SignInData> =
            parse_envelope(StatusCode::BAD_GATEWAY, "<html>upstream down</html>").unwrap();
        assert!(envelope.data.is_none());
        assert!(envelope.error.unwrap().message().contains("502"));
    }

    #[test]
    fn missing_fields_read_as_none() {
        let envelope: ApiEnvelope<serde_json::Value> =
            parse_envelope(StatusCode::OK, "{}").unwrap();
        assert!(envelope.data.is_none());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn malformed_success_body_is_an_error() {
        let result = parse_envelope::<SignInData>(StatusCode::OK, "not json");
        assert!(result.is_err());
    }
}
