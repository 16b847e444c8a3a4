//! Identity provider client.
//!
//! This module resolves bearer tokens into identities through the identity
//! provider's user-info endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::authorizer::IdentityProvider;
use crate::error::{AuthError, Result};
use crate::AuthConfig;

/// Identity returned by the user-info endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    /// Email claim. Empty when the provider omits it.
    #[serde(default)]
    pub email: String,
    /// Whether the provider has verified the email.
    #[serde(default)]
    pub email_verified: bool,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Nickname.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Subject identifier.
    #[serde(default)]
    pub sub: String,
}

/// Client for the identity provider's user-info endpoint.
pub struct UserInfoClient {
    config: AuthConfig,
    client: reqwest::Client,
}

impl UserInfoClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Transport` if the HTTP client cannot be built.
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AuthError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl IdentityProvider for UserInfoClient {
    async fn user_info(&self, token: &str) -> Result<UserInfo> {
        let url = self.config.userinfo_url();

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::Transport(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            tracing::debug!(status = %status, "Identity provider rejected user-info request");
            return Err(match status.as_u16() {
                401 | 403 => AuthError::Unauthorized(body),
                code => AuthError::Provider { status: code, body },
            });
        }

        serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> UserInfoClient {
        UserInfoClient::new(AuthConfig {
            base_url: server.uri(),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn resolves_identity_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "email": "a@x.com",
                "email_verified": true,
                "name": "Player A",
                "sub": "auth0|123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let info = client_for(&server).user_info("good-token").await.unwrap();
        assert_eq!(info.email, "a@x.com");
        assert!(info.email_verified);
        assert_eq!(info.name.as_deref(), Some("Player A"));
        assert_eq!(info.sub, "auth0|123");
    }

    #[tokio::test]
    async fn missing_email_deserializes_as_empty() {
        let server = MockServer::start().await;
        Mock::given(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sub": "auth0|123"
            })))
            .mount(&server)
            .await;

        let info = client_for(&server).user_info("t").await.unwrap();
        assert!(info.email.is_empty());
    }

    #[tokio::test]
    async fn unauthorized_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(path("/userinfo"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let err = client_for(&server).user_info("bad").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(body) if body == "Unauthorized"));
    }

    #[tokio::test]
    async fn server_error_is_a_provider_failure() {
        let server = MockServer::start().await;
        Mock::given(path("/userinfo"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let err = client_for(&server).user_info("t").await.unwrap_err();
        assert!(matches!(err, AuthError::Provider { status: 503, .. }));
        assert!(err.is_provider_failure());
    }

    #[tokio::test]
    async fn garbage_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).user_info("t").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_provider_is_transport_error() {
        let client = UserInfoClient::new(AuthConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 2,
        })
        .unwrap();

        let err = client.user_info("t").await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }
}
