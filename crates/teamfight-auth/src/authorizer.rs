//! Capability check on bearer tokens.
//!
//! A token alone is not enough: the identity it resolves to must be the one
//! the caller asserts through the `email` parameter.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::UserInfo;
use crate::error::{AuthError, Result};

/// Trait for resolving bearer tokens into identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token into the identity it belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is rejected, the provider cannot be
    /// reached, or its response cannot be parsed.
    async fn user_info(&self, token: &str) -> Result<UserInfo>;
}

/// Checks that a bearer token belongs to an asserted identity.
pub struct Authorizer<P: IdentityProvider> {
    provider: Arc<P>,
}

impl<P: IdentityProvider> Authorizer<P> {
    /// Create a new authorizer backed by the given identity provider.
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Resolve `token` and require its email to equal `expected_email`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingToken` for an empty token,
    /// `AuthError::MissingEmail` if the identity has no email,
    /// `AuthError::EmailMismatch` if it belongs to someone else, and any
    /// error raised by the identity provider.
    pub async fn authorize(&self, token: &str, expected_email: &str) -> Result<UserInfo> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let identity = self.provider.user_info(token).await?;

        if identity.email.is_empty() {
            return Err(AuthError::MissingEmail);
        }
        if identity.email != expected_email {
            return Err(AuthError::EmailMismatch);
        }

        Ok(identity)
    }

    /// Fail-closed form of [`Authorizer::authorize`].
    ///
    /// Returns `true` only if the token resolves to exactly `expected_email`.
    pub async fn validate(&self, token: &str, expected_email: &str) -> bool {
        match self.authorize(token, expected_email).await {
            Ok(_) => true,
            Err(err) if err.is_provider_failure() => {
                tracing::error!(error = %err, "Identity provider failure, denying request");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, email = %expected_email, "Authorization denied");
                false
            }
        }
    }
}

impl<P: IdentityProvider> Clone for Authorizer<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

/// A mock identity provider for testing.
///
/// Accepts tokens in the format `test-token:<email>` and resolves them to an
/// identity with that email. Every other token is rejected.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct MockIdentityProvider;

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn user_info(&self, token: &str) -> Result<UserInfo> {
        let email = token
            .strip_prefix("test-token:")
            .ok_or_else(|| AuthError::Unauthorized("expected test-token:<email>".to_string()))?;

        Ok(UserInfo {
            email: email.to_string(),
            email_verified: true,
            sub: format!("test|{email}"),
            ..UserInfo::default()
        })
    }
}
