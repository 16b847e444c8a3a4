//! Authorization error types.

use thiserror::Error;

/// A result type using `AuthError`.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while authorizing a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token was supplied.
    #[error("missing token")]
    MissingToken,

    /// The identity provider rejected the token.
    #[error("token rejected by identity provider: {0}")]
    Unauthorized(String),

    /// The identity provider answered with an unexpected status.
    #[error("request failed with status {status}: {body}")]
    Provider {
        /// HTTP status returned by the identity provider.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The identity provider could not be reached.
    #[error("failed to make request: {0}")]
    Transport(String),

    /// The identity provider's response could not be parsed.
    #[error("failed to parse response: {0}")]
    InvalidResponse(String),

    /// The token resolved to an identity without an email claim.
    #[error("identity has no email claim")]
    MissingEmail,

    /// The token belongs to a different identity than the one asserted.
    #[error("email does not match token identity")]
    EmailMismatch,
}

impl AuthError {
    /// Returns `true` if the identity provider itself was at fault rather than the caller.
    #[must_use]
    pub const fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::Transport(_) | Self::InvalidResponse(_)
        )
    }
}
