//! Error types for the gateway client.

use teamfight_core::CoreError;
use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while talking to the remote gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The gateway could not be reached or the body could not be read.
    #[error("error making request: {0}")]
    Transport(String),

    /// The gateway answered with a non-success status.
    #[error("API error: {message}")]
    Gateway {
        /// HTTP status returned by the gateway.
        status: u16,
        /// Message extracted from the gateway's error payload.
        message: String,
    },

    /// The gateway's response body could not be interpreted.
    #[error("error parsing response: {0}")]
    Parse(String),

    /// The payload itself was unusable (e.g. no partition key).
    #[error(transparent)]
    Payload(#[from] CoreError),
}

impl StoreError {
    /// Returns the appropriate HTTP status code for this error.
    ///
    /// Payload errors are the caller's fault; everything else is a
    /// downstream failure.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Payload(_) => 400,
            Self::Transport(_) | Self::Gateway { .. } | Self::Parse(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_status_codes() {
        assert_eq!(StoreError::Transport("x".into()).http_status_code(), 500);
        assert_eq!(
            StoreError::Gateway {
                status: 404,
                message: "missing".into()
            }
            .http_status_code(),
            500
        );
        assert_eq!(StoreError::Parse("x".into()).http_status_code(), 500);
        assert_eq!(
            StoreError::Payload(CoreError::NoKeyFound).http_status_code(),
            400
        );
    }

    #[test]
    fn gateway_error_embeds_downstream_text() {
        let err = StoreError::Gateway {
            status: 400,
            message: "ValidationException".into(),
        };
        assert_eq!(err.to_string(), "API error: ValidationException");
    }
}
