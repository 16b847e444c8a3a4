//! Error types for request dispatch.
//!
//! Every failure is terminal for the request. Gate failures (authorization,
//! quota) are raised before any write reaches the gateway.

use teamfight_store::StoreError;
use thiserror::Error;

/// A result type using `ControlError`.
pub type Result<T> = std::result::Result<T, ControlError>;

/// Errors that can occur while dispatching a CRUD request.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The `table` query parameter was missing or empty.
    #[error("missing required parameter: table")]
    MissingTable,

    /// The table is not part of the catalog.
    #[error("table not allowed: {0}")]
    TableNotAllowed(String),

    /// The HTTP method is not supported.
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),

    /// A write was attempted on a static reference table.
    #[error("table {0} is read-only")]
    ReadOnlyTable(String),

    /// The token does not belong to the asserted email.
    #[error("unauthorized")]
    Unauthorized,

    /// The caller already owns the maximum number of items.
    #[error("item limit reached: at most {limit} items per user")]
    QuotaExceeded {
        /// The maximum number of owned items.
        limit: usize,
    },

    /// A parameterless read of a user-owned table.
    #[error("listing every item of {0} is not allowed")]
    FullScanNotAllowed(String),

    /// The request body could not be decoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// No key was supplied for an update or delete.
    #[error("no key provided")]
    MissingKey,

    /// Gateway client error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ControlError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::MissingTable
            | Self::Unauthorized
            | Self::QuotaExceeded { .. }
            | Self::FullScanNotAllowed(_)
            | Self::InvalidBody(_)
            | Self::MissingKey => 400,
            Self::TableNotAllowed(_) | Self::MethodNotAllowed(_) | Self::ReadOnlyTable(_) => 405,
            Self::Store(err) => err.http_status_code(),
        }
    }

    /// Machine-readable error code for the error envelope.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingTable
            | Self::FullScanNotAllowed(_)
            | Self::InvalidBody(_)
            | Self::MissingKey => "validation_error",
            Self::TableNotAllowed(_) | Self::MethodNotAllowed(_) | Self::ReadOnlyTable(_) => {
                "method_not_allowed"
            }
            Self::Unauthorized => "unauthorized",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Store(StoreError::Payload(_)) => "validation_error",
            Self::Store(StoreError::Transport(_)) => "transport_error",
            Self::Store(StoreError::Gateway { .. }) => "gateway_error",
            Self::Store(StoreError::Parse(_)) => "parse_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamfight_core::CoreError;

    #[test]
    fn error_status_codes() {
        assert_eq!(ControlError::MissingTable.http_status_code(), 400);
        assert_eq!(ControlError::Unauthorized.http_status_code(), 400);
        assert_eq!(
            ControlError::QuotaExceeded { limit: 10 }.http_status_code(),
            400
        );
        assert_eq!(
            ControlError::TableNotAllowed("users".into()).http_status_code(),
            405
        );
        assert_eq!(
            ControlError::ReadOnlyTable("tft_items".into()).http_status_code(),
            405
        );
        assert_eq!(
            ControlError::from(StoreError::Payload(CoreError::NoKeyFound)).http_status_code(),
            400
        );
        assert_eq!(
            ControlError::from(StoreError::Transport("refused".into())).http_status_code(),
            500
        );
    }

    #[test]
    fn error_codes() {
        assert_eq!(ControlError::MissingKey.code(), "validation_error");
        assert_eq!(ControlError::Unauthorized.code(), "unauthorized");
        assert_eq!(
            ControlError::QuotaExceeded { limit: 10 }.code(),
            "quota_exceeded"
        );
        assert_eq!(
            ControlError::from(StoreError::Gateway {
                status: 502,
                message: "bad".into()
            })
            .code(),
            "gateway_error"
        );
    }

    #[test]
    fn gateway_message_is_embedded() {
        let err = ControlError::from(StoreError::Gateway {
            status: 400,
            message: "ValidationException".into(),
        });
        assert_eq!(err.to_string(), "API error: ValidationException");
    }
}
