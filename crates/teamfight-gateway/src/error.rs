//! API error types and responses.
//!
//! Every failure is returned as `{"error": "<message>", "code": "<code>"}`.

use axum::body::{Body, Bytes, HttpBody};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{BoxError, Json};
use serde::Serialize;
use thiserror::Error;

use teamfight_control::ControlError;

/// API error type that implements `IntoResponse`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request parameters or body.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown table, read-only table or unsupported method.
    #[error("{0}")]
    MethodNotAllowed(String),

    /// The token does not belong to the asserted email.
    #[error("unauthorized")]
    Unauthorized,

    /// The caller owns too many items.
    #[error("{0}")]
    QuotaExceeded(String),

    /// The request body exceeded the configured limit.
    #[error("request body too large")]
    PayloadTooLarge,

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A downstream call failed.
    #[error("{message}")]
    Upstream {
        /// Error code of the downstream failure.
        code: &'static str,
        /// Downstream error text.
        message: String,
    },
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl ApiError {
    /// Get the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Unauthorized | Self::QuotaExceeded(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code string for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) | Self::PayloadTooLarge => "validation_error",
            Self::Timeout => "timeout",
            Self::MethodNotAllowed(_) => "method_not_allowed",
            Self::Unauthorized => "unauthorized",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::Upstream { code, .. } => *code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Rewrite rejections produced by middleware into the JSON error envelope.
///
/// The body limit and timeout layers answer before any handler runs, with
/// a plain-text or empty body. Every other response passes through.
pub async fn envelope_rejections<B>(response: Response<B>) -> Response
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        StatusCode::REQUEST_TIMEOUT => {
            tracing::warn!("Request timed out");
            ApiError::Timeout.into_response()
        }
        _ => response.map(Body::new),
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::Unauthorized => Self::Unauthorized,
            ControlError::QuotaExceeded { .. } => Self::QuotaExceeded(err.to_string()),
            ControlError::TableNotAllowed(_)
            | ControlError::MethodNotAllowed(_)
            | ControlError::ReadOnlyTable(_) => Self::MethodNotAllowed(err.to_string()),
            ControlError::MissingTable
            | ControlError::FullScanNotAllowed(_)
            | ControlError::InvalidBody(_)
            | ControlError::MissingKey => Self::BadRequest(err.to_string()),
            ControlError::Store(_) if err.http_status_code() == 400 => {
                Self::BadRequest(err.to_string())
            }
            ControlError::Store(_) => {
                tracing::error!(error = %err, "Gateway request failed");
                Self::Upstream {
                    code: err.code(),
                    message: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teamfight_core::CoreError;
    use teamfight_store::StoreError;

    #[test]
    fn error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::MethodNotAllowed("x".into()).status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn control_errors_map_to_statuses() {
        let cases = [
            (ControlError::MissingTable, StatusCode::BAD_REQUEST),
            (
                ControlError::TableNotAllowed("tft_x".into()),
                StatusCode::METHOD_NOT_ALLOWED,
            ),
            (
                ControlError::QuotaExceeded { limit: 10 },
                StatusCode::BAD_REQUEST,
            ),
            (
                ControlError::Store(StoreError::Payload(CoreError::NoKeyFound)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ControlError::Store(StoreError::Parse("bad".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn timeout_rejection_gets_envelope() {
        let response = envelope_rejections(StatusCode::REQUEST_TIMEOUT.into_response()).await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "request timed out", "code": "timeout" })
        );
    }

    #[tokio::test]
    async fn body_limit_rejection_gets_envelope() {
        let plain = (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response();
        let response = envelope_rejections(plain).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["code"], "validation_error");
    }

    #[tokio::test]
    async fn other_responses_pass_through() {
        let response = envelope_rejections(StatusCode::CREATED.into_response()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn upstream_keeps_downstream_text() {
        let err = ApiError::from(ControlError::Store(StoreError::Gateway {
            status: 400,
            message: "Requested resource not found".into(),
        }));
        assert_eq!(err.code(), "gateway_error");
        assert_eq!(err.to_string(), "API error: Requested resource not found");
    }
}
