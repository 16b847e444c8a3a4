//! The multiplexed CRUD endpoint.
//!
//! A single route serves every table. The method selects the operation and
//! the query string carries the table and addressing parameters:
//!
//! ```text
//! GET    /api/crud?table=tft_champions
//! GET    /api/crud?table=tft_builds&email=<email>&token=<token>&id=<id>
//! POST   /api/crud?table=tft_builds&email=<email>&token=<token>   {item}
//! PUT    /api/crud?table=tft_builds&email=<email>&token=<token>   {"Key": ..., "UpdateExpression": ...}
//! DELETE /api/crud?table=tft_builds&email=<email>&token=<token>   {"key": ...}
//! ```

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{Method as HttpMethod, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use teamfight_control::{CrudParams, CrudRequest, CrudService, Method};

use crate::error::ApiError;
use crate::state::GatewayState;

/// Handle one CRUD request.
///
/// `OPTIONS` answers 200 with no body; CORS headers are added by the
/// router's CORS layer.
///
/// # Errors
///
/// Returns an `ApiError` for rejected requests and downstream failures.
pub async fn handle<S: CrudService + 'static>(
    State(state): State<Arc<GatewayState<S>>>,
    method: HttpMethod,
    query: Result<Query<CrudParams>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    if method == HttpMethod::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let method: Method = method.as_str().parse().map_err(ApiError::from)?;
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    tracing::debug!(method = %method, table = ?params.table, "CRUD request");

    let request = CrudRequest::new(method, params).with_body(body.to_vec());
    let outcome = state.service.dispatch(request).await?;

    let status =
        StatusCode::from_u16(outcome.http_status_code()).unwrap_or(StatusCode::OK);
    Ok((status, Json(outcome.into_body())).into_response())
}
