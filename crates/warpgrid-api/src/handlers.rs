//! REST API handlers.
//!
//! CRUD handlers go through `ActionStore`, invocation through
//! `InvocationBridge`. Every failure becomes a JSON `{"error": ...}` body.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::Value;
use tracing::warn;

use warpgrid_actions::{ActionError, ActionPut};

use crate::ApiState;

/// Error payload: a single human-readable message.
#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorMessage {
    pub error: String,
}

fn error_response(err: &ActionError) -> Response {
    let status = match err {
        ActionError::NotFound(_) => StatusCode::NOT_FOUND,
        ActionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorMessage {
            error: err.to_string(),
        }),
    )
        .into_response()
}

// ── Actions ────────────────────────────────────────────────────

/// GET /api/v1/namespaces/:namespace/actions
pub async fn list_actions(
    State(state): State<ApiState>,
    Path(namespace): Path<String>,
) -> Response {
    match state.actions.list(&namespace) {
        Ok(actions) => Json(actions).into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET /api/v1/namespaces/:namespace/actions/:action
pub async fn get_action(
    State(state): State<ApiState>,
    Path((namespace, action)): Path<(String, String)>,
) -> Response {
    match state.actions.get(&action, &namespace) {
        Ok(action) => Json(action).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT /api/v1/namespaces/:namespace/actions/:action
///
/// The body is JSON regardless of `Content-Type`; a malformed body is an
/// internal error.
pub async fn put_action(
    State(state): State<ApiState>,
    Path((namespace, action)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let body = match parse_action_put(&body) {
        Ok(body) => body,
        Err(e) => {
            warn!(%namespace, %action, error = %e, "rejected action body");
            return error_response(&e);
        }
    };
    match state.actions.put(&action, &namespace, body) {
        Ok(action) => Json(action).into_response(),
        Err(e) => {
            warn!(%namespace, %action, error = %e, "error updating action");
            error_response(&e)
        }
    }
}

/// DELETE /api/v1/namespaces/:namespace/actions/:action
pub async fn delete_action(
    State(state): State<ApiState>,
    Path((namespace, action)): Path<(String, String)>,
) -> Response {
    match state.actions.delete(&action, &namespace) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => error_response(&e),
    }
}

/// POST /api/v1/namespaces/:namespace/actions/:action
///
/// The body, if any, is the JSON parameters handed to the action.
pub async fn invoke_action(
    State(state): State<ApiState>,
    Path((namespace, action)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let params = match parse_params(&body) {
        Ok(params) => params,
        Err(e) => return error_response(&e),
    };
    match state.bridge.invoke(&action, &namespace, params).await {
        Ok(activation) => Json(activation).into_response(),
        Err(e) => {
            warn!(%namespace, %action, error = %e, "error invoking action");
            error_response(&e)
        }
    }
}

fn parse_action_put(body: &[u8]) -> Result<ActionPut, ActionError> {
    serde_json::from_slice(body)
        .map_err(|e| ActionError::internal(format!("invalid action body: {e}")))
}

/// An empty body means "no parameters".
fn parse_params(body: &[u8]) -> Result<Option<Value>, ActionError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ActionError::internal(format!("invalid invocation parameters: {e}")))
}
