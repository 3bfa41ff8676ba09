//! JSON bodies returned by the webhook endpoints.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::rollout::RolloutOutcome;

pub fn success() -> Response {
    (StatusCode::OK, Json(json!({"status": "ok"}))).into_response()
}

pub fn pull_request_created(outcome: &RolloutOutcome) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "message": "PR created successfully",
            "prUrl": outcome.pr_url,
            "prNumber": outcome.pr_number,
            "branch": outcome.branch,
        })),
    )
        .into_response()
}

/// Error bodies never carry diagnostic detail; that only goes to the log.
pub fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "status": "error",
            "message": message
        })),
    )
        .into_response()
}
