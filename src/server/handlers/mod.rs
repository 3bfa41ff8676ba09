use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::FlagError;
use crate::rollout::{RolloutOutcome, RolloutRequest};
use crate::server::{AppState, responses};

const WEBHOOK_FAILURE: &str = "Error processing webhook";
const INVALID_REQUEST: &str = "Invalid webhook request";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookParams {
    pub issue_key: String,
    pub feature_flag_name: String,
    #[serde(default)]
    pub release_version: Option<String>,
}

pub async fn health() -> Response {
    responses::success()
}

pub async fn webhook(
    State(state): State<AppState>,
    Query(params): Query<WebhookParams>,
) -> Response {
    info!(
        "Received webhook for issue {} (flag {}, release {:?})",
        params.issue_key, params.feature_flag_name, params.release_version
    );

    match process(&state, &params).await {
        Ok(outcome) => responses::pull_request_created(&outcome),
        Err(e) if e.is_client_error() => {
            warn!("Rejected webhook: {}", e);
            responses::error(StatusCode::BAD_REQUEST, INVALID_REQUEST)
        }
        Err(e) => {
            error!("Error processing webhook: {:?}", e);
            responses::error(StatusCode::INTERNAL_SERVER_ERROR, WEBHOOK_FAILURE)
        }
    }
}

async fn process(state: &AppState, params: &WebhookParams) -> Result<RolloutOutcome, FlagError> {
    let request = RolloutRequest::new(
        &params.issue_key,
        &params.feature_flag_name,
        params.release_version.as_deref(),
    )?;
    state.rollout.run(&request).await
}
