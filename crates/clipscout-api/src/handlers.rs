//! Request handlers for the pipeline endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::timeout;
use validator::Validate;

use clipscout_models::{ClipDescriptor, MomentRecord, VideoRef};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, message = "YouTube URL is required"))]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub funniest_moments_list: Vec<MomentRecord>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FindMomentRequest {
    #[validate(length(min = 1, message = "YouTube URL is required"))]
    pub url: String,
    #[validate(length(min = 1, message = "instruction is required"))]
    pub instruction: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResolveClipRequest {
    #[validate(length(min = 1, message = "YouTube URL is required"))]
    pub url: String,
    /// Candidate moment as raw JSON; re-validated on entry since the
    /// presentation layer is not trusted to preserve invariants.
    pub moment: Value,
}

/// `POST /api/analyze`: bulk discovery.
///
/// Never fails for model trouble: the service degrades to its canned
/// fallback list internally.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let video = VideoRef::resolve(&request.url)?;
    let moments = state.discovery.discover_many(&video).await;

    Ok(Json(AnalyzeResponse {
        funniest_moments_list: moments,
    }))
}

/// `POST /api/find-moment`: targeted discovery.
pub async fn find_moment(
    State(state): State<AppState>,
    Json(request): Json<FindMomentRequest>,
) -> ApiResult<Json<MomentRecord>> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let video = VideoRef::resolve(&request.url)?;
    let moment = state
        .discovery
        .discover_one(&video, &request.instruction)
        .await?;

    Ok(Json(moment))
}

/// `POST /api/resolve-clip`: clip resolution under the wall-clock budget.
pub async fn resolve_clip(
    State(state): State<AppState>,
    Json(request): Json<ResolveClipRequest>,
) -> ApiResult<Json<ClipDescriptor>> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let video = VideoRef::resolve(&request.url)?;
    let moment = MomentRecord::validate(&request.moment)?;

    let descriptor = timeout(
        state.config.resolve_timeout,
        state.resolver.resolve(&video, &moment),
    )
    .await
    .map_err(|_| {
        ApiError::timeout(format!(
            "clip resolution exceeded {}s",
            state.config.resolve_timeout.as_secs()
        ))
    })??;

    Ok(Json(descriptor))
}

/// `GET /health`: liveness probe.
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
