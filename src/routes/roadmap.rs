//! Roadmap endpoints.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::AuthUser;
use crate::database::PlanId;
use crate::error::{ApiError, ApiResult};
use crate::routes::{JsonBody, QueryParams};
use crate::server::AppState;
use crate::services::RoadmapLookup;
use crate::services::roadmap::RoadmapRequest;

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub plan_id: PlanId,
    pub index: i32,
}

#[derive(Debug, Deserialize)]
pub struct ViewQuery {
    pub id: Option<String>,
}

/// `GET /api/roadmap`: the caller's latest roadmap
pub async fn get_roadmap(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<RoadmapLookup>> {
    Ok(Json(state.roadmaps.get_roadmap(user.id).await?))
}

/// `POST /api/roadmap/generate`
pub async fn generate_roadmap(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<RoadmapRequest>,
) -> ApiResult<Json<Value>> {
    let plan_id = state.roadmaps.generate_custom_roadmap(user.id, &req).await?;
    Ok(Json(json!({ "success": true, "plan_id": plan_id })))
}

/// `POST /api/roadmap/progress`
pub async fn update_progress(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ProgressRequest>,
) -> ApiResult<Json<Value>> {
    state.roadmaps.update_progress(req.plan_id, req.index).await?;
    Ok(Json(json!({ "success": true })))
}

/// `GET /api/roadmap/view?id=N`: public read by id
pub async fn view_roadmap(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ViewQuery>,
) -> ApiResult<Json<Value>> {
    let raw = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing id".to_string()))?;
    let plan_id: PlanId = raw
        .parse()
        .map_err(|_| ApiError::Validation("Invalid id".to_string()))?;

    let view = state.roadmaps.get_roadmap_by_id(plan_id).await?;
    Ok(Json(json!({ "success": true, "data": view })))
}
