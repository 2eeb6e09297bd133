//! Arithmetic demo endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::routes::JsonBody;

/// Missing operands count as zero
#[derive(Debug, Deserialize)]
pub struct MathRequest {
    #[serde(default)]
    pub a: f64,
    #[serde(default)]
    pub b: f64,
}

#[derive(Debug, Serialize)]
pub struct MathResponse {
    pub result: f64,
}

/// `POST /api/math`: `{a, b}` → `{result: a + b}`
pub async fn add(JsonBody(req): JsonBody<MathRequest>) -> ApiResult<Json<MathResponse>> {
    Ok(Json(MathResponse { result: req.a + req.b }))
}
