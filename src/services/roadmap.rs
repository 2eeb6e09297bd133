//! Roadmap progress controller.
//!
//! Composes caller identity with the progress store: reads the latest or a
//! specific roadmap, generates new ones through the tutor, and moves the
//! lesson cursor.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::ai::Tutor;
use crate::database::{LessonPlan, NewLessonPlan, PlanId, Store, UserId};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct RoadmapRequest {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub other: String,
}

/// A stored roadmap with its content decoded for the client
#[derive(Debug, Serialize)]
pub struct RoadmapView {
    pub plan_id: PlanId,
    pub content: Value,
    pub current_index: i32,
}

impl From<LessonPlan> for RoadmapView {
    fn from(plan: LessonPlan) -> Self {
        let content = match serde_json::from_str(&plan.content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    "⚠️  Roadmap {} content is not JSON ({}), returning it raw ({} bytes)",
                    plan.id,
                    e,
                    plan.content.len()
                );
                Value::String(plan.content)
            }
        };

        Self {
            plan_id: plan.id,
            content,
            current_index: plan.current_lesson_index,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RoadmapLookup {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RoadmapView>,
}

#[derive(Clone)]
pub struct RoadmapController {
    store: Arc<dyn Store>,
    tutor: Arc<dyn Tutor>,
}

impl RoadmapController {
    pub fn new(store: Arc<dyn Store>, tutor: Arc<dyn Tutor>) -> Self {
        Self { store, tutor }
    }

    /// Latest roadmap owned by `user_id`
    pub async fn get_roadmap(&self, user_id: UserId) -> ApiResult<RoadmapLookup> {
        let plan = self.store.get_latest_lesson_plan(user_id).await?;
        Ok(RoadmapLookup {
            found: plan.is_some(),
            data: plan.map(RoadmapView::from),
        })
    }

    /// Generate a roadmap and persist it for `user_id`. Nothing is saved when
    /// the tutor fails.
    pub async fn generate_custom_roadmap(
        &self,
        user_id: UserId,
        request: &RoadmapRequest,
    ) -> ApiResult<PlanId> {
        tracing::info!(
            "🗺️  Generating roadmap for user {}: role={}, experience={}",
            user_id,
            request.role,
            request.experience
        );

        let content = self
            .tutor
            .generate_roadmap(&request.role, &request.experience, &request.goal, &request.other)
            .await
            .map_err(|e| ApiError::Upstream(format!("Failed to generate roadmap: {}", e)))?;

        let plan_id = self
            .store
            .save_lesson_plan(NewLessonPlan {
                owner: Some(user_id),
                persona: format!("{} ({})", request.role, request.experience),
                goals: request.goal.clone(),
                content,
            })
            .await?;

        tracing::info!("✅ Saved roadmap {} for user {}", plan_id, user_id);
        Ok(plan_id)
    }

    /// Overwrite the cursor. Any caller may move any plan's cursor and the
    /// index is not checked against the lesson count.
    pub async fn update_progress(&self, plan_id: PlanId, index: i32) -> ApiResult<()> {
        if index < 0 {
            return Err(ApiError::Validation("Invalid input".to_string()));
        }
        self.store.update_lesson_progress(plan_id, index).await?;
        Ok(())
    }

    pub async fn get_roadmap_by_id(&self, plan_id: PlanId) -> ApiResult<RoadmapView> {
        self.store
            .get_lesson_plan_by_id(plan_id)
            .await?
            .map(RoadmapView::from)
            .ok_or_else(|| ApiError::NotFound("Roadmap not found".to_string()))
    }
}
