//! Progress store backed by the `lesson_plans` table.

use async_trait::async_trait;

use crate::database::connection::DatabaseConnection;
use crate::database::models::{
    FromRow, LessonPlan, LessonPlanSummary, NewLessonPlan, PlanId, UserId,
};
use crate::database::store::{ProgressStore, StoreResult};

const PLAN_COLUMNS: &str = "id, content, current_lesson_index";

#[async_trait]
impl ProgressStore for DatabaseConnection {
    async fn save_lesson_plan(&self, plan: NewLessonPlan) -> StoreResult<PlanId> {
        let client = self.require_client().await?;
        let row = client
            .query_one(
                "INSERT INTO lesson_plans (user_id, persona, goals, content, current_lesson_index) \
                 VALUES ($1, $2, $3, $4, 0) RETURNING id",
                &[&plan.owner, &plan.persona, &plan.goals, &plan.content],
            )
            .await?;

        Ok(row.try_get("id")?)
    }

    async fn get_latest_lesson_plan(&self, user_id: UserId) -> StoreResult<Option<LessonPlan>> {
        let Some(client) = self.client().await? else {
            return Ok(None);
        };
        let row = client
            .query_opt(
                &format!(
                    "SELECT {} FROM lesson_plans WHERE user_id = $1 \
                     ORDER BY created_at DESC, id DESC LIMIT 1",
                    PLAN_COLUMNS
                ),
                &[&user_id],
            )
            .await?;

        Ok(row.as_ref().map(LessonPlan::from_row).transpose()?)
    }

    async fn get_lesson_plan_by_id(&self, plan_id: PlanId) -> StoreResult<Option<LessonPlan>> {
        let Some(client) = self.client().await? else {
            return Ok(None);
        };
        let row = client
            .query_opt(
                &format!("SELECT {} FROM lesson_plans WHERE id = $1", PLAN_COLUMNS),
                &[&plan_id],
            )
            .await?;

        Ok(row.as_ref().map(LessonPlan::from_row).transpose()?)
    }

    async fn update_lesson_progress(&self, plan_id: PlanId, index: i32) -> StoreResult<()> {
        let Some(client) = self.client().await? else {
            return Ok(());
        };
        let updated = client
            .execute(
                "UPDATE lesson_plans SET current_lesson_index = $1 WHERE id = $2",
                &[&index, &plan_id],
            )
            .await?;
        if updated == 0 {
            tracing::debug!("progress update for unknown plan {}", plan_id);
        }

        Ok(())
    }

    async fn list_lesson_plans(&self, user_id: UserId) -> StoreResult<Vec<LessonPlanSummary>> {
        let Some(client) = self.client().await? else {
            return Ok(Vec::new());
        };
        let rows = client
            .query(
                "SELECT id, persona, goals, created_at FROM lesson_plans \
                 WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
                &[&user_id],
            )
            .await?;

        Ok(rows
            .iter()
            .map(LessonPlanSummary::from_row)
            .collect::<Result<_, _>>()?)
    }

    async fn delete_lesson_plan(&self, user_id: UserId, plan_id: PlanId) -> StoreResult<bool> {
        let Some(client) = self.client().await? else {
            return Ok(false);
        };
        let deleted = client
            .execute(
                "DELETE FROM lesson_plans WHERE id = $1 AND user_id = $2",
                &[&plan_id, &user_id],
            )
            .await?;

        Ok(deleted > 0)
    }
}
