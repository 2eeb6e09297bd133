//! Store seams.
//!
//! Handlers and services only see these traits. Absence is `Ok(None)`, never
//! an error.

use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    ContactSubmission, LessonPlan, LessonPlanSummary, NewLessonPlan, NewPost, PlanId, Post, User,
    UserId,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("database not connected")]
    Unavailable,

    #[error("connection pool error: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),

    #[error("query failed: {0}")]
    Query(#[from] tokio_postgres::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateEmail`] when the email is taken
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<User>;

    /// Exact, case-sensitive match
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn get_user_by_id(&self, id: UserId) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn save_lesson_plan(&self, plan: NewLessonPlan) -> StoreResult<PlanId>;

    /// Most recently created plan owned by `user_id`
    async fn get_latest_lesson_plan(&self, user_id: UserId) -> StoreResult<Option<LessonPlan>>;

    /// No ownership check
    async fn get_lesson_plan_by_id(&self, plan_id: PlanId) -> StoreResult<Option<LessonPlan>>;

    /// Overwrites the cursor, last writer wins. No bounds or ownership check.
    async fn update_lesson_progress(&self, plan_id: PlanId, index: i32) -> StoreResult<()>;

    /// Newest first
    async fn list_lesson_plans(&self, user_id: UserId) -> StoreResult<Vec<LessonPlanSummary>>;

    /// Returns whether a plan owned by `user_id` was removed
    async fn delete_lesson_plan(&self, user_id: UserId, plan_id: PlanId) -> StoreResult<bool>;
}

#[async_trait]
pub trait CommunityStore: Send + Sync {
    async fn create_post(&self, post: NewPost) -> StoreResult<Post>;

    /// Newest first
    async fn list_posts(&self) -> StoreResult<Vec<Post>>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create_contact_submission(&self, submission: &ContactSubmission) -> StoreResult<()>;
}

/// Everything the HTTP layer needs from persistence
pub trait Store: CredentialStore + ProgressStore + CommunityStore + ContactStore {}

impl<T> Store for T where T: CredentialStore + ProgressStore + CommunityStore + ContactStore {}
