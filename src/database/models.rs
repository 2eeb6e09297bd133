// Database Models
//
// Row types for users, lesson plans, community posts and contact submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

pub type UserId = i64;
pub type PlanId = i64;

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>
    where
        Self: Sized;
}

// ============================================================================
// USERS
// ============================================================================

/// Registered user. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl FromRow for User {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// ============================================================================
// LESSON PLANS / ROADMAPS
// ============================================================================

/// Input for a new lesson plan; the cursor always starts at 0
#[derive(Debug, Clone)]
pub struct NewLessonPlan {
    /// `None` for anonymous generation
    pub owner: Option<UserId>,
    pub persona: String,
    pub goals: String,
    /// Serialized curriculum, opaque to the store
    pub content: String,
}

/// Stored curriculum plus its progress cursor, as the roadmap views read it
#[derive(Debug, Clone)]
pub struct LessonPlan {
    pub id: PlanId,
    pub content: String,
    pub current_lesson_index: i32,
}

impl FromRow for LessonPlan {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            // Rows written before the cursor column existed read as NULL
            current_lesson_index: row
                .try_get::<_, Option<i32>>("current_lesson_index")?
                .unwrap_or(0),
        })
    }
}

/// Course list entry, content omitted
#[derive(Debug, Clone, Serialize)]
pub struct LessonPlanSummary {
    pub id: PlanId,
    pub persona: String,
    pub goals: String,
    pub created_at: DateTime<Utc>,
}

impl FromRow for LessonPlanSummary {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            persona: row.try_get("persona")?,
            goals: row.try_get("goals")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// ============================================================================
// COMMUNITY
// ============================================================================

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: UserId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub topic: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: i64,
    pub user_id: UserId,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub topic: String,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
}

impl FromRow for Post {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            author_name: row.try_get("author_name")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            topic: row.try_get("topic")?,
            likes: row.try_get("likes")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

// ============================================================================
// CONTACT
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSubmission {
    #[serde(skip_deserializing)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}
