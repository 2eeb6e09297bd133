//! In-memory store used by the unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;

use crate::database::models::{
    ContactSubmission, LessonPlan, LessonPlanSummary, NewLessonPlan, NewPost, PlanId, Post, User,
    UserId,
};
use crate::database::store::{
    CommunityStore, ContactStore, CredentialStore, ProgressStore, StoreError, StoreResult,
};

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

/// Full `lesson_plans` row
struct StoredPlan {
    id: PlanId,
    owner: Option<UserId>,
    persona: String,
    goals: String,
    content: String,
    current_lesson_index: i32,
    created_at: DateTime<Utc>,
}

impl StoredPlan {
    fn view(&self) -> LessonPlan {
        LessonPlan {
            id: self.id,
            content: self.content.clone(),
            current_lesson_index: self.current_lesson_index,
        }
    }
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    plans: Vec<StoredPlan>,
    posts: Vec<Post>,
    contacts: Vec<ContactSubmission>,
    // Strictly increasing so "latest" never ties
    ticks: i64,
}

impl Inner {
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc::now() + Duration::milliseconds(self.ticks)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contact_submissions(&self) -> Vec<ContactSubmission> {
        self.inner.read().contacts.clone()
    }

    pub fn plan_count(&self) -> usize {
        self.inner.read().plans.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<User> {
        let mut inner = self.inner.write();
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: inner.users.len() as UserId + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: inner.now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn save_lesson_plan(&self, plan: NewLessonPlan) -> StoreResult<PlanId> {
        let mut inner = self.inner.write();
        let id = inner.plans.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let created_at = inner.now();
        inner.plans.push(StoredPlan {
            id,
            owner: plan.owner,
            persona: plan.persona,
            goals: plan.goals,
            content: plan.content,
            current_lesson_index: 0,
            created_at,
        });
        Ok(id)
    }

    async fn get_latest_lesson_plan(&self, user_id: UserId) -> StoreResult<Option<LessonPlan>> {
        Ok(self
            .inner
            .read()
            .plans
            .iter()
            .filter(|p| p.owner == Some(user_id))
            .max_by_key(|p| p.created_at)
            .map(StoredPlan::view))
    }

    async fn get_lesson_plan_by_id(&self, plan_id: PlanId) -> StoreResult<Option<LessonPlan>> {
        Ok(self.inner.read().plans.iter().find(|p| p.id == plan_id).map(StoredPlan::view))
    }

    async fn update_lesson_progress(&self, plan_id: PlanId, index: i32) -> StoreResult<()> {
        if let Some(plan) = self.inner.write().plans.iter_mut().find(|p| p.id == plan_id) {
            plan.current_lesson_index = index;
        }
        Ok(())
    }

    async fn list_lesson_plans(&self, user_id: UserId) -> StoreResult<Vec<LessonPlanSummary>> {
        let inner = self.inner.read();
        let mut plans: Vec<_> = inner
            .plans
            .iter()
            .filter(|p| p.owner == Some(user_id))
            .map(|p| LessonPlanSummary {
                id: p.id,
                persona: p.persona.clone(),
                goals: p.goals.clone(),
                created_at: p.created_at,
            })
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }

    async fn delete_lesson_plan(&self, user_id: UserId, plan_id: PlanId) -> StoreResult<bool> {
        let mut inner = self.inner.write();
        let before = inner.plans.len();
        inner
            .plans
            .retain(|p| !(p.id == plan_id && p.owner == Some(user_id)));
        Ok(inner.plans.len() < before)
    }
}

#[async_trait]
impl CommunityStore for MemoryStore {
    async fn create_post(&self, post: NewPost) -> StoreResult<Post> {
        let mut inner = self.inner.write();
        let created_at = inner.now();
        let post = Post {
            id: inner.posts.len() as i64 + 1,
            user_id: post.user_id,
            author_name: post.author_name,
            title: post.title,
            content: post.content,
            topic: post.topic,
            likes: 0,
            created_at,
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        let mut posts = self.inner.read().posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn create_contact_submission(&self, submission: &ContactSubmission) -> StoreResult<()> {
        self.inner.write().contacts.push(submission.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(owner: Option<UserId>) -> NewLessonPlan {
        NewLessonPlan {
            owner,
            persona: "professional".to_string(),
            goals: "learn rust".to_string(),
            content: r#"{"lessons":[]}"#.to_string(),
        }
    }

    #[tokio::test]
    async fn duplicate_email_leaves_first_user_untouched() {
        let store = MemoryStore::new();
        let first = store.create_user("Ada", "ada@example.com", "h1").await.unwrap();

        let second = store.create_user("Impostor", "ada@example.com", "h2").await;
        assert!(matches!(second, Err(StoreError::DuplicateEmail)));

        let stored = store.get_user_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.name, "Ada");
        assert_eq!(stored.password_hash, "h1");
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create_user("Ada", "ada@example.com", "h").await.unwrap();

        assert!(store.get_user_by_email("ADA@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_plan_wins_and_ignores_other_owners() {
        let store = MemoryStore::new();
        store.save_lesson_plan(plan(Some(1))).await.unwrap();
        let newest = store.save_lesson_plan(plan(Some(1))).await.unwrap();
        store.save_lesson_plan(plan(Some(2))).await.unwrap();
        store.save_lesson_plan(plan(None)).await.unwrap();

        let latest = store.get_latest_lesson_plan(1).await.unwrap().unwrap();
        assert_eq!(latest.id, newest);
        assert_eq!(latest.current_lesson_index, 0);
    }

    #[tokio::test]
    async fn cursor_accepts_values_past_the_lesson_count() {
        let store = MemoryStore::new();
        let id = store.save_lesson_plan(plan(Some(1))).await.unwrap();

        store.update_lesson_progress(id, 999).await.unwrap();
        let latest = store.get_latest_lesson_plan(1).await.unwrap().unwrap();
        assert_eq!(latest.current_lesson_index, 999);
    }

    #[tokio::test]
    async fn delete_requires_ownership() {
        let store = MemoryStore::new();
        let id = store.save_lesson_plan(plan(Some(1))).await.unwrap();

        assert!(!store.delete_lesson_plan(2, id).await.unwrap());
        assert!(store.delete_lesson_plan(1, id).await.unwrap());
        assert!(store.get_lesson_plan_by_id(id).await.unwrap().is_none());
    }
}
