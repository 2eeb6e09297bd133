//! Posts and contact submissions.

use async_trait::async_trait;

use crate::database::connection::DatabaseConnection;
use crate::database::models::{ContactSubmission, FromRow, NewPost, Post};
use crate::database::store::{CommunityStore, ContactStore, StoreResult};

#[async_trait]
impl CommunityStore for DatabaseConnection {
    async fn create_post(&self, post: NewPost) -> StoreResult<Post> {
        let client = self.require_client().await?;
        let row = client
            .query_one(
                "INSERT INTO posts (user_id, author_name, title, content, topic) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING id, user_id, author_name, title, content, topic, likes, created_at",
                &[&post.user_id, &post.author_name, &post.title, &post.content, &post.topic],
            )
            .await?;

        Ok(Post::from_row(&row)?)
    }

    async fn list_posts(&self) -> StoreResult<Vec<Post>> {
        let Some(client) = self.client().await? else {
            return Ok(Vec::new());
        };
        let rows = client
            .query(
                "SELECT id, user_id, author_name, title, content, topic, likes, created_at \
                 FROM posts ORDER BY created_at DESC, id DESC",
                &[],
            )
            .await?;

        Ok(rows.iter().map(Post::from_row).collect::<Result<_, _>>()?)
    }
}

#[async_trait]
impl ContactStore for DatabaseConnection {
    async fn create_contact_submission(&self, submission: &ContactSubmission) -> StoreResult<()> {
        let Some(client) = self.client().await? else {
            return Ok(());
        };
        client
            .execute(
                "INSERT INTO contact_submissions (first_name, last_name, email, message, user_id) \
                 VALUES ($1, $2, $3, $4, $5)",
                &[
                    &submission.first_name,
                    &submission.last_name,
                    &submission.email,
                    &submission.message,
                    &submission.user_id,
                ],
            )
            .await?;

        Ok(())
    }
}
