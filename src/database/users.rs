//! Credential store backed by the `users` table.

use async_trait::async_trait;
use tokio_postgres::error::SqlState;

use crate::database::connection::DatabaseConnection;
use crate::database::models::{FromRow, User, UserId};
use crate::database::store::{CredentialStore, StoreError, StoreResult};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

#[async_trait]
impl CredentialStore for DatabaseConnection {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> StoreResult<User> {
        let client = self.require_client().await?;
        let row = client
            .query_one(
                &format!(
                    "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
                    USER_COLUMNS
                ),
                &[&name, &email, &password_hash],
            )
            .await
            .map_err(|e| {
                if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
                    StoreError::DuplicateEmail
                } else {
                    StoreError::Query(e)
                }
            })?;

        Ok(User::from_row(&row)?)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let Some(client) = self.client().await? else {
            return Ok(None);
        };
        let row = client
            .query_opt(
                &format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS),
                &[&email],
            )
            .await?;

        Ok(row.as_ref().map(User::from_row).transpose()?)
    }

    async fn get_user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let Some(client) = self.client().await? else {
            return Ok(None);
        };
        let row = client
            .query_opt(
                &format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS),
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(User::from_row).transpose()?)
    }
}
