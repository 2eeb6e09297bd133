//! Contact form.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use crate::auth::MaybeAuthUser;
use crate::database::ContactSubmission;
use crate::error::ApiResult;
use crate::routes::JsonBody;
use crate::server::AppState;
use crate::services::mailer::{admin_notification, user_confirmation};

/// `POST /api/contact`
///
/// Stores the submission, then notifies the support inbox (with a tutor
/// drafted reply when one can be produced) and confirms to the sender.
/// Mail and draft failures are logged and never fail the request.
pub async fn submit_contact(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    JsonBody(mut submission): JsonBody<ContactSubmission>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    submission.user_id = user.map(|u| u.id);

    state.store.create_contact_submission(&submission).await?;

    let draft = match state
        .tutor
        .draft_contact_reply(&submission.first_name, &submission.message)
        .await
    {
        Ok(draft) => Some(draft),
        Err(e) => {
            tracing::warn!("⚠️  Could not draft contact reply: {}", e);
            None
        }
    };

    let admin = admin_notification(&state.config.admin_email, &submission, draft.as_deref());
    if let Err(e) = state.mailer.send(admin).await {
        tracing::error!("Failed to send admin notification: {:#}", e);
    }

    let email = submission.email.trim();
    if email.is_empty() {
        tracing::warn!("No sender email on contact submission, skipping confirmation");
    } else if let Err(e) = state.mailer.send(user_confirmation(&submission.first_name, email)).await {
        tracing::error!("Failed to send confirmation to {}: {:#}", email, e);
    }

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "message": "Ticket created" })),
    ))
}
