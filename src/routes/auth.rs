//! Auth routes for registration and login

use axum::{Json, extract::State};

use crate::auth::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::auth::password::{hash_password, random_secret, verify_password};
use crate::database::{StoreError, User};
use crate::error::{ApiError, ApiResult};
use crate::routes::JsonBody;
use crate::server::AppState;

/// `POST /api/signup`
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email, and password are required".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("Error hashing password: {}", e)))?;

    let user = state
        .store
        .create_user(&req.name, &req.email, &password_hash)
        .await?;
    tracing::info!("👤 New user {} signed up", user.id);

    Ok(Json(issue_session(&state, user)?))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let user = state
        .store
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!("🔐 Failed login for user {}", user.id);
        return Err(invalid());
    }

    Ok(Json(issue_session(&state, user)?))
}

/// Token plus public user record
pub(crate) fn issue_session(state: &AppState, user: User) -> ApiResult<AuthResponse> {
    let token = state.jwt_service.issue(user.id)?;
    Ok(AuthResponse { token, user })
}

/// Find the user behind an externally verified email, creating it on first
/// sight. The stored hash is of a random secret so password login never
/// matches.
pub(crate) async fn find_or_create_user(state: &AppState, email: &str, name: &str) -> ApiResult<User> {
    if let Some(user) = state.store.get_user_by_email(email).await? {
        return Ok(user);
    }

    let password_hash = hash_password(&random_secret())
        .map_err(|e| ApiError::Internal(format!("Error hashing password: {}", e)))?;

    match state.store.create_user(name, email, &password_hash).await {
        Ok(user) => {
            tracing::info!("👤 Created user {} from social login", user.id);
            Ok(user)
        }
        // Lost a race with a concurrent first login
        Err(StoreError::DuplicateEmail) => state
            .store
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Internal("Error creating user".to_string())),
        Err(e) => Err(e.into()),
    }
}
