//! Social login: Google/GitHub authorization-code flow and the demo login.

use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use url::Url;

use crate::auth::models::AuthResponse;
use crate::auth::oauth::{OAuthProvider, ProviderKind};
use crate::error::{ApiError, ApiResult};
use crate::routes::auth::{find_or_create_user, issue_session};
use crate::routes::{JsonBody, QueryParams};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DemoLoginRequest {
    #[serde(default)]
    pub provider: String,
}

fn provider<'a>(state: &'a AppState, segment: &str) -> ApiResult<&'a OAuthProvider> {
    ProviderKind::from_path(segment)
        .and_then(|kind| state.oauth.get(kind))
        .ok_or_else(|| ApiError::NotFound(format!("Login provider '{}' is not available", segment)))
}

/// `GET /api/auth/{provider}/login`
pub async fn login(
    State(state): State<AppState>,
    Path(segment): Path<String>,
) -> ApiResult<Redirect> {
    let provider = provider(&state, &segment)?;
    Ok(Redirect::temporary(&provider.authorize_url()))
}

/// `GET /api/auth/{provider}/callback?code=...`
pub async fn callback(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    QueryParams(query): QueryParams<CallbackQuery>,
) -> ApiResult<Redirect> {
    let provider = provider(&state, &segment)?;
    let kind = provider.kind().as_str();

    if let Some(error) = query.error {
        return Err(ApiError::Upstream(format!("{} login was refused: {}", kind, error)));
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing code".to_string()))?;

    let profile = provider.exchange_code(&code).await.map_err(|e| {
        tracing::error!("{} oauth exchange failed: {:#}", kind, e);
        ApiError::Upstream(format!("{} login failed", kind))
    })?;

    let user = find_or_create_user(&state, &profile.email, &profile.name).await?;
    let session = issue_session(&state, user)?;
    tracing::info!("🔑 User {} signed in with {}", session.user.id, kind);

    Ok(Redirect::temporary(&frontend_login_url(
        &state.config.server.frontend_url,
        &session,
    )?))
}

/// `POST /api/auth/social-demo`: sign in as a per-provider demo account
pub async fn demo_login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DemoLoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if req.provider.is_empty() {
        return Err(ApiError::Validation("Invalid request".to_string()));
    }

    let email = format!("demo.{}@example.com", req.provider);
    let name = format!("{} User (Demo)", req.provider);
    let user = find_or_create_user(&state, &email, &name).await?;

    Ok(Json(issue_session(&state, user)?))
}

/// Frontend page that picks the session up from the query string
fn frontend_login_url(frontend_url: &str, session: &AuthResponse) -> ApiResult<String> {
    let mut url = Url::parse(frontend_url)
        .and_then(|base| base.join("login"))
        .map_err(|e| ApiError::Internal(format!("Invalid frontend url: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("token", &session.token)
        .append_pair("user_id", &session.user.id.to_string())
        .append_pair("name", &session.user.name)
        .append_pair("email", &session.user.email);

    Ok(url.into())
}
