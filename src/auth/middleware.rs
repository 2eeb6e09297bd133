//! Authentication Middleware
//!
//! Axum middleware that resolves `Authorization: Bearer <token>` into an
//! [`AuthUser`] request extension, either rejecting or tolerating failure.

use axum::{
    extract::{Request, State},
    http::{Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::auth::{
    jwt::{JwtService, TokenError},
    models::AuthUser,
};
use crate::error::ApiError;

/// Authentication middleware that validates JWT tokens and injects user info
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Required mode: 401 unless a valid, unexpired token is presented
    pub async fn require_auth(
        State(jwt_service): State<Arc<JwtService>>,
        mut req: Request,
        next: Next,
    ) -> Response {
        // Preflight is answered by the CORS boundary
        if req.method() == Method::OPTIONS {
            return next.run(req).await;
        }

        let Some(token) = bearer_token(&req) else {
            tracing::warn!("[AuthMiddleware] Missing bearer token for {} {}", req.method(), req.uri());
            return ApiError::Unauthorized("Authorization header required".to_string()).into_response();
        };

        match resolve(&jwt_service, token) {
            Some(auth_user) => {
                req.extensions_mut().insert(auth_user);
                next.run(req).await
            }
            None => ApiError::Unauthorized("Invalid token".to_string()).into_response(),
        }
    }

    /// Optional authentication - doesn't fail if no token is provided
    pub async fn optional_auth(
        State(jwt_service): State<Arc<JwtService>>,
        mut req: Request,
        next: Next,
    ) -> Response {
        if let Some(auth_user) = bearer_token(&req).and_then(|token| resolve(&jwt_service, token)) {
            req.extensions_mut().insert(auth_user);
        }

        next.run(req).await
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify a token. The reason for a rejection is only ever logged.
fn resolve(jwt_service: &JwtService, token: &str) -> Option<AuthUser> {
    match jwt_service.verify(token) {
        Ok(id) => Some(AuthUser { id }),
        Err(TokenError::Expired) => {
            tracing::warn!("[AuthMiddleware] Token expired");
            None
        }
        Err(e) => {
            tracing::warn!("[AuthMiddleware] Token rejected: {}", e);
            None
        }
    }
}
