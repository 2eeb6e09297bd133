//! # Server Module
//!
//! HTTP server setup and route configuration for the CodeFuture server.

use anyhow::Context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::ai::{AiClient, Tutor};
use crate::auth::{AuthMiddleware, JwtService, oauth::OAuthProviders};
use crate::config::Config;
use crate::cors::cors;
use crate::database::{DatabaseConnection, Store};
use crate::error::ApiError;
use crate::routes::{auth, community, contact, health, lessons, math, roadmap, social};
use crate::services::{Mailer, RoadmapController, mailer};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt_service: Arc<JwtService>,
    pub tutor: Arc<dyn Tutor>,
    pub roadmaps: RoadmapController,
    pub mailer: Arc<dyn Mailer>,
    pub oauth: Arc<OAuthProviders>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn Store>,
        tutor: Arc<dyn Tutor>,
        mailer: Arc<dyn Mailer>,
        oauth: OAuthProviders,
    ) -> Self {
        Self {
            jwt_service: Arc::new(JwtService::new(&config.jwt_secret)),
            roadmaps: RoadmapController::new(store.clone(), tutor.clone()),
            store,
            tutor,
            mailer,
            oauth: Arc::new(oauth),
            config: Arc::new(config),
        }
    }
}

/// Assemble every route behind the CORS boundary and request tracing
pub fn build_router(state: AppState) -> Router {
    let jwt_service = state.jwt_service.clone();

    // Identity required
    let protected_routes = Router::new()
        .route("/api/roadmap", get(roadmap::get_roadmap))
        .route("/api/roadmap/generate", post(roadmap::generate_roadmap))
        .route(
            "/api/courses",
            get(lessons::list_courses).delete(lessons::delete_course),
        )
        .route_layer(middleware::from_fn_with_state(
            jwt_service.clone(),
            AuthMiddleware::require_auth,
        ));

    // Identity attached when present
    let optional_routes = Router::new()
        .route("/api/lesson-plan", post(lessons::create_lesson_plan))
        .route(
            "/api/community/posts",
            get(community::list_posts).post(community::create_post),
        )
        .route("/api/contact", post(contact::submit_contact))
        .route_layer(middleware::from_fn_with_state(
            jwt_service,
            AuthMiddleware::optional_auth,
        ));

    let public_routes = Router::new()
        .route("/ping", get(health::ping))
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/chat", post(lessons::chat))
        .route("/api/execute", post(lessons::execute))
        .route("/api/math", post(math::add))
        .route("/api/roadmap/progress", post(roadmap::update_progress))
        .route("/api/roadmap/view", get(roadmap::view_roadmap))
        .route("/api/auth/social-demo", post(social::demo_login))
        .route("/api/auth/{provider}/login", get(social::login))
        .route("/api/auth/{provider}/callback", get(social::callback));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(optional_routes)
        .fallback(|| async { ApiError::NotFound("Not found".to_string()) })
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(cors))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

/// Starts the CodeFuture HTTP server.
///
/// Connects the store (degrading when the database is unreachable), builds
/// the AI and OAuth collaborators from `config` and serves until the process
/// exits.
pub async fn start(config: Config) -> anyhow::Result<()> {
    let db = DatabaseConnection::connect(config.database.as_ref()).await;
    if db.is_degraded() {
        tracing::warn!("⚠️  Running without a database, data will not be persisted");
    }

    let tutor = AiClient::new(&config.ai).context("failed to build AI client")?;
    let oauth = OAuthProviders::from_config(&config.oauth).context("invalid oauth configuration")?;
    let mailer = mailer::from_config(&config.smtp).context("invalid SMTP configuration")?;

    let host = config.server.host.clone();
    let port = config.server.port;

    let state = AppState::new(
        config,
        Arc::new(db),
        Arc::new(tutor),
        mailer,
        oauth,
    );
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {} - port may already be in use", addr))?;

    tracing::info!("🚀 CodeFuture server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);
    tracing::info!("🗺️  Roadmap endpoints available at http://{}/api/roadmap/*", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
