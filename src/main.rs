//! # CodeFuture Server
//!
//! Backend for the CodeFuture learning platform, built with Rust, Axum and
//! Tokio. It authenticates learners, asks a generative-AI service for lesson
//! plans and roadmaps, and tracks each learner's progress through them.
//!
//! ## Features
//! - Email/password signup and login with stateless JWT bearer tokens
//! - Google and GitHub social login
//! - AI generated lesson plans, custom roadmaps, tutor chat and code runs
//! - Persisted roadmap progress cursor
//! - Community posts and contact form submissions
//!
//! ## Architecture
//! - `server`: router assembly and the listener loop
//! - `cors`: cross-origin headers and preflight answers for every route
//! - `config`: environment driven configuration, read once at startup
//! - `auth`: token codec, password hashing, auth gate and OAuth providers
//! - `database`: PostgreSQL backed stores with a degraded no-op mode
//! - `ai`: client for the chat-completions collaborator
//! - `services`: roadmap progress controller and outbound mail
//! - `routes`: HTTP handlers grouped by feature
//!
//! ## Running the Server
//! ```bash
//! cp .env.example .env   # set AI_API_KEY, JWT_SECRET, DATABASE_URL
//! cargo run
//! ```
//!
//! The server listens on `http://0.0.0.0:8081` by default:
//! ```bash
//! curl http://localhost:8081/ping
//! ```

mod ai;
mod auth;
mod config;
mod cors;
mod database;
mod error;
mod routes;
mod server;
mod services;

#[cfg(test)]
mod test_support;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine, the process environment still applies
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    tracing::info!("🏁 Starting CodeFuture Server...");
    tracing::info!("📦 Package: {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    tracing::info!("🏗️  Build profile: {}", if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    });

    let config = Config::from_env()?;

    server::start(config).await
}
