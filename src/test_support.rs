//! Shared fixtures for the HTTP and service tests.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::ai::{AiError, ChatTurn, Tutor};
use crate::auth::{JwtService, oauth::OAuthProviders};
use crate::config::Config;
use crate::database::memory::MemoryStore;
use crate::database::UserId;
use crate::server::{AppState, build_router};
use crate::services::mailer::{Mailer, OutgoingMail};

pub const STUB_ROADMAP: &str =
    r#"{"title":"Stub roadmap","lessons":[{"id":"1","title":"Variables"},{"id":"2","title":"Loops"}]}"#;

/// Deterministic tutor, optionally failing every call
#[derive(Debug, Default)]
pub struct StubTutor {
    fail: bool,
}

impl StubTutor {
    pub fn failing() -> Self {
        Self { fail: true }
    }

    fn check(&self) -> Result<(), AiError> {
        if self.fail {
            Err(AiError::Provider("stub tutor is down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Tutor for StubTutor {
    async fn generate_lesson_plan(&self, persona: &str, goals: &str) -> Result<String, AiError> {
        self.check()?;
        Ok(format!(r#"{{"title":"{persona}: {goals}","lessons":[]}}"#))
    }

    async fn generate_roadmap(&self, _: &str, _: &str, _: &str, _: &str) -> Result<String, AiError> {
        self.check()?;
        Ok(STUB_ROADMAP.to_string())
    }

    async fn chat(
        &self,
        persona: &str,
        _current_code: &str,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, AiError> {
        self.check()?;
        Ok(format!("[{persona}/{}] {message}", history.len()))
    }

    async fn execute_code(&self, _code: &str, language: &str) -> Result<String, AiError> {
        self.check()?;
        Ok(format!("{language}: ok"))
    }

    async fn draft_contact_reply(&self, first_name: &str, _message: &str) -> Result<String, AiError> {
        self.check()?;
        Ok(format!("Thanks {first_name}!"))
    }
}

/// Keeps every message instead of sending it
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> anyhow::Result<()> {
        self.sent.lock().push(mail);
        Ok(())
    }
}

/// The real router wired to in-memory collaborators
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub jwt: Arc<JwtService>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(Config::for_tests(), StubTutor::default())
    }

    pub fn with_tutor(tutor: StubTutor) -> Self {
        Self::build(Config::for_tests(), tutor)
    }

    pub fn build(config: Config, tutor: StubTutor) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let oauth = OAuthProviders::from_config(&config.oauth).expect("test oauth config");

        let state = AppState::new(config, store.clone(), Arc::new(tutor), mailer.clone(), oauth);
        let jwt = state.jwt_service.clone();

        Self { router: build_router(state), store, mailer, jwt }
    }

    /// Sign up through the API and return `(token, user id)`
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> (String, UserId) {
        let (status, body) = send(
            &self.router,
            Method::POST,
            "/api/signup",
            None,
            Some(serde_json::json!({ "name": name, "email": email, "password": password })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "signup failed: {body}");

        let token = body["token"].as_str().expect("token").to_string();
        let id = body["user"]["id"].as_i64().expect("user id");
        (token, id)
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn send_raw(router: &Router, req: Request<Body>) -> Response {
    router.clone().oneshot(req).await.expect("router is infallible")
}

/// Send a request and decode the JSON reply (`Null` for an empty body)
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(router, request(method, uri, token, body)).await;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}
