//! Lesson plans, saved courses and the tutor endpoints.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ai::ChatTurn;
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::database::{LessonPlanSummary, NewLessonPlan, PlanId};
use crate::error::{ApiError, ApiResult};
use crate::routes::{JsonBody, QueryParams};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LessonPlanRequest {
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub goals: String,
}

#[derive(Debug, Serialize)]
pub struct LessonPlanResponse {
    pub id: PlanId,
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub current_code: String,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct TextResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CourseQuery {
    pub id: Option<String>,
}

/// `POST /api/lesson-plan`. Anonymous callers get an unowned plan.
pub async fn create_lesson_plan(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    JsonBody(req): JsonBody<LessonPlanRequest>,
) -> ApiResult<Json<LessonPlanResponse>> {
    let text = state.tutor.generate_lesson_plan(&req.persona, &req.goals).await?;

    let id = state
        .store
        .save_lesson_plan(NewLessonPlan {
            owner: user.map(|u| u.id),
            persona: req.persona,
            goals: req.goals,
            content: text.clone(),
        })
        .await?;

    match user {
        Some(user) => tracing::info!("📚 Saved lesson plan {} for user {}", id, user.id),
        None => tracing::info!("📚 Saved anonymous lesson plan {}", id),
    }

    Ok(Json(LessonPlanResponse { id, text }))
}

/// `GET /api/courses`: the caller's plans, newest first
pub async fn list_courses(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<LessonPlanSummary>>> {
    Ok(Json(state.store.list_lesson_plans(user.id).await?))
}

/// `DELETE /api/courses?id=N`. Plans owned by someone else are left alone.
pub async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<CourseQuery>,
) -> ApiResult<Json<Value>> {
    let raw = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing id parameter".to_string()))?;
    let plan_id: PlanId = raw
        .parse()
        .map_err(|_| ApiError::Validation("Invalid id parameter".to_string()))?;

    if state.store.delete_lesson_plan(user.id, plan_id).await? {
        tracing::info!("🗑️  User {} deleted course {}", user.id, plan_id);
    }

    Ok(Json(json!({ "status": "deleted" })))
}

/// `POST /api/chat`
pub async fn chat(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ChatRequest>,
) -> ApiResult<Json<TextResponse>> {
    let text = state
        .tutor
        .chat(&req.persona, &req.current_code, &req.message, &req.history)
        .await?;
    Ok(Json(TextResponse { text }))
}

/// `POST /api/execute`: interpreter output as predicted by the tutor
pub async fn execute(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ExecuteRequest>,
) -> ApiResult<Json<TextResponse>> {
    let text = state.tutor.execute_code(&req.code, &req.language).await?;
    Ok(Json(TextResponse { text }))
}

#[cfg(test)]
mod tests {
    use crate::database::store::ProgressStore;
    use crate::test_support::{StubTutor, TestApp, send};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    fn plan_request() -> serde_json::Value {
        json!({ "persona": "kid", "goals": "make a game" })
    }

    #[tokio::test]
    async fn anonymous_lesson_plan_has_no_owner() {
        let app = TestApp::new();
        let (status, body) =
            send(&app.router, Method::POST, "/api/lesson-plan", None, Some(plan_request())).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("make a game"));

        let plan = app.store.get_lesson_plan_by_id(body["id"].as_i64().unwrap()).await.unwrap().unwrap();
        assert_eq!(plan.owner, None);
    }

    #[tokio::test]
    async fn signed_in_lesson_plan_shows_up_in_courses() {
        let app = TestApp::new();
        let (token, _) = app.signup("Ada", "ada@example.com", "secret123").await;

        let (_, first) =
            send(&app.router, Method::POST, "/api/lesson-plan", Some(&token), Some(plan_request())).await;
        let (_, second) = send(
            &app.router,
            Method::POST,
            "/api/lesson-plan",
            Some(&token),
            Some(json!({ "persona": "professional", "goals": "learn sql" })),
        )
        .await;
        // Someone else's plan must not leak into the list
        send(&app.router, Method::POST, "/api/lesson-plan", None, Some(plan_request())).await;

        let (status, body) = send(&app.router, Method::GET, "/api/courses", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let courses = body.as_array().unwrap();
        assert_eq!(courses.len(), 2);
        assert_eq!(courses[0]["id"], second["id"]);
        assert_eq!(courses[0]["goals"], "learn sql");
        assert_eq!(courses[1]["id"], first["id"]);
    }

    #[tokio::test]
    async fn invalid_token_on_lesson_plan_is_treated_as_anonymous() {
        let app = TestApp::new();
        let (status, body) =
            send(&app.router, Method::POST, "/api/lesson-plan", Some("bogus"), Some(plan_request())).await;
        assert_eq!(status, StatusCode::OK);

        let plan = app.store.get_lesson_plan_by_id(body["id"].as_i64().unwrap()).await.unwrap().unwrap();
        assert_eq!(plan.owner, None);
    }

    #[tokio::test]
    async fn lesson_plan_tutor_failure_saves_nothing() {
        let app = TestApp::with_tutor(StubTutor::failing());
        let (status, _) =
            send(&app.router, Method::POST, "/api/lesson-plan", None, Some(plan_request())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(app.store.plan_count(), 0);
    }

    #[tokio::test]
    async fn courses_require_auth() {
        let app = TestApp::new();
        let (status, _) = send(&app.router, Method::GET, "/api/courses", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn delete_only_touches_own_courses() {
        let app = TestApp::new();
        let (ada, _) = app.signup("Ada", "ada@example.com", "secret123").await;
        let (eve, _) = app.signup("Eve", "eve@example.com", "secret123").await;

        let (_, plan) =
            send(&app.router, Method::POST, "/api/lesson-plan", Some(&ada), Some(plan_request())).await;
        let id = plan["id"].as_i64().unwrap();

        let uri = format!("/api/courses?id={id}");
        let (status, body) = send(&app.router, Method::DELETE, &uri, Some(&eve), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "deleted" }));
        assert!(app.store.get_lesson_plan_by_id(id).await.unwrap().is_some());

        let (status, _) = send(&app.router, Method::DELETE, &uri, Some(&ada), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(app.store.get_lesson_plan_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_needs_a_numeric_id() {
        let app = TestApp::new();
        let (token, _) = app.signup("Ada", "ada@example.com", "secret123").await;

        let (status, body) = send(&app.router, Method::DELETE, "/api/courses", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing id parameter");

        let (status, body) =
            send(&app.router, Method::DELETE, "/api/courses?id=x", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid id parameter");
    }

    #[tokio::test]
    async fn chat_passes_history_and_persona() {
        let app = TestApp::new();
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/chat",
            None,
            Some(json!({
                "message": "why does this loop forever?",
                "history": [{ "role": "user", "text": "hi" }, { "role": "model", "text": "hello" }],
                "persona": "kid",
                "currentCode": "while True: pass"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "text": "[kid/2] why does this loop forever?" }));
    }

    #[tokio::test]
    async fn execute_returns_tutor_output() {
        let app = TestApp::new();
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/execute",
            None,
            Some(json!({ "code": "print(1)", "language": "python" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "python: ok");
    }

    #[tokio::test]
    async fn execute_surfaces_tutor_failure() {
        let app = TestApp::with_tutor(StubTutor::failing());
        let (status, body) = send(
            &app.router,
            Method::POST,
            "/api/execute",
            None,
            Some(json!({ "code": "print(1)", "language": "python" })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "AI provider error: stub tutor is down");
    }
}
