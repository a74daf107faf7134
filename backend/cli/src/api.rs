use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use expertdesk_core::{Persona, Query, Reply};
use expertdesk_dispatch::Dispatcher;

use crate::page::{self, FormView, Outcome, SETUP_STEPS};

/// Shared application state for handlers.
///
/// `dispatcher` is `None` when no API key could be resolved at startup; every
/// surface then shows setup instructions instead of dispatching.
pub struct AppState {
    pub dispatcher: Option<Dispatcher>,
}

/// Build the Axum router with the page and API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/ask", post(ask))
        .route("/api/health", get(health))
        .route("/api/personas", get(list_personas))
        .route("/api/consult", post(consult))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub persona: Persona,
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct ConsultRequest {
    #[serde(default)]
    pub persona: Persona,
    pub question: String,
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    if state.dispatcher.is_none() {
        return Html(page::render_setup_page());
    }
    Html(page::render_form_page(&FormView::default()))
}

/// Form submission. Blocks until the completion call returns.
async fn ask(State(state): State<Arc<AppState>>, Form(form): Form<AskForm>) -> Html<String> {
    let Some(dispatcher) = &state.dispatcher else {
        return Html(page::render_setup_page());
    };

    let outcome = match Query::new(form.question.as_str()) {
        Some(query) => Outcome::Reply(dispatcher.consult(&query, form.persona).await),
        None => {
            tracing::debug!(persona = %form.persona, "Blank question; not dispatching");
            Outcome::Warning
        }
    };

    Html(page::render_form_page(&FormView {
        persona: form.persona,
        question: form.question,
        outcome: Some(outcome),
    }))
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "expertdesk",
        "version": env!("CARGO_PKG_VERSION"),
        "credential_configured": state.dispatcher.is_some(),
    }))
}

async fn list_personas() -> Json<Value> {
    let personas: Vec<Value> = Persona::ALL
        .iter()
        .map(|p| {
            json!({
                "key": p.key(),
                "label": p.label(),
                "description": p.display_description(),
                "default": *p == Persona::default(),
            })
        })
        .collect();
    Json(json!({ "personas": personas }))
}

/// JSON consultation endpoint.
async fn consult(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConsultRequest>,
) -> Response {
    let Some(dispatcher) = &state.dispatcher else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "OpenAI API key is not configured",
                "setup": SETUP_STEPS,
            })),
        )
            .into_response();
    };

    let Some(query) = Query::new(request.question) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "question must not be empty" })),
        )
            .into_response();
    };

    let reply = dispatcher.consult(&query, request.persona).await;
    Json(reply_body(request.persona, &reply)).into_response()
}

fn reply_body(persona: Persona, reply: &Reply) -> Value {
    let mut body = serde_json::to_value(reply).unwrap_or_else(|_| json!({}));
    if let Value::Object(map) = &mut body {
        map.insert("persona".to_string(), json!(persona.key()));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use expertdesk_dispatch::providers::MockProvider;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app_with(mock: Option<Arc<MockProvider>>) -> Router {
        let dispatcher = mock.map(|m| Dispatcher::new(m));
        build_router(Arc::new(AppState { dispatcher }))
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ask")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/consult")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn index_without_credential_shows_setup_only() {
        let response = app_with(None)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("How to configure the API key"));
        assert!(!html.contains("<form"));
    }

    #[tokio::test]
    async fn index_with_credential_shows_form() {
        let mock = Arc::new(MockProvider::new("mock"));
        let html = body_text(
            app_with(Some(mock))
                .oneshot(Request::get("/").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains(r#"<form method="post" action="/ask""#));
        assert!(html.contains(r#"value="engineer" checked"#));
    }

    #[tokio::test]
    async fn ask_without_credential_does_not_render_form() {
        let html = body_text(
            app_with(None)
                .oneshot(form_post("persona=engineer&question=hello"))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("How to configure the API key"));
        assert!(!html.contains("<form"));
    }

    #[tokio::test]
    async fn blank_question_warns_without_dispatch() {
        let mock = Arc::new(MockProvider::new("mock").with_response("should not appear"));
        let html = body_text(
            app_with(Some(mock.clone()))
                .oneshot(form_post("persona=medical&question=+++%0A"))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("Please enter your question."));
        assert!(!html.contains("should not appear"));
        assert!(html.contains(r#"value="medical" checked"#));
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn ask_renders_answer_for_chosen_persona() {
        let mock = Arc::new(MockProvider::new("mock").with_response("Check your pointer initialization."));
        let html = body_text(
            app_with(Some(mock.clone()))
                .oneshot(form_post(
                    "persona=engineer&question=How+do+I+fix+a+null+pointer+error%3F",
                ))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("<div class=\"content\"><p>Check your pointer initialization.</p>\n</div>"));
        assert!(html.contains("Advice from IT Engineer:"));
        assert!(html.contains("How do I fix a null pointer error?</textarea>"));

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, Persona::Engineer.instruction());
        assert_eq!(requests[0].user_prompt, "How do I fix a null pointer error?");
    }

    #[tokio::test]
    async fn ask_renders_failure_as_marked_text() {
        let mock = Arc::new(MockProvider::new("mock").with_failure("upstream unavailable"));
        let html = body_text(
            app_with(Some(mock))
                .oneshot(form_post("persona=counselor&question=help"))
                .await
                .unwrap(),
        )
        .await;
        assert!(html.contains("❌ An error occurred: upstream unavailable"));
    }

    #[tokio::test]
    async fn unknown_persona_is_rejected_before_dispatch() {
        let mock = Arc::new(MockProvider::new("mock"));
        let response = app_with(Some(mock.clone()))
            .oneshot(form_post("persona=astronaut&question=hello"))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn health_reports_credential_state() {
        let body = body_text(
            app_with(None)
                .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["credential_configured"], false);
    }

    #[tokio::test]
    async fn personas_listed_in_order_with_default() {
        let body = body_text(
            app_with(None)
                .oneshot(Request::get("/api/personas").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        let value: Value = serde_json::from_str(&body).unwrap();
        let personas = value["personas"].as_array().unwrap();
        let keys: Vec<&str> = personas.iter().map(|p| p["key"].as_str().unwrap()).collect();
        assert_eq!(keys, ["medical", "engineer", "consultant", "educator", "counselor"]);
        assert_eq!(personas[1]["default"], true);
        assert_eq!(personas[0]["default"], false);
    }

    #[tokio::test]
    async fn consult_json_answers() {
        let mock = Arc::new(MockProvider::new("mock").with_response("Set goals weekly."));
        let response = app_with(Some(mock))
            .oneshot(json_post(json!({"persona": "consultant", "question": "How to plan?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["status"], "answered");
        assert_eq!(value["persona"], "consultant");
        assert_eq!(value["content"], "Set goals weekly.");
        assert_eq!(value["model"], "gpt-3.5-turbo");
    }

    #[tokio::test]
    async fn consult_json_failure_is_200_with_error() {
        let mock = Arc::new(MockProvider::new("mock").with_failure("401 Unauthorized"));
        let response = app_with(Some(mock))
            .oneshot(json_post(json!({"persona": "medical", "question": "fever?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["error"], "401 Unauthorized");
    }

    #[tokio::test]
    async fn consult_json_blank_question_is_422() {
        let mock = Arc::new(MockProvider::new("mock"));
        let response = app_with(Some(mock.clone()))
            .oneshot(json_post(json!({"question": "  "})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn consult_json_without_credential_is_503() {
        let response = app_with(None)
            .oneshot(json_post(json!({"question": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let value: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["setup"].as_array().unwrap().len(), 3);
    }
}
