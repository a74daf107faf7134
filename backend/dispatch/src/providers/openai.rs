use std::time::Instant;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use expertdesk_config::Credential;
use expertdesk_core::{LlmProvider, LlmRequest, LlmResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions provider.
pub struct OpenAiProvider {
    client: Client,
    credential: Credential,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(credential: Credential) -> Self {
        Self {
            client: Client::new(),
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<u64>,
}

impl ChatRequest {
    /// System message first, then the user's text.
    fn from_request(request: &LlmRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(request.system_prompt.clone()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(request.user_prompt.clone()),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let start = Instant::now();
        let body = ChatRequest::from_request(request);

        debug!(
            model = %request.model,
            base_url = %self.base_url,
            "Sending request to OpenAI"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.credential.api_key())
            .json(&body)
            .send()
            .await
            .context("OpenAI HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("OpenAI returned {}: {}", status, error_body);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        let Some(first) = chat_response.choices.into_iter().next() else {
            bail!("completion returned no choices");
        };

        let tokens_used = chat_response
            .usage
            .and_then(|u| u.total_tokens)
            .unwrap_or(0);

        let latency_ms = start.elapsed().as_millis() as u64;

        Ok(LlmResponse {
            content: first.message.content.unwrap_or_default(),
            provider: "openai".to_string(),
            model: chat_response.model.unwrap_or_else(|| request.model.clone()),
            tokens_used,
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use expertdesk_config::CredentialOrigin;
    use serde_json::{json, Value};

    #[derive(Clone)]
    struct Upstream {
        status: StatusCode,
        reply: Value,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn chat_completions(
        State(upstream): State<Upstream>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        upstream.seen.lock().unwrap().push((auth, body));
        (upstream.status, Json(upstream.reply.clone()))
    }

    /// Serve a fake `/v1/chat/completions` on an ephemeral port.
    async fn spawn_upstream(status: StatusCode, reply: Value) -> (String, Upstream) {
        let upstream = Upstream {
            status,
            reply,
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .with_state(upstream.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), upstream)
    }

    fn provider(base_url: &str) -> OpenAiProvider {
        OpenAiProvider::new(Credential::new("sk-test", CredentialOrigin::Environment))
            .with_base_url(base_url)
    }

    fn request() -> LlmRequest {
        LlmRequest {
            model: "gpt-3.5-turbo".into(),
            system_prompt: "You are an experienced IT engineer.".into(),
            user_prompt: "How do I fix a null pointer error?".into(),
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(ChatRequest::from_request(&request())).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 1000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(
            body["messages"],
            json!([
                {"role": "system", "content": "You are an experienced IT engineer."},
                {"role": "user", "content": "How do I fix a null pointer error?"}
            ])
        );
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        assert_eq!(provider("http://localhost:9/v1/").base_url(), "http://localhost:9/v1");
    }

    #[tokio::test]
    async fn returns_first_choice_content() {
        let (base, upstream) = spawn_upstream(
            StatusCode::OK,
            json!({
                "model": "gpt-3.5-turbo-0125",
                "choices": [
                    {"message": {"role": "assistant", "content": "Check your pointer initialization."}},
                    {"message": {"role": "assistant", "content": "second"}}
                ],
                "usage": {"total_tokens": 57}
            }),
        )
        .await;

        let response = provider(&base).complete(&request()).await.unwrap();
        assert_eq!(response.content, "Check your pointer initialization.");
        assert_eq!(response.model, "gpt-3.5-turbo-0125");
        assert_eq!(response.tokens_used, 57);
        assert_eq!(response.provider, "openai");

        let seen = upstream.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_deref(), Some("Bearer sk-test"));
        assert_eq!(seen[0].1["messages"][1]["content"], "How do I fix a null pointer error?");
    }

    #[tokio::test]
    async fn error_status_includes_body() {
        let (base, _) = spawn_upstream(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": {"message": "Rate limit reached"}}),
        )
        .await;

        let err = provider(&base).complete(&request()).await.unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("429"));
        assert!(text.contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let (base, _) = spawn_upstream(StatusCode::OK, json!({"choices": []})).await;
        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let (base, _) = spawn_upstream(StatusCode::OK, json!({"unexpected": true})).await;
        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse OpenAI response"));
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        let err = provider("http://127.0.0.1:1/v1").complete(&request()).await.unwrap_err();
        assert!(format!("{err:#}").contains("OpenAI HTTP request failed"));
    }
}
