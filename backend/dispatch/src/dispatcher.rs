use std::sync::Arc;

use tracing::{info, warn};

use expertdesk_core::{LlmProvider, LlmRequest, Persona, Query, Reply};
use expertdesk_logging::{redact_sensitive_data, ConsultEvent, ConsultLogger};

/// Model every consultation is sent to.
pub const MODEL: &str = "gpt-3.5-turbo";
pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 1000;

/// Sends a question to the completion service in the voice of a persona.
///
/// Provider failures never escape: they come back as `Reply::Failed`.
#[derive(Clone)]
pub struct Dispatcher {
    provider: Arc<dyn LlmProvider>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The exact request sent for `query` under `persona`.
    pub fn build_request(query: &Query, persona: Persona) -> LlmRequest {
        LlmRequest {
            model: MODEL.to_string(),
            system_prompt: persona.instruction().to_string(),
            user_prompt: query.as_str().to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    /// Issue one completion call and classify the outcome.
    pub async fn consult(&self, query: &Query, persona: Persona) -> Reply {
        let request = Self::build_request(query, persona);

        ConsultLogger::log_event(ConsultEvent::Dispatched {
            persona: persona.key().to_string(),
            model: request.model.clone(),
            input_chars: query.char_count(),
        });

        match self.provider.complete(&request).await {
            Ok(response) => {
                info!(
                    persona = %persona,
                    provider = %response.provider,
                    tokens = response.tokens_used,
                    latency_ms = response.latency_ms,
                    "Consultation answered"
                );
                ConsultLogger::log_event(ConsultEvent::Answered {
                    persona: persona.key().to_string(),
                    tokens_used: response.tokens_used,
                    latency_ms: response.latency_ms,
                });
                Reply::Answered {
                    content: response.content,
                    model: response.model,
                    tokens_used: response.tokens_used,
                    latency_ms: response.latency_ms,
                }
            }
            Err(e) => {
                let reason = redact_sensitive_data(&format!("{e:#}"));
                warn!(persona = %persona, provider = %self.provider.name(), error = %reason, "Consultation failed");
                ConsultLogger::log_event(ConsultEvent::Failed {
                    persona: persona.key().to_string(),
                    error_msg: reason.clone(),
                });
                Reply::Failed { reason }
            }
        }
    }

    /// Fail-soft variant of [`consult`](Self::consult): always a displayable string.
    pub async fn respond(&self, query: &Query, persona: Persona) -> String {
        self.consult(query, persona).await.into_display_text()
    }
}
