//! Consultation Event Logger
//!
//! One structured event per dispatch step, emitted on the `consult_events` target.
//! Question text is never logged; only its length.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsultEvent {
    Dispatched {
        persona: String,
        model: String,
        input_chars: usize,
    },
    Answered {
        persona: String,
        tokens_used: u64,
        latency_ms: u64,
    },
    Failed {
        persona: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct ConsultLogEntry {
    pub timestamp: DateTime<Utc>,
    pub event: ConsultEvent,
}

pub struct ConsultLogger;

impl ConsultLogger {
    /// Builds the log entry for `event`, scrubbing secrets from error text.
    pub fn entry(mut event: ConsultEvent) -> ConsultLogEntry {
        if let ConsultEvent::Failed { error_msg, .. } = &mut event {
            *error_msg = redact_sensitive_data(error_msg);
        }

        ConsultLogEntry {
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(event: ConsultEvent) {
        let entry = Self::entry(event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: "consult_events", event = %json, "Consultation event");
    }
}
