use serde::Serialize;

/// Prefix that marks a failed consultation in user-facing text.
pub const ERROR_MARKER: &str = "❌";

/// Outcome of one consultation, handed from the dispatcher to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// The completion's first choice, unmodified.
    Answered {
        content: String,
        model: String,
        tokens_used: u64,
        latency_ms: u64,
    },
    /// The completion call failed; `reason` is the full error description.
    Failed {
        #[serde(rename = "error")]
        reason: String,
    },
}

impl Reply {
    pub fn is_answered(&self) -> bool {
        matches!(self, Reply::Answered { .. })
    }

    /// Text shown to the user: the answer itself, or the marked error line.
    pub fn display_text(&self) -> String {
        match self {
            Reply::Answered { content, .. } => content.clone(),
            Reply::Failed { reason } => failure_text(reason),
        }
    }

    pub fn into_display_text(self) -> String {
        match self {
            Reply::Answered { content, .. } => content,
            Reply::Failed { reason } => failure_text(&reason),
        }
    }
}

pub fn failure_text(reason: &str) -> String {
    format!("{ERROR_MARKER} An error occurred: {reason}")
}
