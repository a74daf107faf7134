use thiserror::Error;

/// Top-level error type for Expert Desk.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error("unknown persona: {0:?} (expected one of: medical, engineer, consultant, educator, counselor)")]
    UnknownPersona(String),
}
