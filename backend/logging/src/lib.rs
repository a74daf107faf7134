//! Telemetry and structured logging for Expert Desk.
//!
//! Handles subscriber setup, secret redaction, and consultation event logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{ConsultEvent, ConsultLogEntry, ConsultLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
