//! `expertdesk-core` — shared types for Expert Desk.
//!
//! Holds the persona table, the non-empty query gate, the reply type passed
//! from dispatcher to presentation, and the completion provider trait.

pub mod error;
pub mod persona;
pub mod query;
pub mod reply;
pub mod traits;

pub use error::DeskError;
pub use persona::{Persona, PersonaProfile};
pub use query::Query;
pub use reply::{failure_text, Reply, ERROR_MARKER};
pub use traits::{LlmProvider, LlmRequest, LlmResponse};
