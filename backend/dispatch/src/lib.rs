pub mod dispatcher;
pub mod providers;

pub use dispatcher::{Dispatcher, MAX_TOKENS, MODEL, TEMPERATURE};
