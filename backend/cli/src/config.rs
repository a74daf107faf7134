use std::path::PathBuf;

use expertdesk_dispatch::providers::openai::DEFAULT_BASE_URL;

/// Expert Desk server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log level, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Directory for rolling NDJSON log files; console only when unset
    pub log_dir: Option<PathBuf>,
    /// Base URL of the chat-completions API
    pub openai_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8501,
            log_level: "info".to_string(),
            log_dir: None,
            openai_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_address: non_empty("EXPERTDESK_BIND").unwrap_or(defaults.bind_address),
            port: non_empty("EXPERTDESK_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            log_dir: non_empty("EXPERTDESK_LOG_DIR").map(PathBuf::from),
            openai_base_url: non_empty("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
        }
    }
}
