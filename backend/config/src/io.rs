//! Config directory and secrets file locations.

use std::path::{Path, PathBuf};

/// File name of the hosted secret store within the config directory.
const SECRETS_FILE_NAME: &str = "secrets.toml";

/// Resolve the Expert Desk config directory.
/// Priority: `EXPERTDESK_CONFIG_DIR` env > `~/.expertdesk/` > `./.expertdesk/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("EXPERTDESK_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".expertdesk");
    }
    PathBuf::from(".expertdesk")
}

/// Resolve the secrets file path.
/// Priority: `EXPERTDESK_SECRETS_FILE` env > `<config_dir>/secrets.toml`
pub fn secrets_file_path(config_dir: &Path) -> PathBuf {
    match std::env::var("EXPERTDESK_SECRETS_FILE") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => config_dir.join(SECRETS_FILE_NAME),
    }
}
