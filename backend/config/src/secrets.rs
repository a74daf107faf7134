//! Credential sources: the hosted secret store and the process environment.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

/// Anything that can answer "what is the value of secret `key`?".
pub trait SecretSource {
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The hosted secret store: a TOML file of top-level `KEY = "value"` entries.
#[derive(Debug, Default)]
pub struct SecretsFile {
    path: Option<PathBuf>,
    entries: toml::Table,
}

impl SecretsFile {
    /// An empty store, as if no secrets file were deployed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the store from `path`.
    ///
    /// A missing file yields an empty store. Read or parse failures are
    /// logged and also yield an empty store, so resolution can fall through
    /// to the environment.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Secrets file does not exist; store is empty");
            return Self {
                path: Some(path.to_path_buf()),
                entries: toml::Table::new(),
            };
        }

        match Self::try_load(path) {
            Ok(store) => {
                info!(path = %path.display(), entries = store.entries.len(), "Loaded secrets file");
                store
            }
            Err(e) => {
                warn!(path = %path.display(), error = %format!("{e:#}"), "Ignoring unreadable secrets file");
                Self {
                    path: Some(path.to_path_buf()),
                    entries: toml::Table::new(),
                }
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read secrets file: {}", path.display()))?;
        let entries = Self::parse(&raw)
            .with_context(|| format!("Failed to parse secrets TOML at: {}", path.display()))?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
        })
    }

    fn parse(raw: &str) -> Result<toml::Table> {
        Ok(raw.parse::<toml::Table>()?)
    }

    /// Build a store from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(Self {
            path: None,
            entries: Self::parse(raw)?,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl SecretSource for SecretsFile {
    fn lookup(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

/// The process environment, or a fixed map standing in for it.
#[derive(Debug, Default)]
pub enum EnvSource {
    #[default]
    Process,
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl SecretSource for EnvSource {
    fn lookup(&self, key: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(key).ok(),
            EnvSource::Fixed(map) => map.get(key).cloned(),
        }
    }
}
