//! Configuration resolver: find the completion-service API key.

use std::fmt;

use tracing::{debug, info};

use crate::secrets::SecretSource;

/// Name of the API key, both in the secret store and in the environment.
pub const API_KEY_NAME: &str = "OPENAI_API_KEY";

/// Where a resolved credential came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    SecretStore,
    Environment,
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialOrigin::SecretStore => f.write_str("secret store"),
            CredentialOrigin::Environment => f.write_str("environment"),
        }
    }
}

/// A resolved API key. Built once at startup and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    api_key: String,
    origin: CredentialOrigin,
}

impl Credential {
    pub fn new(api_key: impl Into<String>, origin: CredentialOrigin) -> Self {
        Self {
            api_key: api_key.into(),
            origin,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn origin(&self) -> CredentialOrigin {
        self.origin
    }

    /// First four characters followed by `***`.
    pub fn masked(&self) -> String {
        mask_secret(&self.api_key)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("api_key", &self.masked())
            .field("origin", &self.origin)
            .finish()
    }
}

pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() > 4 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Resolve the API key: secret store first, then the environment.
///
/// Values are trimmed; an empty value counts as absent. `None` means the
/// caller must not dispatch and should show setup instructions instead.
pub fn resolve_credential(secrets: &dyn SecretSource, env: &dyn SecretSource) -> Option<Credential> {
    let sources: [(&dyn SecretSource, CredentialOrigin); 2] = [
        (secrets, CredentialOrigin::SecretStore),
        (env, CredentialOrigin::Environment),
    ];

    for (source, origin) in sources {
        match source.lookup(API_KEY_NAME) {
            Some(value) if !value.trim().is_empty() => {
                let credential = Credential::new(value.trim(), origin);
                info!(origin = %origin, key = %credential.masked(), "Resolved API credential");
                return Some(credential);
            }
            Some(_) => debug!(origin = %origin, "API key present but empty; skipping"),
            None => debug!(origin = %origin, "API key not found"),
        }
    }

    None
}
