//! `expertdesk-config` — configuration resolution for Expert Desk.
//!
//! Provides:
//! - The hosted secret store (`secrets.toml`) and environment sources
//! - Credential resolution with secret-store priority
//! - Config directory discovery

pub mod credential;
pub mod io;
pub mod secrets;

pub use credential::{mask_secret, resolve_credential, Credential, CredentialOrigin, API_KEY_NAME};
pub use io::{config_dir, secrets_file_path};
pub use secrets::{EnvSource, SecretSource, SecretsFile};

/// Load the secret store from its standard location and resolve the API key
/// against it and the process environment.
///
/// This is the main entry point used at startup.
pub fn load_credential() -> Option<Credential> {
    let path = secrets_file_path(&config_dir());
    let secrets = SecretsFile::load(&path);
    let credential = resolve_credential(&secrets, &EnvSource::Process);
    if credential.is_none() {
        tracing::warn!(
            secrets_file = %path.display(),
            "No {} found in secret store or environment",
            API_KEY_NAME
        );
    }
    credential
}
