//! CLI Status Command
//!
//! Queries the health endpoint of a running server.

use anyhow::Result;
use serde_json::Value;

use crate::terminal_output::{note_error, note_success, note_warn};

pub async fn run(port: u16) -> Result<bool> {
    let url = format!("http://localhost:{port}/api/health");
    let response = match reqwest::Client::new().get(&url).send().await {
        Ok(resp) => resp,
        Err(_) => {
            note_error(&format!("Expert Desk is not running on port {port}"));
            return Ok(false);
        }
    };

    let body: Value = response.json().await?;
    let version = body["version"].as_str().unwrap_or("unknown");
    note_success(&format!("Expert Desk {version} is running on port {port}"));
    if body["credential_configured"].as_bool() != Some(true) {
        note_warn("No OpenAI API key configured; the page shows setup instructions");
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(true)
}
