//! GitHub token discovery.
//!
//! Lookup order:
//! 1. Token passed explicitly (`--token`)
//! 2. GITHUB_TOKEN env var
//! 3. GH_TOKEN env var
//! 4. `gh auth token` (gh CLI)
//!
//! Without a token requests are sent anonymously.

use std::env;
use std::process::Command;

use tracing::debug;

/// Resolve the token to authorize API requests with, if any.
pub fn resolve_token(explicit: Option<String>) -> Option<String> {
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return Some(token);
    }

    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.is_empty() {
                debug!("Using GitHub token from {}", var);
                return Some(token);
            }
        }
    }

    let token = get_token_from_gh_cli();
    if token.is_none() {
        debug!("No GitHub token found, requests will be anonymous");
    }
    token
}

/// Try to get a token from the gh CLI.
fn get_token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}
