//! GitHub authentication

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use std::env;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// GitHub authentication configuration
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get GitHub authentication for `host` (github.com when `None`)
///
/// Priority:
/// 1. `GITHUB_TOKEN` environment variable
/// 2. `GH_TOKEN` environment variable
/// 3. gh CLI (`gh auth token`)
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(config) = token_from_env(|name| env::var(name).ok()) {
        return Ok(config);
    }

    if let Some(token) = get_gh_cli_token(host).await {
        debug!("Using token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found; set GITHUB_TOKEN or run `gh auth login`".to_string(),
    ))
}

fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<GitHubAuthConfig> {
    TOKEN_VARS.iter().find_map(|name| {
        let token = lookup(name)?.trim().to_string();
        if token.is_empty() {
            return None;
        }
        debug!("Using token from {}", name);
        Some(GitHubAuthConfig {
            token,
            source: AuthSource::EnvVar,
        })
    })
}

async fn get_gh_cli_token(host: Option<&str>) -> Option<String> {
    let mut command = Command::new("gh");
    command.args(["auth", "token"]);
    if let Some(host) = host {
        command.args(["--hostname", host]);
    }

    let output = command.output().await.ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}
