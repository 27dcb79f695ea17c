//! Platform detection from remote URLs

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use regex::Regex;
use std::env;
use std::sync::LazyLock;
use url::Url;

const GITHUB_HOST: &str = "github.com";

// git@host:owner/repo.git
static SCP_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@/]+@([^:/]+):(.+)$").unwrap());

const URL_SCHEMES: [&str; 4] = ["https", "http", "ssh", "git"];

/// Parse owner and repository name from a remote URL, honoring `GH_HOST`
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let gh_host = env::var("GH_HOST").ok();
    parse_repo_info_for_host(url, gh_host.as_deref())
}

/// Parse owner and repository name, accepting `gh_host` as an enterprise host
pub fn parse_repo_info_for_host(url: &str, gh_host: Option<&str>) -> Result<PlatformConfig> {
    let (hostname, path) = split_url(url)
        .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;

    let platform = platform_for_host(&hostname, gh_host).ok_or_else(|| {
        Error::Parse(format!(
            "remote URL {url} is not on {GITHUB_HOST} (set GH_HOST for GitHub Enterprise)"
        ))
    })?;

    let (owner, repo) = match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            ((*owner).to_string(), (*repo).to_string())
        }
        _ => {
            return Err(Error::Parse(format!(
                "remote URL {url} does not name an owner/repo pair"
            )));
        }
    };

    let host = (!hostname.eq_ignore_ascii_case(GITHUB_HOST)).then_some(hostname);

    Ok(PlatformConfig {
        platform,
        owner,
        repo,
        host,
    })
}

fn platform_for_host(hostname: &str, gh_host: Option<&str>) -> Option<Platform> {
    let matches = |h: &str| h.eq_ignore_ascii_case(hostname);
    (matches(GITHUB_HOST) || gh_host.is_some_and(matches)).then_some(Platform::GitHub)
}

/// Host and repository path of a remote URL, without any `.git` suffix
fn split_url(url: &str) -> Option<(String, String)> {
    let (host, path) = if let Some(captures) = SCP_URL.captures(url) {
        (captures[1].to_string(), captures[2].to_string())
    } else {
        let parsed = Url::parse(url).ok()?;
        if !URL_SCHEMES.contains(&parsed.scheme()) {
            return None;
        }
        (parsed.host_str()?.to_string(), parsed.path().to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    Some((host, path.to_string()))
}
