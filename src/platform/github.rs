//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Platform, PlatformConfig, PrContent, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::params::State;
use tracing::debug;

/// Largest page the pulls endpoint returns
const PAGE_SIZE: u8 = 100;

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
}

impl GitHubService {
    /// Create a service for github.com, or a GitHub Enterprise `host`
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let api_url = host.as_ref().map(|h| format!("https://{h}/api/v3"));
        let config = PlatformConfig {
            platform: Platform::GitHub,
            owner,
            repo,
            host,
        };
        Self::build(token, api_url.as_deref(), config)
    }

    /// Create a service talking to an explicit API root
    pub fn with_api_url(token: &str, owner: String, repo: String, api_url: &str) -> Result<Self> {
        let config = PlatformConfig {
            platform: Platform::GitHub,
            owner,
            repo,
            host: None,
        };
        Self::build(token, Some(api_url), config)
    }

    fn build(token: &str, api_url: Option<&str>, config: PlatformConfig) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
        }

        let client = builder.build().map_err(|e| Error::GitHubApi(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn current_user(&self) -> Result<String> {
        let user = self
            .client
            .current()
            .user()
            .await
            .map_err(|e| Error::Auth(format!("invalid token: {e}")))?;
        Ok(user.login)
    }

    async fn default_branch(&self) -> Result<String> {
        let repo = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .get()
            .await?;

        repo.default_branch.ok_or_else(|| {
            Error::GitHubApi(format!(
                "{}/{} has no default branch",
                self.config.owner, self.config.repo
            ))
        })
    }

    async fn find_pull_requests(&self, head_branch: &str) -> Result<Vec<PullRequest>> {
        let head = format!("{}:{}", &self.config.owner, head_branch);

        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .head(head)
            .state(State::Open)
            .per_page(PAGE_SIZE)
            .send()
            .await?;

        debug!("{} open PRs for {}", prs.items.len(), head_branch);
        Ok(prs.items.iter().map(to_pull_request).collect())
    }

    async fn create_pr(&self, head: &str, content: &PrContent) -> Result<PullRequest> {
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(content.title.clone(), head, content.base.clone())
            .body(content.body.clone())
            .draft(content.draft)
            .send()
            .await?;

        Ok(to_pull_request(&pr))
    }

    async fn update_pr(&self, pr_number: u64, content: &PrContent) -> Result<PullRequest> {
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .base(content.base.clone())
            .title(content.title.clone())
            .body(content.body.clone())
            .send()
            .await?;

        Ok(to_pull_request(&pr))
    }
}

fn to_pull_request(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.clone().unwrap_or_default(),
        body: pr.body.clone().unwrap_or_default(),
        draft: pr.draft.unwrap_or(false),
    }
}
