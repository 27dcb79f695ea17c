//! Hosting service access
//!
//! Pull request operations go through [`PlatformService`] so the
//! synchronization logic can run against GitHub or an in-memory double.

mod detection;
mod factory;
mod github;

pub use detection::{parse_repo_info, parse_repo_info_for_host};
pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PrContent, PullRequest};
use async_trait::async_trait;

/// Pull request operations on a hosting service
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Login of the authenticated user
    async fn current_user(&self) -> Result<String>;

    /// Default branch of the repository
    async fn default_branch(&self) -> Result<String>;

    /// Open pull requests whose head is `head_branch`
    async fn find_pull_requests(&self, head_branch: &str) -> Result<Vec<PullRequest>>;

    /// Open a pull request from `head`
    async fn create_pr(&self, head: &str, content: &PrContent) -> Result<PullRequest>;

    /// Set base, title and body of an existing pull request
    ///
    /// The draft flag can't be changed through this call and is ignored.
    async fn update_pr(&self, pr_number: u64, content: &PrContent) -> Result<PullRequest>;
}
