//! Core types for git-stacked

use git2::Oid;

/// A commit as seen by the stack engine
///
/// Commits are immutable: rewriting one produces a new [`Oid`] and leaves
/// the old object untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Content identifier
    pub id: Oid,
    /// Full commit message
    pub message: String,
    /// Parent commit IDs, first parent first
    pub parents: Vec<Oid>,
}

impl CommitInfo {
    /// The only parent, if the commit has exactly one
    pub fn sole_parent(&self) -> Option<Oid> {
        match self.parents.as_slice() {
            [parent] => Some(*parent),
            _ => None,
        }
    }
}

/// One reviewable unit of the stack, backed by exactly one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Stable identity carried in the `Change-ID` trailer
    pub change_id: String,
    /// First line of the commit message
    pub title: String,
    /// Remainder of the commit message, trailers included
    pub body: String,
    /// Current backing commit
    pub commit_id: Oid,
    /// Remote branch holding this change
    pub head_branch: String,
    /// Branch this change's pull request targets
    pub base_branch: String,
    /// Whether the title marks the change as work in progress
    pub is_draft: bool,
}

/// A pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
    /// PR description
    pub body: String,
    /// Whether the PR is a draft
    pub draft: bool,
}

/// Desired state of a pull request, used for both creation and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrContent {
    /// Target branch
    pub base: String,
    /// PR title
    pub title: String,
    /// PR description
    pub body: String,
    /// Open as draft (only honored on creation)
    pub draft: bool,
}

impl PrContent {
    /// Content a change's pull request should carry
    pub fn for_change(change: &Change) -> Self {
        Self {
            base: change.base_branch.clone(),
            title: change.title.clone(),
            body: change.body.clone(),
            draft: change.is_draft,
        }
    }
}

/// A git remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// Detected platform type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// GitHub or GitHub Enterprise
    GitHub,
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}
