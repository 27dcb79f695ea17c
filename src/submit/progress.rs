//! Progress callback trait for interface-agnostic updates
//!
//! The engine reports what it is doing through [`ProgressCallback`]; the
//! CLI renders it, tests usually pass [`NoopProgress`].

use crate::error::Error;
use crate::types::{Change, PullRequest};
use async_trait::async_trait;
use std::fmt;

/// Submission phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walking the commit graph for new commits
    Discovering,
    /// Tagging and restacking commits
    Rewriting,
    /// Pushing change branches to the remote
    Pushing,
    /// Creating and updating pull requests
    SyncingPrs,
    /// Submission complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Discovering => "Discovering new commits",
            Self::Rewriting => "Tagging and restacking commits",
            Self::Pushing => "Pushing branches",
            Self::SyncingPrs => "Syncing pull requests",
            Self::Complete => "Done",
        };
        f.write_str(name)
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Remote branch already points at the change's commit
    AlreadySynced,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("pushing"),
            Self::Success => f.write_str("pushed"),
            Self::AlreadySynced => f.write_str("already synced"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called when a change branch is being pushed
    async fn on_branch_push(&self, branch: &str, status: PushStatus);

    /// Called when a PR is created
    async fn on_pr_created(&self, change: &Change, pr: &PullRequest);

    /// Called when a PR is updated
    async fn on_pr_updated(&self, change: &Change, pr: &PullRequest);

    /// Called when a PR already matches its change
    async fn on_pr_unchanged(&self, change: &Change, pr: &PullRequest);

    /// Called when an operation fails, before the error is returned
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_branch_push(&self, _branch: &str, _status: PushStatus) {}
    async fn on_pr_created(&self, _change: &Change, _pr: &PullRequest) {}
    async fn on_pr_updated(&self, _change: &Change, _pr: &PullRequest) {}
    async fn on_pr_unchanged(&self, _change: &Change, _pr: &PullRequest) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
