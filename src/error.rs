//! Error types for git-stacked

use thiserror::Error;

/// Errors raised while discovering, rewriting or publishing a stack
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying git storage or transport error
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    /// Revision expression did not resolve to a commit
    #[error("revision not found: {0}")]
    RevisionNotFound(String),

    /// Commit object missing from the object database
    #[error("commit not found: {0}")]
    CommitNotFound(String),

    /// Commit message is not valid UTF-8
    #[error("commit {0} has a message that is not valid UTF-8")]
    InvalidCommitMessage(String),

    /// No remote could be matched to a supported hosting service
    #[error("no supported remote found (expected a GitHub remote)")]
    NoSupportedRemotes,

    /// Requested remote does not exist
    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    /// Remote URL or other input could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// More than one open pull request uses the same head branch
    #[error("found multiple pull requests for head branch {head}: {}", format_numbers(.numbers))]
    DuplicatePullRequests {
        /// Head branch shared by the pull requests
        head: String,
        /// Numbers of every matching pull request
        numbers: Vec<u64>,
    },

    /// Two commits in the stack carry the same change identity
    #[error("change ID {0} appears on more than one commit in the stack")]
    DuplicateChangeId(String),

    /// Missing or rejected credentials
    #[error("authentication failed: {0}")]
    Auth(String),

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Push was rejected or the transport failed
    #[error("push failed: {0}")]
    Push(String),

    /// Broken internal invariant
    #[error("internal error: {0}")]
    Internal(String),
}

fn format_numbers(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}

/// Result alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;
