//! `git2`-backed repository

use crate::error::{Error, Result};
use crate::repo::CommitStore;
use crate::types::{CommitInfo, GitRemote};
use git2::{
    Cred, CredentialType, Direction, ErrorCode, ObjectType, Oid, PushOptions, ReferenceType,
    RemoteCallbacks, Repository,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Reflog message for branch pointer updates
const REFLOG_MESSAGE: &str = "git-stacked: tag and restack commits";

/// Credential prompts answered before giving up
const MAX_CREDENTIAL_ATTEMPTS: u32 = 3;

/// Credentials used for the push transport
#[derive(Debug, Clone)]
pub struct PushCredentials {
    /// Login of the authenticated user
    pub username: String,
    /// API token, used as the HTTPS password
    pub token: String,
}

/// A git repository opened with `git2`
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        debug!("Opened repository at {}", repo.path().display());
        Ok(Self { repo })
    }

    /// Wrap an already opened repository
    pub const fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Access the underlying `git2` repository
    pub const fn inner(&self) -> &Repository {
        &self.repo
    }

    /// Resolve a revision expression (branch, tag, ref or hash) to a commit
    pub fn resolve_revision(&self, rev: &str) -> Result<Oid> {
        let object = self.repo.revparse_single(rev).map_err(|e| match e.code() {
            ErrorCode::NotFound | ErrorCode::InvalidSpec | ErrorCode::Ambiguous => {
                Error::RevisionNotFound(rev.to_string())
            }
            _ => Error::Git(e),
        })?;
        let commit = object
            .peel_to_commit()
            .map_err(|_| Error::RevisionNotFound(rev.to_string()))?;
        Ok(commit.id())
    }

    /// Name of the checked-out branch, or `None` when HEAD is detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        let head = self.repo.find_reference("HEAD")?;
        if head.kind() == Some(ReferenceType::Symbolic) {
            Ok(head
                .symbolic_target()
                .map(|t| t.strip_prefix("refs/heads/").unwrap_or(t).to_string()))
        } else {
            Ok(None)
        }
    }

    /// All configured remotes that have a URL
    pub fn remotes(&self) -> Result<Vec<GitRemote>> {
        let names = self.repo.remotes()?;
        let mut remotes = Vec::new();

        for name in names.iter().flatten() {
            let remote = self.repo.find_remote(name)?;
            if let Some(url) = remote.url() {
                remotes.push(GitRemote {
                    name: name.to_string(),
                    url: url.to_string(),
                });
            }
        }

        Ok(remotes)
    }

    /// Upstream remote configured for the checked-out branch
    pub fn upstream_remote(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        let buf = self.repo.branch_upstream_remote(head.name()?).ok()?;
        buf.as_str().map(ToString::to_string)
    }

    /// List the branch heads advertised by `remote`
    pub fn remote_heads(
        &self,
        remote: &str,
        credentials: &PushCredentials,
    ) -> Result<HashMap<String, Oid>> {
        let mut remote = self.repo.find_remote(remote)?;
        let attempts = Cell::new(0);
        let connection = remote
            .connect_auth(
                Direction::Push,
                Some(remote_callbacks(credentials, &attempts)),
                None,
            )
            .map_err(|e| Error::Push(e.to_string()))?;

        let heads = connection
            .list()?
            .iter()
            .map(|head| (head.name().to_string(), head.oid()))
            .collect();

        Ok(heads)
    }

    /// Push `refspecs` to `remote` in a single request
    ///
    /// Ref updates rejected by the remote are reported as [`Error::Push`].
    pub fn push(
        &self,
        remote: &str,
        refspecs: &[String],
        credentials: &PushCredentials,
    ) -> Result<()> {
        let mut remote = self.repo.find_remote(remote)?;
        let attempts = Cell::new(0);
        let mut rejected = Vec::new();

        {
            let mut callbacks = remote_callbacks(credentials, &attempts);
            callbacks.push_update_reference(|refname, status| {
                if let Some(msg) = status {
                    rejected.push(format!("{refname}: {msg}"));
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            remote
                .push(refspecs, Some(&mut options))
                .map_err(|e| Error::Push(e.to_string()))?;
        }

        if rejected.is_empty() {
            Ok(())
        } else {
            Err(Error::Push(rejected.join("; ")))
        }
    }
}

impl CommitStore for GitRepo {
    fn read_commit(&self, id: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(id).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::CommitNotFound(id.to_string()),
            _ => Error::Git(e),
        })?;

        let message = commit
            .message_raw()
            .ok_or_else(|| Error::InvalidCommitMessage(id.to_string()))?
            .to_string();

        Ok(CommitInfo {
            id,
            message,
            parents: commit.parent_ids().collect(),
        })
    }

    fn parents(&self, id: Oid) -> Result<Vec<Oid>> {
        let commit = self.repo.find_commit(id).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::CommitNotFound(id.to_string()),
            _ => Error::Git(e),
        })?;
        Ok(commit.parent_ids().collect())
    }

    fn rewrite_commit(&self, original: Oid, message: &str, parents: &[Oid]) -> Result<Oid> {
        let commit = self
            .repo
            .find_commit(original)
            .map_err(|_| Error::CommitNotFound(original.to_string()))?;
        let tree = commit.tree()?;

        let parent_commits = parents
            .iter()
            .map(|id| {
                self.repo
                    .find_commit(*id)
                    .map_err(|_| Error::CommitNotFound(id.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        let parent_refs: Vec<&git2::Commit<'_>> = parent_commits.iter().collect();

        let id = self.repo.commit(
            None,
            &commit.author(),
            &commit.committer(),
            message,
            &tree,
            &parent_refs,
        )?;

        debug!("Rewrote {} as {}", original, id);
        Ok(id)
    }

    fn update_head(&self, id: Oid) -> Result<()> {
        let head = self.repo.find_reference("HEAD")?;
        let name = if head.kind() == Some(ReferenceType::Symbolic) {
            head.symbolic_target().unwrap_or("HEAD").to_string()
        } else {
            "HEAD".to_string()
        };

        debug!("Moving {} to {}", name, id);
        self.repo.reference(&name, id, true, REFLOG_MESSAGE)?;
        Ok(())
    }
}

/// Read-only view used for dry runs
///
/// Rewrites are never written; they return a placeholder identifier derived
/// from the requested message and parents.
pub struct PreviewStore<'a> {
    repo: &'a GitRepo,
}

impl<'a> PreviewStore<'a> {
    /// Wrap a repository for previewing
    pub const fn new(repo: &'a GitRepo) -> Self {
        Self { repo }
    }
}

impl CommitStore for PreviewStore<'_> {
    fn read_commit(&self, id: Oid) -> Result<CommitInfo> {
        self.repo.read_commit(id)
    }

    fn rewrite_commit(&self, original: Oid, message: &str, parents: &[Oid]) -> Result<Oid> {
        let mut buf = format!("preview {original}\n");
        for parent in parents {
            buf.push_str(&format!("parent {parent}\n"));
        }
        buf.push('\n');
        buf.push_str(message);
        Ok(Oid::hash_object(ObjectType::Commit, buf.as_bytes())?)
    }

    fn update_head(&self, id: Oid) -> Result<()> {
        debug!("Would move HEAD to {}", id);
        Ok(())
    }
}

fn remote_callbacks<'a>(
    credentials: &'a PushCredentials,
    attempts: &'a Cell<u32>,
) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, allowed| {
        attempts.set(attempts.get() + 1);
        if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("credentials rejected by remote"));
        }

        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) {
            Cred::userpass_plaintext(&credentials.username, &credentials.token)
        } else if allowed.contains(CredentialType::SSH_KEY) {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        } else {
            Cred::default()
        }
    });
    callbacks
}
