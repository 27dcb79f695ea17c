//! Git repository access
//!
//! The stack engine reads and writes commits through [`CommitStore`], which
//! keeps the walker and identity manager independent of `git2`. Besides
//! the object store, the only mutable state touched is HEAD.

mod git;
#[cfg(test)]
pub(crate) mod memory;

pub use git::{GitRepo, PreviewStore, PushCredentials};

use crate::error::{Error, Result};
use crate::types::{CommitInfo, GitRemote};
use git2::Oid;

/// Content-addressed commit storage
pub trait CommitStore {
    /// Read a commit's message and parents
    fn read_commit(&self, id: Oid) -> Result<CommitInfo>;

    /// Parent IDs of a commit, first parent first
    fn parents(&self, id: Oid) -> Result<Vec<Oid>> {
        Ok(self.read_commit(id)?.parents)
    }

    /// Write a copy of `original` with a new message and parent list
    ///
    /// Tree, author and committer are carried over unchanged. Returns the
    /// identifier of the new commit object; `original` is left untouched.
    fn rewrite_commit(&self, original: Oid, message: &str, parents: &[Oid]) -> Result<Oid>;

    /// Point the checked-out branch (or HEAD itself, when detached) at `id`
    fn update_head(&self, id: Oid) -> Result<()>;
}

/// Pick the remote to push to
///
/// Priority: explicitly requested name, then the checked-out branch's
/// upstream remote, then `origin`, then the only configured remote.
pub fn select_remote<'a>(
    remotes: &'a [GitRemote],
    requested: Option<&str>,
    upstream: Option<&str>,
) -> Result<&'a GitRemote> {
    if remotes.is_empty() {
        return Err(Error::NoSupportedRemotes);
    }

    if let Some(name) = requested {
        return remotes
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| Error::RemoteNotFound(name.to_string()));
    }

    if let Some(remote) = upstream.and_then(|name| remotes.iter().find(|r| r.name == name)) {
        return Ok(remote);
    }

    if let Some(origin) = remotes.iter().find(|r| r.name == "origin") {
        return Ok(origin);
    }

    match remotes {
        [only] => Ok(only),
        _ => Err(Error::RemoteNotFound(
            "no `origin` remote and no upstream configured; pass --remote".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(name: &str) -> GitRemote {
        GitRemote {
            name: name.to_string(),
            url: format!("https://github.com/owner/{name}.git"),
        }
    }

    #[test]
    fn test_select_requested_remote() {
        let remotes = vec![remote("origin"), remote("fork")];
        let selected = select_remote(&remotes, Some("fork"), Some("origin")).unwrap();
        assert_eq!(selected.name, "fork");
    }

    #[test]
    fn test_select_missing_requested_remote() {
        let remotes = vec![remote("origin")];
        let err = select_remote(&remotes, Some("upstream"), None).unwrap_err();
        assert!(matches!(err, Error::RemoteNotFound(name) if name == "upstream"));
    }

    #[test]
    fn test_select_upstream_before_origin() {
        let remotes = vec![remote("origin"), remote("fork")];
        let selected = select_remote(&remotes, None, Some("fork")).unwrap();
        assert_eq!(selected.name, "fork");
    }

    #[test]
    fn test_select_origin_fallback() {
        let remotes = vec![remote("fork"), remote("origin")];
        let selected = select_remote(&remotes, None, None).unwrap();
        assert_eq!(selected.name, "origin");
    }

    #[test]
    fn test_select_single_remote() {
        let remotes = vec![remote("github")];
        let selected = select_remote(&remotes, None, None).unwrap();
        assert_eq!(selected.name, "github");
    }

    #[test]
    fn test_select_ambiguous_remotes() {
        let remotes = vec![remote("a"), remote("b")];
        assert!(select_remote(&remotes, None, None).is_err());
    }

    #[test]
    fn test_select_no_remotes() {
        assert!(matches!(
            select_remote(&[], None, None),
            Err(Error::NoSupportedRemotes)
        ));
    }
}
