//! Throwaway git repositories for integration tests
//!
//! Every fixture lives in its own temp directory: a working repository on
//! `main` plus a bare repository registered as `origin`.

#![allow(dead_code)]

use git2::{Commit, Oid, Repository, RepositoryInitOptions, Signature};
use git_stacked::repo::{GitRepo, PushCredentials};
use git_stacked::types::PullRequest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Login used as the branch namespace in tests
pub const LOGIN: &str = "alice";

/// A working repository with a bare `origin`
pub struct TestRepo {
    pub dir: TempDir,
    pub remote_dir: TempDir,
    pub repo: GitRepo,
    /// Tip of `main`, the base of every stack
    pub base: Oid,
}

impl TestRepo {
    /// Repository with one commit on `main`, pushed to `origin`
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let remote_dir = TempDir::new().unwrap();

        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        let raw = Repository::init_opts(dir.path(), &opts).unwrap();
        {
            let mut config = raw.config().unwrap();
            config.set_str("user.name", "Test Author").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        Repository::init_bare(remote_dir.path()).unwrap();
        raw.remote("origin", remote_dir.path().to_str().unwrap())
            .unwrap();

        let repo = GitRepo::from_repository(raw);
        let base = commit_file(repo.inner(), "README.md", "hello\n", "Initial commit");

        {
            let mut origin = repo.inner().find_remote("origin").unwrap();
            origin.push(&["refs/heads/main:refs/heads/main"], None).unwrap();
        }

        Self {
            dir,
            remote_dir,
            repo,
            base,
        }
    }

    /// Commit `content` to `name` on the checked-out branch
    pub fn commit(&self, name: &str, content: &str, message: &str) -> Oid {
        commit_file(self.repo.inner(), name, content, message)
    }

    /// Current HEAD commit
    pub fn head(&self) -> Oid {
        self.repo.resolve_revision("HEAD").unwrap()
    }

    /// Message of commit `id`
    pub fn message(&self, id: Oid) -> String {
        let commit = self.repo.inner().find_commit(id).unwrap();
        commit.message_raw().unwrap().to_string()
    }

    /// Reword the HEAD commit in place, keeping its tree and parents
    pub fn amend_head(&self, message: &str) -> Oid {
        let raw = self.repo.inner();
        let head = raw.head().unwrap().peel_to_commit().unwrap();
        head.amend(Some("HEAD"), None, None, None, Some(message), None)
            .unwrap()
    }

    /// Commit that `branch` points at on the bare remote
    pub fn remote_branch(&self, branch: &str) -> Option<Oid> {
        let remote = Repository::open_bare(self.remote_dir.path()).unwrap();
        remote
            .refname_to_id(&format!("refs/heads/{branch}"))
            .ok()
    }

    /// Open a second handle on the working repository
    pub fn reopen(&self) -> GitRepo {
        GitRepo::open(self.dir.path()).unwrap()
    }
}

/// Credentials for the local bare remote, which never asks for them
pub fn credentials() -> PushCredentials {
    PushCredentials {
        username: LOGIN.to_string(),
        token: "test-token".to_string(),
    }
}

/// Write `content` to `name` and commit it onto HEAD
pub fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> Oid {
    let workdir = repo.workdir().unwrap();
    fs::write(workdir.join(name), content).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

    let sig = Signature::now("Test Author", "test@example.com").unwrap();
    let parents: Vec<Commit<'_>> = repo
        .head()
        .ok()
        .and_then(|h| h.peel_to_commit().ok())
        .into_iter()
        .collect();
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

/// Commit with two parents: HEAD and `other`, reusing HEAD's tree
pub fn merge_commit(repo: &Repository, other: Oid, message: &str) -> Oid {
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    let other = repo.find_commit(other).unwrap();
    let tree = head.tree().unwrap();
    let sig = Signature::now("Test Author", "test@example.com").unwrap();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&head, &other])
        .unwrap()
}

/// Create a pull request with default values
pub fn make_pr(number: u64, head: &str, base: &str) -> PullRequest {
    PullRequest {
        number,
        html_url: format!("https://github.com/test/repo/pull/{number}"),
        base_ref: base.to_string(),
        head_ref: head.to_string(),
        title: format!("PR for {head}"),
        body: String::new(),
        draft: false,
    }
}

/// Commit on top of `parent` with `parent`'s tree, leaving every ref alone
pub fn detached_commit(repo: &Repository, parent: Oid, message: &str) -> Oid {
    let parent = repo.find_commit(parent).unwrap();
    let tree = parent.tree().unwrap();
    let sig = Signature::now("Test Author", "test@example.com").unwrap();

    repo.commit(None, &sig, &sig, message, &tree, &[&parent])
        .unwrap()
}
