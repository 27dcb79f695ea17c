//! In-memory platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use git_stacked::error::{Error, Result};
use git_stacked::platform::PlatformService;
use git_stacked::types::{PrContent, PullRequest};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub draft: bool,
}

/// Call record for `update_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePrCall {
    pub pr_number: u64,
    pub base: String,
    pub title: String,
}

/// Mock platform service that keeps its pull requests in memory
///
/// Created PRs are returned by later lookups and updates change them, so a
/// second submit sees what the first one left behind.
///
/// Features:
/// - Auto-incrementing PR numbers
/// - Call tracking for verification
/// - Pre-seeded PRs, including duplicates for one head
/// - Error injection for failure path testing
pub struct MockPlatformService {
    login: String,
    default_branch: String,
    next_pr_number: AtomicU64,
    prs: Mutex<Vec<PullRequest>>,
    // Call tracking
    find_calls: Mutex<Vec<String>>,
    create_calls: Mutex<Vec<CreatePrCall>>,
    update_calls: Mutex<Vec<UpdatePrCall>>,
    // Error injection
    error_on_find: Mutex<Option<String>>,
    error_on_create: Mutex<Option<(String, String)>>,
}

impl MockPlatformService {
    /// Create a mock whose authenticated user is `login`
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            default_branch: "main".to_string(),
            next_pr_number: AtomicU64::new(1),
            prs: Mutex::new(Vec::new()),
            find_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            error_on_find: Mutex::new(None),
            error_on_create: Mutex::new(None),
        }
    }

    // === Setup methods ===

    /// Seed an open pull request
    pub fn add_pr(&self, pr: PullRequest) {
        self.next_pr_number
            .fetch_max(pr.number + 1, Ordering::SeqCst);
        self.prs.lock().unwrap().push(pr);
    }

    /// Make `find_pull_requests` return an error
    pub fn fail_find(&self, msg: &str) {
        *self.error_on_find.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_pr` fail for `head`
    pub fn fail_create_for(&self, head: &str, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some((head.to_string(), msg.to_string()));
    }

    // === Call verification methods ===

    /// All open pull requests
    pub fn prs(&self) -> Vec<PullRequest> {
        self.prs.lock().unwrap().clone()
    }

    /// The open pull request for `head`
    pub fn pr_for(&self, head: &str) -> Option<PullRequest> {
        self.prs()
            .into_iter()
            .find(|pr| pr.head_ref == head)
    }

    /// Heads `find_pull_requests` was called with
    pub fn find_calls(&self) -> Vec<String> {
        self.find_calls.lock().unwrap().clone()
    }

    /// All `create_pr` calls
    pub fn create_calls(&self) -> Vec<CreatePrCall> {
        self.create_calls.lock().unwrap().clone()
    }

    /// All `update_pr` calls
    pub fn update_calls(&self) -> Vec<UpdatePrCall> {
        self.update_calls.lock().unwrap().clone()
    }

    /// Number of create and update calls
    pub fn mutations(&self) -> usize {
        self.create_calls().len() + self.update_calls().len()
    }

    /// Forget recorded calls, keeping the pull requests
    pub fn reset_calls(&self) {
        self.find_calls.lock().unwrap().clear();
        self.create_calls.lock().unwrap().clear();
        self.update_calls.lock().unwrap().clear();
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.create_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn current_user(&self) -> Result<String> {
        Ok(self.login.clone())
    }

    async fn default_branch(&self) -> Result<String> {
        Ok(self.default_branch.clone())
    }

    async fn find_pull_requests(&self, head_branch: &str) -> Result<Vec<PullRequest>> {
        self.find_calls
            .lock()
            .unwrap()
            .push(head_branch.to_string());

        if let Some(msg) = self.error_on_find.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(self
            .prs
            .lock()
            .unwrap()
            .iter()
            .filter(|pr| pr.head_ref == head_branch)
            .cloned()
            .collect())
    }

    async fn create_pr(&self, head: &str, content: &PrContent) -> Result<PullRequest> {
        self.create_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: content.base.clone(),
            title: content.title.clone(),
            draft: content.draft,
        });

        if let Some((failing, msg)) = self.error_on_create.lock().unwrap().as_ref() {
            if failing == head {
                return Err(Error::GitHubApi(msg.clone()));
            }
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            html_url: format!("https://github.com/test/repo/pull/{number}"),
            base_ref: content.base.clone(),
            head_ref: head.to_string(),
            title: content.title.clone(),
            body: content.body.clone(),
            draft: content.draft,
        };
        self.prs.lock().unwrap().push(pr.clone());
        Ok(pr)
    }

    async fn update_pr(&self, pr_number: u64, content: &PrContent) -> Result<PullRequest> {
        self.update_calls.lock().unwrap().push(UpdatePrCall {
            pr_number,
            base: content.base.clone(),
            title: content.title.clone(),
        });

        let mut prs = self.prs.lock().unwrap();
        let pr = prs
            .iter_mut()
            .find(|pr| pr.number == pr_number)
            .ok_or_else(|| Error::GitHubApi(format!("no PR #{pr_number}")))?;

        pr.base_ref.clone_from(&content.base);
        pr.title.clone_from(&content.title);
        pr.body.clone_from(&content.body);
        Ok(pr.clone())
    }
}
