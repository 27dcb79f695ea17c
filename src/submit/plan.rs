//! Pull request planning
//!
//! Looks up the open pull request for every change and decides whether it
//! has to be created, updated, or left alone.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Change, PrContent, PullRequest};
use tracing::{debug, warn};

/// What to do with a change's pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrAction {
    /// No open pull request exists for the head branch
    Create,
    /// The open pull request differs from the change
    Update(PullRequest),
    /// The open pull request already matches the change
    UpToDate(PullRequest),
}

/// Planned operation for one change
#[derive(Debug, Clone)]
pub struct PlannedPr {
    /// Change the pull request belongs to
    pub change: Change,
    /// Desired pull request content
    pub content: PrContent,
    /// Operation to perform
    pub action: PrAction,
}

/// Pull request plan, in stack order
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// One entry per change, bottom of the stack first
    pub items: Vec<PlannedPr>,
}

impl SyncPlan {
    /// Number of pull requests to create
    pub fn creates(&self) -> usize {
        self.count(|a| matches!(a, PrAction::Create))
    }

    /// Number of pull requests to update
    pub fn updates(&self) -> usize {
        self.count(|a| matches!(a, PrAction::Update(_)))
    }

    /// Whether every pull request already matches its change
    pub fn is_up_to_date(&self) -> bool {
        self.items
            .iter()
            .all(|item| matches!(item.action, PrAction::UpToDate(_)))
    }

    fn count(&self, pred: impl Fn(&PrAction) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.action)).count()
    }
}

/// Whether `pr` has to be updated to carry `content`
///
/// Base, title and body are compared; line endings and trailing whitespace
/// in the body are ignored. Draft state is not compared.
pub fn needs_update(pr: &PullRequest, content: &PrContent) -> bool {
    pr.base_ref != content.base
        || pr.title != content.title
        || normalize_body(&pr.body) != normalize_body(&content.body)
}

/// Build the pull request plan for `changes`
///
/// More than one open pull request for a head branch is an error.
pub async fn create_sync_plan(
    changes: &[Change],
    platform: &dyn PlatformService,
) -> Result<SyncPlan> {
    let mut plan = SyncPlan::default();

    for change in changes {
        let content = PrContent::for_change(change);
        let mut prs = platform.find_pull_requests(&change.head_branch).await?;

        let action = match prs.len() {
            0 => PrAction::Create,
            1 => {
                let pr = prs.remove(0);
                if pr.draft != content.draft {
                    warn!(
                        "PR #{} draft state differs from its title; leaving it as is",
                        pr.number
                    );
                }
                if needs_update(&pr, &content) {
                    PrAction::Update(pr)
                } else {
                    PrAction::UpToDate(pr)
                }
            }
            _ => {
                return Err(Error::DuplicatePullRequests {
                    head: change.head_branch.clone(),
                    numbers: prs.iter().map(|pr| pr.number).collect(),
                });
            }
        };

        debug!("{}: {:?}", change.head_branch, action);
        plan.items.push(PlannedPr {
            change: change.clone(),
            content,
            action,
        });
    }

    Ok(plan)
}

fn normalize_body(body: &str) -> String {
    body.replace("\r\n", "\n").trim_end().to_string()
}
