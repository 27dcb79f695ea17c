//! Pull request synchronization
//!
//! Applies a [`SyncPlan`] in stack order. The first failure stops the run;
//! pull requests handled before it stay as they are.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::submit::{
    AssembledStack, Phase, PrAction, ProgressCallback, PushPlan, SyncPlan,
};
use crate::types::{Change, PullRequest};

/// What happened to a change's pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new pull request was opened
    Created,
    /// An existing pull request was updated
    Updated,
    /// The pull request already matched
    Unchanged,
}

/// A change together with its pull request
#[derive(Debug, Clone)]
pub struct SyncedChange {
    /// The change
    pub change: Change,
    /// Its pull request after synchronization
    pub pr: PullRequest,
    /// What was done
    pub outcome: SyncOutcome,
}

/// Result of pull request synchronization
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    /// Every change, in stack order
    pub changes: Vec<SyncedChange>,
}

impl SyncResult {
    /// Pull requests with the given outcome
    pub fn with_outcome(&self, outcome: SyncOutcome) -> impl Iterator<Item = &PullRequest> {
        self.changes
            .iter()
            .filter(move |c| c.outcome == outcome)
            .map(|c| &c.pr)
    }
}

/// Create or update pull requests as planned
pub async fn execute_sync_plan(
    plan: &SyncPlan,
    platform: &dyn PlatformService,
    progress: &dyn ProgressCallback,
) -> Result<SyncResult> {
    let mut result = SyncResult::default();

    progress.on_phase(Phase::SyncingPrs).await;

    for item in &plan.items {
        let change = &item.change;

        let (pr, outcome) = match &item.action {
            PrAction::Create => {
                progress
                    .on_message(&format!(
                        "Creating PR for {} (base: {})",
                        change.head_branch, item.content.base
                    ))
                    .await;
                match platform.create_pr(&change.head_branch, &item.content).await {
                    Ok(pr) => {
                        progress.on_pr_created(change, &pr).await;
                        (pr, SyncOutcome::Created)
                    }
                    Err(e) => {
                        progress.on_error(&e).await;
                        return Err(e);
                    }
                }
            }
            PrAction::Update(existing) => {
                match platform.update_pr(existing.number, &item.content).await {
                    Ok(pr) => {
                        progress.on_pr_updated(change, &pr).await;
                        (pr, SyncOutcome::Updated)
                    }
                    Err(e) => {
                        progress.on_error(&e).await;
                        return Err(e);
                    }
                }
            }
            PrAction::UpToDate(existing) => {
                progress.on_pr_unchanged(change, existing).await;
                (existing.clone(), SyncOutcome::Unchanged)
            }
        };

        result.changes.push(SyncedChange {
            change: change.clone(),
            pr,
            outcome,
        });
    }

    Ok(result)
}

/// Report what a real run would do
pub async fn report_dry_run(
    stack: &AssembledStack,
    push: &PushPlan,
    plan: &SyncPlan,
    remote: &str,
    progress: &dyn ProgressCallback,
) {
    progress
        .on_message("Dry run - no changes will be made")
        .await;

    let branch = |change: &Change| display_branch(stack, change);

    if stack.rewritten > 0 {
        progress
            .on_message(&format!("Would rewrite {} commits", stack.rewritten))
            .await;
    }

    if !push.is_empty() {
        progress.on_message("Would push:").await;
        for item in &plan.items {
            if push.updates.iter().any(|u| u.branch == item.change.head_branch) {
                progress
                    .on_message(&format!("  - {} to {remote}", branch(&item.change)))
                    .await;
            }
        }
    }

    for (label, wanted) in [
        ("Would create PRs:", PrKind::Create),
        ("Would update PRs:", PrKind::Update),
    ] {
        let items: Vec<_> = plan
            .items
            .iter()
            .filter(|item| PrKind::of(&item.action) == Some(wanted))
            .collect();
        if items.is_empty() {
            continue;
        }

        progress.on_message(label).await;
        for item in items {
            let number = match &item.action {
                PrAction::Update(pr) => format!(" (PR #{})", pr.number),
                _ => String::new(),
            };
            progress
                .on_message(&format!(
                    "  - {}{number} → {} ({})",
                    branch(&item.change),
                    display_base(stack, plan, &item.change),
                    item.content.title
                ))
                .await;
        }
    }

    if stack.rewritten == 0 && push.is_empty() && plan.is_up_to_date() {
        progress
            .on_message("Nothing to do - already in sync")
            .await;
    }
}

/// Head branch as shown to the user; identities not yet written show as `(new)`
pub fn display_branch(stack: &AssembledStack, change: &Change) -> String {
    if stack.is_new(change) {
        change
            .head_branch
            .strip_suffix(change.change_id.as_str())
            .map_or_else(|| change.head_branch.clone(), |ns| format!("{ns}(new)"))
    } else {
        change.head_branch.clone()
    }
}

fn display_base(stack: &AssembledStack, plan: &SyncPlan, change: &Change) -> String {
    plan.items
        .iter()
        .map(|item| &item.change)
        .find(|c| c.head_branch == change.base_branch)
        .map_or_else(|| change.base_branch.clone(), |c| display_branch(stack, c))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrKind {
    Create,
    Update,
}

impl PrKind {
    const fn of(action: &PrAction) -> Option<Self> {
        match action {
            PrAction::Create => Some(Self::Create),
            PrAction::Update(_) => Some(Self::Update),
            PrAction::UpToDate(_) => None,
        }
    }
}
