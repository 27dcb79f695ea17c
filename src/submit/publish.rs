//! Pushing change branches
//!
//! All branches that differ from the remote go out in a single push. Every
//! ref is force-updated, since restacking rewrites history.

use crate::error::Result;
use crate::repo::{GitRepo, PushCredentials};
use crate::submit::{Phase, ProgressCallback, PushStatus};
use crate::types::Change;
use git2::Oid;
use std::collections::HashMap;
use tracing::debug;

/// A remote branch that must be moved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchUpdate {
    /// Branch name without the `refs/heads/` prefix
    pub branch: String,
    /// Commit the branch should point at
    pub commit_id: Oid,
}

impl BranchUpdate {
    /// Forced refspec for this update
    pub fn refspec(&self) -> String {
        format!("+{}:{}", self.commit_id, branch_ref(&self.branch))
    }
}

/// Branches to push, split by whether the remote already has them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushPlan {
    /// Branches missing on the remote or pointing elsewhere
    pub updates: Vec<BranchUpdate>,
    /// Branches already at the change's commit
    pub already_synced: Vec<String>,
}

impl PushPlan {
    /// Whether nothing needs pushing
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

/// Compare the changes' head branches with the remote's refs
pub fn plan_push(changes: &[Change], remote_heads: &HashMap<String, Oid>) -> PushPlan {
    let mut plan = PushPlan::default();

    for change in changes {
        if remote_heads.get(&branch_ref(&change.head_branch)) == Some(&change.commit_id) {
            plan.already_synced.push(change.head_branch.clone());
        } else {
            plan.updates.push(BranchUpdate {
                branch: change.head_branch.clone(),
                commit_id: change.commit_id,
            });
        }
    }

    plan
}

/// List `remote` and work out which change branches need pushing
pub fn prepare_push(
    repo: &GitRepo,
    remote: &str,
    changes: &[Change],
    credentials: &PushCredentials,
) -> Result<PushPlan> {
    let heads = repo.remote_heads(remote, credentials)?;
    debug!("Remote {} advertises {} refs", remote, heads.len());
    Ok(plan_push(changes, &heads))
}

/// Push every change's head branch that differs from `remote`
///
/// A rejected ref fails the whole publish.
pub async fn publish_changes(
    repo: &GitRepo,
    remote: &str,
    changes: &[Change],
    credentials: &PushCredentials,
    progress: &dyn ProgressCallback,
) -> Result<PushPlan> {
    progress.on_phase(Phase::Pushing).await;
    let plan = prepare_push(repo, remote, changes, credentials)?;

    for branch in &plan.already_synced {
        progress
            .on_branch_push(branch, PushStatus::AlreadySynced)
            .await;
    }

    if plan.is_empty() {
        return Ok(plan);
    }

    for update in &plan.updates {
        progress
            .on_branch_push(&update.branch, PushStatus::Started)
            .await;
    }

    let refspecs: Vec<String> = plan.updates.iter().map(BranchUpdate::refspec).collect();
    if let Err(e) = repo.push(remote, &refspecs, credentials) {
        for update in &plan.updates {
            progress
                .on_branch_push(&update.branch, PushStatus::Failed(e.to_string()))
                .await;
        }
        progress.on_error(&e).await;
        return Err(e);
    }

    for update in &plan.updates {
        progress
            .on_branch_push(&update.branch, PushStatus::Success)
            .await;
    }

    Ok(plan)
}

fn branch_ref(branch: &str) -> String {
    format!("refs/heads/{branch}")
}
