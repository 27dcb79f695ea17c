//! Stack assembly
//!
//! Turns the discovered commits into an ordered list of changes: every
//! commit gets an identity, is restacked onto the previous change, and is
//! assigned a head branch and a base branch.

use crate::change::{ensure_change, head_branch_name, is_wip};
use crate::error::{Error, Result};
use crate::repo::CommitStore;
use crate::types::Change;
use git2::Oid;
use std::collections::HashSet;
use tracing::{debug, info};

/// Changes of the stack, bottom first
#[derive(Debug, Clone, Default)]
pub struct AssembledStack {
    /// Changes in stack order
    pub changes: Vec<Change>,
    /// Identities generated during this pass
    pub new_change_ids: HashSet<String>,
    /// Number of commits that had to be rewritten
    pub rewritten: usize,
}

impl AssembledStack {
    /// Whether `change` received its identity during this pass
    pub fn is_new(&self, change: &Change) -> bool {
        self.new_change_ids.contains(&change.change_id)
    }

    /// Commit at the top of the stack
    pub fn tip(&self) -> Option<Oid> {
        self.changes.last().map(|c| c.commit_id)
    }
}

/// Ensure identities for `commits` (oldest first) and chain them together
///
/// The first change targets `default_branch`; each later change targets
/// the previous change's head branch. When any commit was rewritten, HEAD
/// is moved to the new tip. An empty input is a no-op.
pub fn assemble_stack(
    store: &impl CommitStore,
    commits: &[Oid],
    namespace: &str,
    default_branch: &str,
) -> Result<AssembledStack> {
    let mut stack = AssembledStack::default();
    let mut seen = HashSet::new();
    let mut previous: Option<Oid> = None;

    for &id in commits {
        let ensured = ensure_change(store, id, previous)?;

        if !seen.insert(ensured.change_id.clone()) {
            return Err(Error::DuplicateChangeId(ensured.change_id));
        }
        if ensured.generated {
            stack.new_change_ids.insert(ensured.change_id.clone());
        }
        if ensured.rewritten {
            stack.rewritten += 1;
        }

        let base_branch = stack
            .changes
            .last()
            .map_or_else(|| default_branch.to_string(), |c| c.head_branch.clone());

        debug!(
            "Change {} at {} (base {})",
            ensured.change_id, ensured.commit_id, base_branch
        );

        previous = Some(ensured.commit_id);
        stack.changes.push(Change {
            head_branch: head_branch_name(namespace, &ensured.change_id),
            base_branch,
            is_draft: is_wip(&ensured.title),
            change_id: ensured.change_id,
            title: ensured.title,
            body: ensured.body,
            commit_id: ensured.commit_id,
        });
    }

    check_branch_chain(&stack.changes, default_branch)?;

    if let (Some(tip), Some(original)) = (stack.tip(), commits.last()) {
        if tip != *original {
            info!("Restacked {} commits; moving HEAD to {}", stack.rewritten, tip);
            store.update_head(tip)?;
        }
    }

    Ok(stack)
}

/// Check that each change's commit sits directly on the previous change
pub fn verify_stack(store: &impl CommitStore, changes: &[Change]) -> Result<()> {
    for pair in changes.windows(2) {
        let parents = store.parents(pair[1].commit_id)?;
        if parents != [pair[0].commit_id] {
            return Err(Error::Internal(format!(
                "commit {} of change {} is not stacked on {}",
                pair[1].commit_id, pair[1].change_id, pair[0].commit_id
            )));
        }
    }
    check_branch_chain(changes, changes.first().map_or("", |c| c.base_branch.as_str()))
}

fn check_branch_chain(changes: &[Change], default_branch: &str) -> Result<()> {
    let mut expected_base = default_branch;
    for change in changes {
        if change.base_branch != expected_base {
            return Err(Error::Internal(format!(
                "change {} targets {} instead of {}",
                change.change_id, change.base_branch, expected_base
            )));
        }
        expected_base = &change.head_branch;
    }
    Ok(())
}
