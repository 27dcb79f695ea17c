//! Commit graph walker
//!
//! Two walks over parent links: a full ancestor closure of the base, and a
//! first-parent walk from the tip that stops at the first known commit.

use crate::error::Result;
use crate::repo::CommitStore;
use git2::Oid;
use std::collections::HashSet;
use tracing::{debug, info};

/// Commits found on top of the base, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCommits {
    /// New commits in commit-time order (oldest first)
    pub commits: Vec<Oid>,
    /// Merge commit that ended the walk, if any
    ///
    /// The merge itself and everything behind it are left out of `commits`.
    pub merge_boundary: Option<Oid>,
}

/// Every commit reachable from `start`, including `start` itself
///
/// Visits all parents, not only the first, so diamond-shaped histories are
/// fully covered. Commits seen twice are skipped.
pub fn all_ancestors(store: &impl CommitStore, start: Oid) -> Result<HashSet<Oid>> {
    let mut seen = HashSet::new();
    let mut pending = vec![start];

    while let Some(id) = pending.pop() {
        if !seen.insert(id) {
            continue;
        }
        pending.extend(store.parents(id)?);
    }

    debug!("Base {} has {} ancestors", start, seen.len());
    Ok(seen)
}

/// Walk first parents from `start` until a commit in `known` is reached
///
/// The known commit is excluded. A root commit ends the walk and is
/// included; a merge commit ends the walk and is excluded.
pub fn new_commits(
    store: &impl CommitStore,
    start: Oid,
    known: &HashSet<Oid>,
) -> Result<NewCommits> {
    let mut commits = Vec::new();
    let mut merge_boundary = None;
    let mut current = Some(start);

    while let Some(id) = current {
        if known.contains(&id) {
            break;
        }

        let parents = store.parents(id)?;
        if parents.len() > 1 {
            info!(
                "Stopped at merge commit {}; commits behind it are not part of the stack",
                id
            );
            merge_boundary = Some(id);
            break;
        }

        commits.push(id);
        current = parents.first().copied();
    }

    // Discovered newest first; callers need commit-time order
    commits.reverse();

    debug!("Found {} new commits on top of base", commits.len());
    Ok(NewCommits {
        commits,
        merge_boundary,
    })
}

/// New commits reachable from `head` but not from `base`, oldest first
pub fn discover_new_commits(store: &impl CommitStore, base: Oid, head: Oid) -> Result<NewCommits> {
    let known = all_ancestors(store, base)?;
    new_commits(store, head, &known)
}
