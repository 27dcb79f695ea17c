//! Change identity
//!
//! Every commit in a stack carries a `Change-ID` trailer that survives
//! amends and rebases. [`ensure_change`] tags untagged commits and
//! re-parents them onto the previous change in one rewrite.

pub mod trailer;

use crate::error::Result;
use crate::repo::CommitStore;
use git2::Oid;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use uuid::Uuid;

pub use trailer::{CHANGE_ID_KEY, append_change_id, change_id, split_message};

static WIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(wip\b|\[wip\])").expect("valid regex")
});

/// A commit after its identity has been ensured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnsuredChange {
    /// Identity read from, or added to, the trailer block
    pub change_id: String,
    /// First line of the message
    pub title: String,
    /// Remainder of the message, trailers included
    pub body: String,
    /// Commit carrying the identity, parented on the previous change
    pub commit_id: Oid,
    /// Whether the identity was generated in this pass
    pub generated: bool,
    /// Whether a new commit had to be written
    pub rewritten: bool,
}

/// Generate a fresh, time-sortable change identity
pub fn generate_change_id() -> String {
    Uuid::now_v7().to_string()
}

/// Whether a title marks a change as work in progress
pub fn is_wip(title: &str) -> bool {
    WIP_PATTERN.is_match(title)
}

/// Remote branch name for a change
pub fn head_branch_name(namespace: &str, change_id: &str) -> String {
    format!("{namespace}/{change_id}")
}

/// Make sure `id` carries a change identity and sits on top of `previous`
///
/// A commit is rewritten only when it lacks an identity or its sole parent
/// is not `previous`; otherwise its original ID is returned. When
/// `previous` is `None` the commit keeps its parents.
pub fn ensure_change(
    store: &impl CommitStore,
    id: Oid,
    previous: Option<Oid>,
) -> Result<EnsuredChange> {
    let commit = store.read_commit(id)?;

    let (change_id, message, generated) = match trailer::change_id(&commit.message) {
        Some(existing) => (existing.to_string(), commit.message.clone(), false),
        None => {
            let new_id = generate_change_id();
            let message = append_change_id(&commit.message, &new_id);
            debug!("Assigned change ID {} to {}", new_id, id);
            (new_id, message, true)
        }
    };

    let parents = match previous {
        Some(prev) if commit.sole_parent() != Some(prev) => vec![prev],
        _ => commit.parents.clone(),
    };

    let rewritten = message != commit.message || parents != commit.parents;
    let commit_id = if rewritten {
        store.rewrite_commit(id, &message, &parents)?
    } else {
        id
    };

    let (title, body) = split_message(&message);
    Ok(EnsuredChange {
        change_id,
        title: title.to_string(),
        body: body.to_string(),
        commit_id,
        generated,
        rewritten,
    })
}
