//! Commit graph walking
//!
//! Splits local history into commits the base already contains and the
//! new commits that form the stack.

mod walker;

pub use walker::{all_ancestors, discover_new_commits, new_commits, NewCommits};
