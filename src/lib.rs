//! git-stacked - Stacked pull requests from a linear series of git commits
//!
//! Every local commit on top of the base branch becomes a change with a
//! stable `Change-ID` trailer, its own remote branch and its own pull
//! request, based on the previous change's branch.

pub mod auth;
pub mod change;
pub mod error;
pub mod graph;
pub mod platform;
pub mod repo;
pub mod submit;
pub mod types;
