//! CLI implementation for the `git-stacked` binary

mod progress;
pub mod style;
mod submit;

pub use submit::{SubmitOptions, run_submit};
