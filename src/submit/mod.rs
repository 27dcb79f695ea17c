//! Stack submission engine
//!
//! Runs after the new commits have been discovered:
//! 1. Assembly - tag, restack and name every change
//! 2. Publishing - push changed branches in one request
//! 3. Planning - look up each change's pull request
//! 4. Execution - create or update pull requests in stack order

mod assemble;
mod execute;
mod plan;
mod progress;
mod publish;

pub use assemble::{AssembledStack, assemble_stack, verify_stack};
pub use execute::{
    SyncOutcome, SyncResult, SyncedChange, display_branch, execute_sync_plan, report_dry_run,
};
pub use plan::{PlannedPr, PrAction, SyncPlan, create_sync_plan, needs_update};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use publish::{BranchUpdate, PushPlan, plan_push, prepare_push, publish_changes};
