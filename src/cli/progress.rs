//! CLI progress callback with styled output and a push spinner

use crate::cli::style::{Stream, Stylize, check, cross, dash, hyperlink_url, spinner_style};
use anstream::{eprintln, println};
use async_trait::async_trait;
use git_stacked::error::Error;
use git_stacked::submit::{Phase, ProgressCallback, PushStatus};
use git_stacked::types::{Change, PullRequest};
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(80);

/// Prints progress to the terminal
///
/// While branches are being pushed a spinner is shown; lines printed in the
/// meantime go above it.
#[derive(Default)]
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` on the spinner, starting it if needed
    fn spin(&self, message: String) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };

        if let Some(spinner) = slot.as_ref() {
            spinner.set_message(message);
            return;
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message);
        spinner.enable_steady_tick(SPINNER_TICK);
        *slot = Some(spinner);
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
        }
    }

    /// Print a line, above the spinner when one is running
    fn line(&self, text: &str) {
        if let Ok(slot) = self.spinner.lock() {
            if let Some(spinner) = slot.as_ref() {
                spinner.println(text);
                return;
            }
        }
        println!("{text}");
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        self.stop_spinner();
        match phase {
            Phase::Pushing => self.spin(format!("{phase}...")),
            Phase::Complete => {}
            _ => println!("{}...", phase.to_string().emphasis()),
        }
    }

    async fn on_branch_push(&self, branch: &str, status: PushStatus) {
        match &status {
            PushStatus::Started => {
                self.spin(format!("Pushing {}...", branch.accent()));
            }
            PushStatus::Success => {
                self.line(&format!("  {} Pushed {}", check(), branch.emphasis()));
            }
            PushStatus::AlreadySynced => {
                self.line(&format!(
                    "  {} {} {}",
                    dash(),
                    branch.accent(),
                    status.to_string().muted()
                ));
            }
            PushStatus::Failed(_) => {
                self.stop_spinner();
                eprintln!(
                    "  {} Failed to push {}",
                    cross(),
                    branch.accent().for_stderr()
                );
            }
        }
    }

    async fn on_pr_created(&self, change: &Change, pr: &PullRequest) {
        self.stop_spinner();
        let draft = if pr.draft { " (draft)" } else { "" };
        println!(
            "  {} Created PR {}{} for {}",
            check(),
            format!("#{}", pr.number).accent(),
            draft,
            change.head_branch.emphasis()
        );
        println!("    {}", hyperlink_url(Stream::Stdout, &pr.html_url));
    }

    async fn on_pr_updated(&self, change: &Change, pr: &PullRequest) {
        self.stop_spinner();
        println!(
            "  {} Updated PR {} for {}",
            check(),
            format!("#{}", pr.number).accent(),
            change.head_branch.emphasis()
        );
    }

    async fn on_pr_unchanged(&self, change: &Change, pr: &PullRequest) {
        self.stop_spinner();
        println!(
            "  {} PR {} for {} {}",
            dash(),
            format!("#{}", pr.number).accent(),
            change.head_branch.accent(),
            "up to date".muted()
        );
    }

    async fn on_error(&self, _err: &Error) {
        // main prints the error once it propagates
        self.stop_spinner();
    }

    async fn on_message(&self, message: &str) {
        self.line(message);
    }
}
