//! git-stacked - Stacked pull requests from a linear series of git commits
//!
//! Every commit between the base branch and HEAD becomes its own pull
//! request, based on the pull request of the commit below it.

use anstream::eprintln;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::style::Stylize;

#[derive(Parser)]
#[command(name = "git-stacked")]
#[command(about = "Submit each commit on top of the base branch as a stacked GitHub PR")]
#[command(version)]
struct Cli {
    /// Path to the git repository (defaults to current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Base branch of the stack (defaults to the repository's default branch)
    #[arg(long, value_name = "BRANCH")]
    onto: Option<String>,

    /// Git remote to push to
    #[arg(long, value_name = "NAME")]
    remote: Option<String>,

    /// Dry run - show what would be done without making changes
    #[arg(long)]
    dry_run: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "git_stacked=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let options = cli::SubmitOptions {
        path: &path,
        onto: cli.onto.as_deref(),
        remote: cli.remote.as_deref(),
        dry_run: cli.dry_run,
    };

    match cli::run_submit(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err:#}", "error".error());
            ExitCode::FAILURE
        }
    }
}
