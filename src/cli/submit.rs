//! Submit the commits on top of the base branch as stacked PRs

use crate::cli::progress::CliProgress;
use crate::cli::style::{Stream, Stylize, arrow, check, hyperlink_url, plural};
use anstream::println;
use anyhow::{Context, Result};
use git2::Oid;
use git_stacked::auth::get_github_auth;
use git_stacked::error::Error;
use git_stacked::graph::discover_new_commits;
use git_stacked::platform::{create_platform_service, parse_repo_info};
use git_stacked::repo::{CommitStore, GitRepo, PreviewStore, PushCredentials, select_remote};
use git_stacked::submit::{
    AssembledStack, Phase, ProgressCallback, SyncResult, assemble_stack, create_sync_plan,
    display_branch, execute_sync_plan, prepare_push, publish_changes, report_dry_run,
};
use std::path::Path;
use tracing::debug;

/// Options for a submit run
#[derive(Debug, Clone, Copy)]
pub struct SubmitOptions<'a> {
    /// Path inside the repository
    pub path: &'a Path,
    /// Base branch; the repository's default branch when `None`
    pub onto: Option<&'a str>,
    /// Remote to push to
    pub remote: Option<&'a str>,
    /// Only report what would happen
    pub dry_run: bool,
}

/// Run the submit command
pub async fn run_submit(options: SubmitOptions<'_>) -> Result<()> {
    let progress = CliProgress::new();

    let repo = GitRepo::open(options.path).with_context(|| {
        format!("failed to open repository at {}", options.path.display())
    })?;

    let remotes = repo.remotes()?;
    let upstream = repo.upstream_remote();
    let remote = select_remote(&remotes, options.remote, upstream.as_deref())?.clone();
    debug!("Using remote {} ({})", remote.name, remote.url);

    let platform_config = parse_repo_info(&remote.url)?;

    // Credentials are checked before anything is rewritten
    let auth = get_github_auth(platform_config.host.as_deref()).await?;
    let platform = create_platform_service(&platform_config, &auth)?;
    let login = platform.current_user().await?;
    let credentials = PushCredentials {
        username: login.clone(),
        token: auth.token.clone(),
    };

    let base_branch = match options.onto {
        Some(branch) => branch.to_string(),
        None => platform.default_branch().await?,
    };

    progress.on_phase(Phase::Discovering).await;

    let base = resolve_base(&repo, &remote.name, &base_branch)?;
    let head = repo.resolve_revision("HEAD")?;
    let found = discover_new_commits(&repo, base, head)?;

    if let Some(merge) = found.merge_boundary {
        println!(
            "{} stopped at merge commit {}; commits behind it are not submitted",
            "note:".warn().for_stdout(),
            merge.to_string().accent()
        );
    }

    if found.commits.is_empty() {
        println!("No new commits on top of {}", base_branch.accent());
        return Ok(());
    }

    progress.on_phase(Phase::Rewriting).await;

    let stack = if options.dry_run {
        assemble(&PreviewStore::new(&repo), &found.commits, &login, &base_branch)?
    } else {
        assemble(&repo, &found.commits, &login, &base_branch)?
    };
    print_stack(&stack, &base_branch, options.dry_run);

    if options.dry_run {
        let push = prepare_push(&repo, &remote.name, &stack.changes, &credentials)?;
        let plan = create_sync_plan(&stack.changes, platform.as_ref()).await?;
        report_dry_run(&stack, &push, &plan, &remote.name, &progress).await;
        return Ok(());
    }

    publish_changes(&repo, &remote.name, &stack.changes, &credentials, &progress).await?;

    let plan = create_sync_plan(&stack.changes, platform.as_ref()).await?;
    let result = execute_sync_plan(&plan, platform.as_ref(), &progress).await?;

    progress.on_phase(Phase::Complete).await;
    print_summary(&result);

    Ok(())
}

fn assemble(
    store: &impl CommitStore,
    commits: &[Oid],
    namespace: &str,
    base_branch: &str,
) -> Result<AssembledStack> {
    Ok(assemble_stack(store, commits, namespace, base_branch)?)
}

/// Resolve the base as `<remote>/<branch>` first, then as `<branch>`
fn resolve_base(repo: &GitRepo, remote: &str, branch: &str) -> Result<Oid> {
    let tracking = format!("{remote}/{branch}");
    match repo.resolve_revision(&tracking) {
        Ok(id) => {
            debug!("Base {} is {}", tracking, id);
            Ok(id)
        }
        Err(Error::RevisionNotFound(_)) => repo
            .resolve_revision(branch)
            .with_context(|| format!("base branch {branch} not found (tried {tracking})")),
        Err(e) => Err(e.into()),
    }
}

fn print_stack(stack: &AssembledStack, base_branch: &str, dry_run: bool) {
    println!(
        "Stack of {} on {}:",
        plural(stack.changes.len(), "change"),
        base_branch.accent()
    );
    for change in stack.changes.iter().rev() {
        let draft = if change.is_draft { " (draft)" } else { "" };
        let branch = if dry_run {
            display_branch(stack, change)
        } else {
            change.head_branch.clone()
        };
        println!(
            "  {} {}{}",
            branch.accent(),
            change.title.emphasis(),
            draft.muted()
        );
    }
    println!();
}

fn print_summary(result: &SyncResult) {
    println!();
    println!(
        "{} {} {}",
        check(),
        "Submitted".success(),
        plural(result.changes.len(), "change")
    );
    for synced in &result.changes {
        println!(
            "  {} {} {} {}",
            synced.change.change_id.muted(),
            synced.change.head_branch.accent(),
            arrow(),
            hyperlink_url(Stream::Stdout, &synced.pr.html_url)
        );
    }
}
