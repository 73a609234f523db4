mod cli;
mod comparator;
mod config;
mod constants;
mod divergence;
mod error;
mod git;
mod github;
mod history;
mod ui;

use crate::cli::Cli;
use crate::comparator::{BranchComparator, Comparison};
use crate::config::Settings;
use crate::constants::{EXIT_FAILURE, EXIT_OVERLAP};
use crate::git::GitCli;
use crate::github::{GitHubClient, UreqTransport};
use anyhow::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse_args();
    ui::set_verbose(cli.verbose);

    let file_config = config::load_file_config(cli.config.as_deref())?;
    let settings = Settings::resolve(&cli, |key| std::env::var(key).ok(), file_config)?;

    // sanity checks
    git::sanity_check(&settings.repo_path)?;
    if settings.token.is_none() {
        warning!("no GitHub token configured, requests are unauthenticated and rate limited");
    }

    let local = GitCli::new(&settings.repo_path).with_timeout(settings.git_timeout);
    let remote = GitHubClient::new(
        UreqTransport::new(settings.http_timeout),
        settings.api_url.as_str(),
        settings.owner.as_str(),
        settings.repo.as_str(),
        settings.token.clone(),
    );
    let comparator = BranchComparator::new(local, remote);

    let local_branch = cli.local_branch.as_str();
    let remote_branch = cli.remote_branch();
    status!(
        "comparing {} with {}/{}:{}...",
        local_branch,
        settings.owner,
        settings.repo,
        remote_branch
    );

    let comparison = ui::with_spinner("fetching history...", || {
        comparator.compare(local_branch, remote_branch)
    })
    .map_err(|e| {
        let side = if e.is_local() {
            "local repository"
        } else {
            "GitHub"
        };
        anyhow::Error::new(e).context(format!("comparison failed reading from {side}"))
    })?;

    report(&comparison, cli.json)?;

    if cli.exit_code && !comparison.overlap.is_empty() {
        Ok(EXIT_OVERLAP)
    } else {
        Ok(0)
    }
}

/// print the overlap to stdout, with a summary on stderr
fn report(comparison: &Comparison, json: bool) -> Result<()> {
    match &comparison.base {
        Some(base) => {
            debug!("base: {}", base);
            debug!(
                "local tip: {}, {} modified file(s)",
                comparison.local_tip.as_deref().unwrap_or("-"),
                comparison.local_modified.len()
            );
            debug!(
                "remote tip: {}, {} modified file(s)",
                comparison.remote_tip.as_deref().unwrap_or("-"),
                comparison.remote_modified.len()
            );
        }
        None => warning!("no common base commit, branches are identical or unrelated"),
    }

    if json {
        info!(serde_json::to_string_pretty(&comparison.overlap)?);
        return Ok(());
    }

    for path in &comparison.overlap {
        info!(path);
    }

    let file_count = comparison.overlap.len();
    let file_word = if file_count == 1 { "file" } else { "files" };
    status!("{} {} modified on both branches", file_count, file_word);

    Ok(())
}
