use clap::Parser;
use std::path::PathBuf;

/// branch-overlap: list files modified on both a local branch and its GitHub
/// counterpart since the two diverged
#[derive(Parser, Debug)]
#[command(name = "branch-overlap", about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// local branch to compare
    pub local_branch: String,

    /// remote branch to compare (defaults to the local branch name)
    pub remote_branch: Option<String>,

    /// path to the local repository
    #[arg(long, default_value = ".")]
    pub repo_path: PathBuf,

    /// GitHub repository owner
    #[arg(long)]
    pub owner: Option<String>,

    /// GitHub repository name
    #[arg(long)]
    pub repo: Option<String>,

    /// GitHub token (prefer the GITHUB_TOKEN environment variable)
    #[arg(long)]
    pub token: Option<String>,

    /// GitHub API base url, for GitHub Enterprise
    #[arg(long)]
    pub api_url: Option<String>,

    /// config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// seconds a single git command may run
    #[arg(long, value_name = "SECS")]
    pub git_timeout: Option<u64>,

    /// seconds a single GitHub request may take
    #[arg(long, value_name = "SECS")]
    pub http_timeout: Option<u64>,

    /// print the overlapping files as a JSON array
    #[arg(long)]
    pub json: bool,

    /// exit with status 2 when any file overlaps
    #[arg(long)]
    pub exit_code: bool,

    /// print git commands, requests and intermediate results
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// the remote branch, falling back to the local branch name
    pub fn remote_branch(&self) -> &str {
        self.remote_branch.as_deref().unwrap_or(&self.local_branch)
    }
}
