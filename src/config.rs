use crate::cli::Cli;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, GIT_TIMEOUT_SECS, GITHUB_API_URL, HTTP_TIMEOUT_SECS,
};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// optional settings read from the config file
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub git_timeout_secs: Option<u64>,
    pub http_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// `<config dir>/branch-overlap/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}

/// load an explicitly requested config file (which must exist), or the
/// default one if present
pub fn load_file_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return FileConfig::load(path);
    }
    match FileConfig::default_path() {
        Some(path) if path.is_file() => FileConfig::load(&path),
        _ => Ok(FileConfig::default()),
    }
}

/// fully resolved settings for a comparison run
#[derive(Debug)]
pub struct Settings {
    pub repo_path: PathBuf,
    pub owner: String,
    pub repo: String,
    pub token: Option<String>,
    pub api_url: String,
    pub git_timeout: Duration,
    pub http_timeout: Duration,
}

impl Settings {
    /// merge sources, highest priority first: cli flags, environment, config file, defaults
    pub fn resolve(
        cli: &Cli,
        env: impl Fn(&str) -> Option<String>,
        file: FileConfig,
    ) -> Result<Self> {
        // blank values from any source count as unset
        let env = |key: &str| non_blank(env(key));

        let Some(owner) = non_blank(cli.owner.clone())
            .or_else(|| env("BRANCH_OVERLAP_OWNER"))
            .or_else(|| non_blank(file.owner))
        else {
            bail!("GitHub owner not configured (use --owner or BRANCH_OVERLAP_OWNER)");
        };
        let Some(repo) = non_blank(cli.repo.clone())
            .or_else(|| env("BRANCH_OVERLAP_REPO"))
            .or_else(|| non_blank(file.repo))
        else {
            bail!("GitHub repository not configured (use --repo or BRANCH_OVERLAP_REPO)");
        };

        let token = non_blank(cli.token.clone())
            .or_else(|| env("GITHUB_TOKEN"))
            .or_else(|| non_blank(file.token));
        let api_url = non_blank(cli.api_url.clone())
            .or_else(|| env("BRANCH_OVERLAP_API_URL"))
            .or_else(|| non_blank(file.api_url))
            .unwrap_or_else(|| GITHUB_API_URL.to_string());

        let git_timeout = cli
            .git_timeout
            .or(file.git_timeout_secs)
            .unwrap_or(GIT_TIMEOUT_SECS);
        let http_timeout = cli
            .http_timeout
            .or(file.http_timeout_secs)
            .unwrap_or(HTTP_TIMEOUT_SECS);
        if git_timeout == 0 || http_timeout == 0 {
            bail!("timeouts must be at least one second");
        }

        Ok(Self {
            repo_path: cli.repo_path.clone(),
            owner,
            repo,
            token,
            api_url,
            git_timeout: Duration::from_secs(git_timeout),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
