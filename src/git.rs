use crate::constants::GIT_TIMEOUT_SECS;
use crate::debug;
use crate::error::LocalSourceError;
use crate::history::HistorySource;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// local history source backed by the git binary
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            timeout: Duration::from_secs(GIT_TIMEOUT_SECS),
        }
    }

    /// limit how long a single git invocation may run
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// run git with `args` in the repository and return its stdout
    fn run(&self, args: &[&str]) -> Result<String, LocalSourceError> {
        let command_line = format!("git {}", args.join(" "));
        debug!("running {} in {}", command_line, self.repo_path.display());

        let mut child = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| LocalSourceError(format!("failed to run {command_line}: {e}")))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let timeout = self.timeout;

        // drain both pipes while waiting, a full pipe would block git forever
        let (status, stdout_data, stderr_data) = std::thread::scope(|scope| {
            let stdout_reader = scope.spawn(move || read_pipe(stdout));
            let stderr_reader = scope.spawn(move || read_pipe(stderr));

            let status: Result<ExitStatus, String> = match child.wait_timeout(timeout) {
                Ok(Some(status)) => Ok(status),
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    Err(format!(
                        "{command_line} timed out after {}s",
                        timeout.as_secs()
                    ))
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    Err(format!("failed to wait for {command_line}: {e}"))
                }
            };

            (
                status,
                join_reader(stdout_reader),
                join_reader(stderr_reader),
            )
        });

        let status = status.map_err(LocalSourceError)?;
        let stdout_data = stdout_data.map_err(|e| {
            LocalSourceError(format!("failed to read output of {command_line}: {e}"))
        })?;

        if !status.success() {
            let stderr_text = stderr_data
                .map(|data| String::from_utf8_lossy(&data).trim().to_string())
                .unwrap_or_default();
            return Err(LocalSourceError(format!(
                "{command_line} failed ({status}): {stderr_text}"
            )));
        }

        String::from_utf8(stdout_data)
            .map_err(|e| LocalSourceError(format!("{command_line} produced invalid utf-8: {e}")))
    }
}

impl HistorySource for GitCli {
    type Error = LocalSourceError;

    fn commit_history(&self, branch: &str) -> Result<Vec<String>, LocalSourceError> {
        check_revision(branch)?;
        // trailing -- keeps a branch named like a directory from reading as a path
        let output = self.run(&["rev-list", branch, "--"])?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn modified_files(&self, base: &str, tip: &str) -> Result<Vec<String>, LocalSourceError> {
        check_revision(base)?;
        check_revision(tip)?;
        // -z keeps paths unquoted, so non-ascii names compare equal to the api's
        let output = self.run(&["diff", "--name-only", "-z", base, tip, "--"])?;
        Ok(output
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// check that `repo_path` is inside a git repository
pub fn sanity_check(repo_path: &Path) -> Result<(), LocalSourceError> {
    GitCli::new(repo_path)
        .run(&["rev-parse", "--git-dir"])
        .map(|_| ())
        .map_err(|e| {
            LocalSourceError(format!(
                "not a git repository ({}): {}",
                repo_path.display(),
                e.0
            ))
        })
}

/// reject arguments git would parse as options
fn check_revision(revision: &str) -> Result<(), LocalSourceError> {
    if revision.is_empty() {
        return Err(LocalSourceError("invalid revision: empty name".to_string()));
    }
    if revision.starts_with('-') {
        return Err(LocalSourceError(format!("invalid revision: {revision}")));
    }
    Ok(())
}

fn read_pipe(pipe: Option<impl Read>) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut data)?;
    }
    Ok(data)
}

fn join_reader(
    handle: std::thread::ScopedJoinHandle<'_, std::io::Result<Vec<u8>>>,
) -> std::io::Result<Vec<u8>> {
    handle
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("pipe reader panicked")))
}
