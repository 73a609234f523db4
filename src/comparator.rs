use crate::debug;
use crate::divergence::{find_base_commit, intersect_files};
use crate::error::{CompareError, LocalSourceError, RemoteSourceError};
use crate::history::HistorySource;

/// everything gathered while comparing two branches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub base: Option<String>,
    pub local_tip: Option<String>,
    pub remote_tip: Option<String>,
    pub local_modified: Vec<String>,
    pub remote_modified: Vec<String>,
    pub overlap: Vec<String>,
}

/// compares a local branch against a remote one
///
/// sources are queried strictly in order (local history, remote history,
/// local files, remote files) and the first failure aborts the comparison.
pub struct BranchComparator<L, R> {
    local: L,
    remote: R,
}

impl<L, R> BranchComparator<L, R>
where
    L: HistorySource<Error = LocalSourceError>,
    R: HistorySource<Error = RemoteSourceError>,
{
    pub fn new(local: L, remote: R) -> Self {
        Self { local, remote }
    }

    /// files modified on both branches since they diverged
    pub fn compare_modified_files(
        &self,
        local_branch: &str,
        remote_branch: &str,
    ) -> Result<Vec<String>, CompareError> {
        Ok(self.compare(local_branch, remote_branch)?.overlap)
    }

    /// full comparison report; `overlap` is empty when no base commit exists
    pub fn compare(
        &self,
        local_branch: &str,
        remote_branch: &str,
    ) -> Result<Comparison, CompareError> {
        let local_commits = self.local.commit_history(local_branch)?;
        debug!(
            "local branch {} has {} commit(s)",
            local_branch,
            local_commits.len()
        );

        let remote_commits = self.remote.commit_history(remote_branch)?;
        debug!(
            "remote branch {} has {} commit(s)",
            remote_branch,
            remote_commits.len()
        );

        let base = find_base_commit(&local_commits, &remote_commits);
        let mut comparison = Comparison {
            base: base.clone(),
            local_tip: local_commits.first().cloned(),
            remote_tip: remote_commits.first().cloned(),
            ..Comparison::default()
        };

        // a base implies both histories are non-empty
        let (Some(base), Some(local_tip), Some(remote_tip)) =
            (base, local_commits.first(), remote_commits.first())
        else {
            debug!("no common base commit, skipping file comparison");
            return Ok(comparison);
        };
        debug!("base commit: {}", base);

        comparison.local_modified = self.local.modified_files(&base, local_tip)?;
        comparison.remote_modified = self.remote.modified_files(&base, remote_tip)?;
        comparison.overlap =
            intersect_files(&comparison.local_modified, &comparison.remote_modified);

        Ok(comparison)
    }
}

#[cfg(test)]
mod tests;
