/// a place commit histories and file changes can be read from
///
/// histories are returned most-recent-first. `base` passed to
/// `modified_files` is always a concrete commit; callers without a base must
/// not ask for modified files at all.
pub trait HistorySource {
    type Error;

    /// commit ids reachable from `branch`, newest first (may be empty)
    fn commit_history(&self, branch: &str) -> Result<Vec<String>, Self::Error>;

    /// paths changed between `base` and `tip`
    fn modified_files(&self, base: &str, tip: &str) -> Result<Vec<String>, Self::Error>;
}

impl<S: HistorySource + ?Sized> HistorySource for &S {
    type Error = S::Error;

    fn commit_history(&self, branch: &str) -> Result<Vec<String>, Self::Error> {
        (**self).commit_history(branch)
    }

    fn modified_files(&self, base: &str, tip: &str) -> Result<Vec<String>, Self::Error> {
        (**self).modified_files(base, tip)
    }
}
