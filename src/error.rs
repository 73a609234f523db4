/// failure reported by the local (git subprocess) history source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("local source error: {0}")]
pub struct LocalSourceError(pub String);

/// failure reported by the remote (GitHub API) history source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("remote source error: {0}")]
pub struct RemoteSourceError(pub String);

/// error returned by a branch comparison, tagged with the side that failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    #[error(transparent)]
    Local(#[from] LocalSourceError),

    #[error(transparent)]
    Remote(#[from] RemoteSourceError),
}

impl CompareError {
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}
