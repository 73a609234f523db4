use super::*;
use std::cell::RefCell;
use std::collections::HashMap;

/// in-memory history source that records every call made to it
struct FakeSource<E> {
    histories: HashMap<String, Vec<String>>,
    modified: HashMap<(String, String), Vec<String>>,
    fail_history: bool,
    fail_modified: bool,
    make_error: fn(String) -> E,
    calls: RefCell<Vec<String>>,
}

impl<E> FakeSource<E> {
    fn new(make_error: fn(String) -> E) -> Self {
        Self {
            histories: HashMap::new(),
            modified: HashMap::new(),
            fail_history: false,
            fail_modified: false,
            make_error,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn history(mut self, branch: &str, commits: &[&str]) -> Self {
        self.histories.insert(branch.to_string(), strings(commits));
        self
    }

    fn files(mut self, base: &str, tip: &str, files: &[&str]) -> Self {
        self.modified
            .insert((base.to_string(), tip.to_string()), strings(files));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn modified_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("modified:"))
            .count()
    }
}

impl<E> HistorySource for FakeSource<E> {
    type Error = E;

    fn commit_history(&self, branch: &str) -> Result<Vec<String>, E> {
        self.calls.borrow_mut().push(format!("history:{branch}"));
        if self.fail_history {
            return Err((self.make_error)(format!("history of {branch} unavailable")));
        }
        Ok(self.histories.get(branch).cloned().unwrap_or_default())
    }

    fn modified_files(&self, base: &str, tip: &str) -> Result<Vec<String>, E> {
        self.calls
            .borrow_mut()
            .push(format!("modified:{base}..{tip}"));
        if self.fail_modified {
            return Err((self.make_error)(format!("diff {base}..{tip} unavailable")));
        }
        Ok(self
            .modified
            .get(&(base.to_string(), tip.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn local() -> FakeSource<LocalSourceError> {
    FakeSource::new(LocalSourceError)
}

fn remote() -> FakeSource<RemoteSourceError> {
    FakeSource::new(RemoteSourceError)
}

/// diverged histories sharing c1, used by most scenarios
fn diverged(
    local_files: &[&str],
    remote_files: &[&str],
) -> (FakeSource<LocalSourceError>, FakeSource<RemoteSourceError>) {
    (
        local()
            .history("feature1", &["c3", "c2", "c1"])
            .files("c1", "c3", local_files),
        remote()
            .history("main", &["r1", "r2", "c1"])
            .files("c1", "r1", remote_files),
    )
}

#[test]
fn test_single_overlapping_file() {
    let (git, github) = diverged(&["fileA", "fileB", "fileC"], &["fileA", "file1", "file2"]);
    let comparator = BranchComparator::new(&git, &github);

    let files = comparator.compare_modified_files("feature1", "main").unwrap();

    assert_eq!(files, strings(&["fileA"]));
    assert_eq!(
        git.calls(),
        strings(&["history:feature1", "modified:c1..c3"])
    );
    assert_eq!(github.calls(), strings(&["history:main", "modified:c1..r1"]));
}

#[test]
fn test_no_overlapping_files() {
    let (git, github) = diverged(&["fileA", "fileB", "fileC"], &["file1", "file2", "file3"]);
    let comparator = BranchComparator::new(&git, &github);

    let files = comparator.compare_modified_files("feature1", "main").unwrap();

    assert!(files.is_empty());
    assert_eq!(git.modified_calls(), 1);
    assert_eq!(github.modified_calls(), 1);
}

#[test]
fn test_all_files_overlap() {
    let (git, github) = diverged(&["fileA", "fileB", "fileC"], &["fileA", "fileB", "fileC"]);
    let comparator = BranchComparator::new(&git, &github);

    let files = comparator.compare_modified_files("feature1", "main").unwrap();

    assert_eq!(files, strings(&["fileA", "fileB", "fileC"]));
}

#[test]
fn test_remote_behind_local() {
    let git = local()
        .history("feature1", &["c5", "c4", "c3", "c2", "c1"])
        .files("c3", "c5", &["fileA", "fileB", "fileC"]);
    let github = remote().history("main", &["c3", "c2", "c1"]);
    let comparator = BranchComparator::new(&git, &github);

    let comparison = comparator.compare("feature1", "main").unwrap();

    assert_eq!(comparison.base.as_deref(), Some("c3"));
    assert_eq!(comparison.local_modified, strings(&["fileA", "fileB", "fileC"]));
    assert!(comparison.overlap.is_empty());
    assert_eq!(github.calls(), strings(&["history:main", "modified:c3..c3"]));
}

#[test]
fn test_identical_histories_skip_file_lookup() {
    let git = local().history("feature2", &["c3", "c2", "c1"]);
    let github = remote().history("main", &["c3", "c2", "c1"]);
    let comparator = BranchComparator::new(&git, &github);

    let files = comparator.compare_modified_files("feature2", "main").unwrap();

    assert!(files.is_empty());
    assert_eq!(git.modified_calls(), 0);
    assert_eq!(github.modified_calls(), 0);
}

#[test]
fn test_empty_histories_skip_file_lookup() {
    let cases: [(&[&str], &[&str]); 3] = [
        (&[], &["r3", "r2", "c1"]),
        (&["c3", "c2", "c1"], &[]),
        (&[], &[]),
    ];

    for (local_history, remote_history) in cases {
        let git = local().history("feature3", local_history);
        let github = remote().history("main", remote_history);
        let comparator = BranchComparator::new(&git, &github);

        let comparison = comparator.compare("feature3", "main").unwrap();

        assert_eq!(comparison.base, None);
        assert!(comparison.overlap.is_empty());
        assert_eq!(git.modified_calls(), 0);
        assert_eq!(github.modified_calls(), 0);
    }
}

#[test]
fn test_unrelated_histories_skip_file_lookup() {
    let git = local().history("feature4", &["r1"]);
    let github = remote().history("main", &["c1"]);
    let comparator = BranchComparator::new(&git, &github);

    let comparison = comparator.compare("feature4", "main").unwrap();

    assert_eq!(comparison.base, None);
    assert_eq!(comparison.local_tip.as_deref(), Some("r1"));
    assert_eq!(comparison.remote_tip.as_deref(), Some("c1"));
    assert_eq!(git.modified_calls(), 0);
    assert_eq!(github.modified_calls(), 0);
}

#[test]
fn test_local_history_failure_stops_before_remote() {
    let mut git = local();
    git.fail_history = true;
    let github = remote().history("main", &["c1"]);
    let comparator = BranchComparator::new(&git, &github);

    let err = comparator
        .compare_modified_files("feature", "main")
        .unwrap_err();

    assert!(err.is_local());
    assert_eq!(git.calls(), strings(&["history:feature"]));
    assert!(github.calls().is_empty());
}

#[test]
fn test_remote_history_failure() {
    let git = local().history("feature", &["c1", "c2"]);
    let mut github = remote();
    github.fail_history = true;
    let comparator = BranchComparator::new(&git, &github);

    let err = comparator
        .compare_modified_files("feature", "main")
        .unwrap_err();

    assert!(matches!(err, CompareError::Remote(_)));
    assert_eq!(git.calls(), strings(&["history:feature"]));
    assert_eq!(github.calls(), strings(&["history:main"]));
}

#[test]
fn test_local_modified_files_failure() {
    let (mut git, github) = diverged(&["fileA"], &["fileA"]);
    git.fail_modified = true;
    let comparator = BranchComparator::new(&git, &github);

    let err = comparator
        .compare_modified_files("feature1", "main")
        .unwrap_err();

    assert_eq!(
        err,
        CompareError::Local(LocalSourceError("diff c1..c3 unavailable".to_string()))
    );
    assert_eq!(github.modified_calls(), 0);
}

#[test]
fn test_remote_modified_files_failure() {
    let (git, mut github) = diverged(&["fileA"], &["fileA"]);
    github.fail_modified = true;
    let comparator = BranchComparator::new(&git, &github);

    let err = comparator
        .compare_modified_files("feature1", "main")
        .unwrap_err();

    assert!(matches!(err, CompareError::Remote(_)));
    assert_eq!(git.modified_calls(), 1);
    assert_eq!(github.modified_calls(), 1);
}
