use std::collections::HashSet;

/// find the commit where two histories diverge
///
/// both histories must be newest-first. the scan starts at the oldest end of
/// each and walks towards the tips while the two sides agree; the base is the
/// newest commit of that shared run, taken from whichever side still has
/// commits beyond it.
///
/// returns None when:
/// - either history is empty
/// - the histories are identical (nothing diverged)
/// - the oldest commits already differ (unrelated histories)
///
/// this is a suffix match over two linear lists, not a merge-base over a
/// commit graph. histories that share ancestry but not their oldest commits
/// (shallow clones, rewritten roots, merges that reorder the list) are
/// reported as unrelated.
pub fn find_base_commit(local: &[String], remote: &[String]) -> Option<String> {
    if local.is_empty() || remote.is_empty() {
        return None;
    }

    let shared = local
        .iter()
        .rev()
        .zip(remote.iter().rev())
        .take_while(|(l, r)| l == r)
        .count();

    if shared == 0 {
        None
    } else if shared < local.len() {
        Some(local[local.len() - shared].clone())
    } else if shared < remote.len() {
        Some(remote[remote.len() - shared].clone())
    } else {
        None
    }
}

/// paths present in both lists, in `remote` order
///
/// equality is exact (no separator or case normalisation). duplicates in
/// `remote` are kept; duplicates in `local` have no effect.
pub fn intersect_files(local: &[String], remote: &[String]) -> Vec<String> {
    if local.is_empty() || remote.is_empty() {
        return Vec::new();
    }

    let local_set: HashSet<&str> = local.iter().map(String::as_str).collect();

    remote
        .iter()
        .filter(|path| local_set.contains(path.as_str()))
        .cloned()
        .collect()
}
