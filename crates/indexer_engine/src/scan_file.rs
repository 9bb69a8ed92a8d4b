use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexer_core::{greedy_groups, KeywordCounts, KeywordSet};

use crate::engine::ScanContext;

/// Scans one corpus directory: lists its direct-child files, splits them
/// into size-bounded groups, counts each group on the blocking pool and
/// merges the partial results.
pub(crate) async fn scan_corpus(directory: PathBuf, ctx: Arc<ScanContext>) -> KeywordCounts {
    log::info!("started job for corpus: {}", directory.display());

    let listing = {
        let directory = directory.clone();
        tokio::task::spawn_blocking(move || list_corpus_files(&directory)).await
    };
    let files = match listing {
        Ok(files) => files,
        Err(err) => {
            log::error!("corpus listing failed for {}: {err}", directory.display());
            return ctx.keywords.seeded_counts();
        }
    };

    let sizes: Vec<u64> = files.iter().map(|(_, size)| *size).collect();
    let mut subtasks = Vec::new();
    for range in greedy_groups(&sizes, ctx.file_size_limit) {
        let group: Vec<PathBuf> = files[range].iter().map(|(path, _)| path.clone()).collect();
        let keywords = ctx.keywords.clone();
        subtasks.push(tokio::task::spawn_blocking(move || {
            scan_group(&group, &keywords)
        }));
    }

    let mut parts = Vec::with_capacity(subtasks.len());
    for subtask in subtasks {
        match subtask.await {
            Ok(counts) => parts.push(counts),
            Err(err) => log::error!("file scan subtask failed: {err}"),
        }
    }
    log::debug!("finished job for corpus: {}", directory.display());
    ctx.keywords.merge_counts(parts)
}

/// Direct-child files with their sizes, sorted by path so grouping does not
/// depend on readdir order.
fn list_corpus_files(directory: &Path) -> Vec<(PathBuf, u64)> {
    let Ok(entries) = fs::read_dir(directory) else {
        log::error!("cannot list corpus directory {}", directory.display());
        return Vec::new();
    };
    let mut files: Vec<(PathBuf, u64)> = entries
        .flatten()
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            metadata.is_file().then(|| (entry.path(), metadata.len()))
        })
        .collect();
    files.sort();
    files
}

/// Counts keyword occurrences across one group of files, line by line. An
/// unreadable file contributes no lines instead of failing the group.
fn scan_group(files: &[PathBuf], keywords: &KeywordSet) -> KeywordCounts {
    let mut counts = keywords.seeded_counts();
    for path in files {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                log::debug!("skipping unreadable file {}: {err}", path.display());
                continue;
            }
        };
        for line in BufReader::new(file).lines() {
            let Ok(line) = line else {
                break;
            };
            keywords.tally(&mut counts, line.split_whitespace());
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::scan_group;
    use indexer_core::KeywordSet;

    #[test]
    fn unreadable_files_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.txt");
        fs::write(&present, "alpha beta alpha").unwrap();
        let missing = dir.path().join("missing.txt");

        let keywords = KeywordSet::new(["alpha", "beta"]);
        let counts = scan_group(&[present, missing], &keywords);
        assert_eq!(counts["alpha"], 2);
        assert_eq!(counts["beta"], 1);
    }
}
