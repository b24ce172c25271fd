//! Directory snapshots for "left untouched" assertions.
//!
//! Shared by the unit-test fixtures and the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Every entry below `dir` by relative path, with file contents
///
/// Directories appear with empty contents so a removed empty directory
/// still changes the snapshot.
pub fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| {
            let entry = entry.expect("Failed to walk directory");
            let rel = entry
                .path()
                .strip_prefix(dir)
                .expect("entry below root")
                .to_path_buf();
            let content = if entry.file_type().is_file() {
                fs::read(entry.path()).expect("Failed to read file")
            } else {
                Vec::new()
            };
            (rel, content)
        })
        .collect()
}
