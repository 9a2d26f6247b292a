//! Pre-merge size accounting
//!
//! Best effort: a file that cannot be stat'ed is reported and left out of the
//! total, it never aborts the estimate.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::discovery::DiscoveredFile;
use crate::observer::{MergeEvent, MergeObserver};

/// A file whose size could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Aggregate size of the merge inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SizeEstimate {
    /// Sum of every size that could be read
    pub total_bytes: u64,
    /// Files that were sized, in input order
    pub sized_files: Vec<DiscoveredFile>,
    /// Files whose metadata could not be read
    pub failures: Vec<SizeFailure>,
}

/// Sum the on-disk size of `files`
pub fn estimate_total_size<P: AsRef<Path>>(
    files: &[P],
    observer: &dyn MergeObserver,
) -> SizeEstimate {
    let mut estimate = SizeEstimate::default();

    for path in files {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Ok(metadata) => {
                let size = metadata.len();
                estimate.total_bytes += size;
                observer.report(MergeEvent::FileSized {
                    path: path.to_path_buf(),
                    bytes: size,
                });
                estimate.sized_files.push(DiscoveredFile {
                    path: path.to_path_buf(),
                    size,
                });
            }
            Err(e) => {
                observer.report(MergeEvent::SizeUnavailable {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
                estimate.failures.push(SizeFailure {
                    path: path.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }

    observer.report(MergeEvent::EstimateComplete {
        total_bytes: estimate.total_bytes,
    });

    estimate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_files(dir: &TempDir, sizes: &[usize]) -> Vec<PathBuf> {
        sizes
            .iter()
            .enumerate()
            .map(|(i, size)| {
                let path = dir.path().join(format!("out_{i}.root"));
                fs::write(&path, vec![0u8; *size]).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_estimate_is_exact_sum() {
        let dir = TempDir::new().unwrap();
        let files = write_files(&dir, &[10, 200, 3000]);

        let estimate = estimate_total_size(&files, &NullObserver);

        assert_eq!(estimate.total_bytes, 3210);
        assert_eq!(estimate.sized_files.len(), 3);
        assert!(estimate.failures.is_empty());
    }

    #[test]
    fn test_missing_file_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let mut files = write_files(&dir, &[100, 50]);
        files.insert(1, dir.path().join("vanished.root"));

        let estimate = estimate_total_size(&files, &NullObserver);

        assert_eq!(estimate.total_bytes, 150);
        assert_eq!(estimate.failures.len(), 1);
        assert_eq!(estimate.failures[0].path, dir.path().join("vanished.root"));
    }

    #[test]
    fn test_empty_input_is_zero() {
        let files: Vec<PathBuf> = Vec::new();
        let estimate = estimate_total_size(&files, &NullObserver);
        assert_eq!(estimate.total_bytes, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn test_removing_a_file_lowers_estimate_by_its_size(
            sizes in prop::collection::vec(0usize..4096, 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let dir = TempDir::new().unwrap();
            let files = write_files(&dir, &sizes);
            let removed = pick.index(files.len());

            let full = estimate_total_size(&files, &NullObserver);
            let mut fewer = files.clone();
            fewer.remove(removed);
            let partial = estimate_total_size(&fewer, &NullObserver);

            prop_assert_eq!(full.total_bytes, sizes.iter().sum::<usize>() as u64);
            prop_assert_eq!(full.total_bytes - partial.total_bytes, sizes[removed] as u64);
        }
    }
}
