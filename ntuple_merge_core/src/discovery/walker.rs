//! Directory walker for merge input discovery
//!
//! Walks the base directory with walkdir, applies the [`FileMatcher`] and
//! groups the matches by their containing directory.

use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use super::{DirectoryMatches, Discovery, matcher::FileMatcher};
use crate::error::{IoError, Result};
use crate::observer::{MergeEvent, MergeObserver};

/// Options for input discovery
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Follow symbolic links to directories while walking
    pub follow_links: bool,
}

impl DiscoveryOptions {
    /// Create new options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

/// Recursively discover merge inputs under `base_dir`
///
/// The base directory must exist and be a directory. Any directory that
/// cannot be read while walking, the base directory included, is reported
/// through the observer as a skipped entry. Entries are visited in a fixed
/// order so that the merge order is reproducible, and each directory's match
/// count is reported as soon as the walk leaves that directory.
pub fn discover_files(
    base_dir: &Path,
    matcher: &FileMatcher,
    options: &DiscoveryOptions,
    observer: &dyn MergeObserver,
) -> Result<Discovery> {
    let metadata = std::fs::metadata(base_dir)
        .map_err(|e| IoError::from_std(e).with_path(base_dir))?;
    if !metadata.is_dir() {
        return Err(IoError::not_a_directory(base_dir).into());
    }

    observer.report(MergeEvent::DiscoveryStarted {
        base_dir: base_dir.to_path_buf(),
    });

    // Files before subdirectories, each by name: a directory's matches are
    // complete before the walk descends.
    let walker = WalkDir::new(base_dir)
        .follow_links(options.follow_links)
        .sort_by(|a, b| {
            is_directory(a)
                .cmp(&is_directory(b))
                .then_with(|| a.file_name().cmp(b.file_name()))
        });

    let mut directories: Vec<DirectoryMatches> = Vec::new();
    let mut current: Option<DirectoryMatches> = None;

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                observer.report(MergeEvent::EntrySkipped {
                    path: e.path().map(Path::to_path_buf),
                    error: e.to_string(),
                });
                continue;
            }
        };

        if is_directory(&entry) {
            // Directories sort after files, so the open group is complete
            close_group(&mut current, &mut directories, observer);
            continue;
        }
        if !is_regular_file(&entry) || !matcher.matches(entry.path()) {
            continue;
        }

        let directory = entry.path().parent().unwrap_or(base_dir);
        let in_current = current
            .as_ref()
            .is_some_and(|group| group.directory == directory);
        if !in_current {
            close_group(&mut current, &mut directories, observer);
            current = Some(DirectoryMatches {
                directory: directory.to_path_buf(),
                files: Vec::new(),
            });
        }
        if let Some(group) = current.as_mut() {
            group.files.push(entry.into_path());
        }
    }
    close_group(&mut current, &mut directories, observer);

    let files = directories
        .iter()
        .flat_map(|group| group.files.iter().cloned())
        .collect();

    Ok(Discovery { directories, files })
}

/// Report the open group, if any, and move it into `directories`
fn close_group(
    current: &mut Option<DirectoryMatches>,
    directories: &mut Vec<DirectoryMatches>,
    observer: &dyn MergeObserver,
) {
    if let Some(group) = current.take() {
        observer.report(MergeEvent::DirectoryMatched {
            directory: group.directory.clone(),
            count: group.files.len(),
        });
        directories.push(group);
    }
}

/// Directories, plus symlinks that resolve to directories
fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir())
}

/// Regular files, plus symlinks that resolve to regular files
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}
