//! Merge input discovery
//!
//! Finds the `.root` files a merge should consume: a recursive walk of the
//! base directory filtered by a [`FileMatcher`], with matches kept both per
//! containing directory and as one flat list in discovery order.

mod matcher;
mod walker;

pub use matcher::{FileMatcher, MatchPolicy, TARGET_EXTENSION, literal_prefix};
pub use walker::{DiscoveryOptions, discover_files};

use serde::Serialize;
use std::path::PathBuf;

/// A discovered file with its on-disk size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredFile {
    /// Path to the discovered file
    pub path: PathBuf,
    /// Size of the file in bytes
    pub size: u64,
}

/// Matches found directly inside one directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryMatches {
    pub directory: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Result of one discovery pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discovery {
    /// Per-directory matches, in walk order
    pub directories: Vec<DirectoryMatches>,
    /// Every match, in the order it will be merged
    pub files: Vec<PathBuf>,
}

impl Discovery {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
