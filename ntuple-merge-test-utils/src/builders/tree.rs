//! Storage tree builder
//!
//! Lays out a temporary storage root with subdirectories and sized files.

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builder for a temporary storage root
pub struct StorageTreeBuilder {
    dirs: Vec<PathBuf>,
    files: Vec<(PathBuf, usize)>,
}

impl Default for StorageTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageTreeBuilder {
    pub fn new() -> Self {
        Self {
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Add an (initially empty) directory relative to the root
    pub fn with_dir(mut self, relative: &str) -> Self {
        self.dirs.push(PathBuf::from(relative));
        self
    }

    /// Add a file of `size` zero bytes relative to the root
    pub fn with_file(mut self, relative: &str, size: usize) -> Self {
        self.files.push((PathBuf::from(relative), size));
        self
    }

    /// Add `count` files named `out_<i>.root` of `size` bytes under `dir`
    pub fn with_outputs(mut self, dir: &str, count: usize, size: usize) -> Self {
        for i in 1..=count {
            self.files
                .push((PathBuf::from(dir).join(format!("out_{i}.root")), size));
        }
        self
    }

    /// Create the tree inside a fresh temporary directory
    pub fn build(self) -> TempDir {
        let root = TempDir::new().expect("failed to create temp dir");

        for dir in &self.dirs {
            fs::create_dir_all(root.path().join(dir)).expect("failed to create dir");
        }

        for (relative, size) in &self.files {
            let path = root.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("failed to create parent dir");
            }
            fs::write(&path, vec![0u8; *size]).expect("failed to write file");
        }

        root
    }
}
