//! Merge engine abstraction
//!
//! The byte-level merge is delegated to a backend behind [`MergeEngine`]. The
//! orchestrator only sets the output, adds inputs in order and calls
//! [`MergeEngine::merge`] once; success or failure is the only signal it reads.

mod concat;
mod hadd;

pub use concat::ConcatEngine;
pub use hadd::{DEFAULT_HADD_PROGRAM, HaddEngine};

use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{IoError, Result};

/// Backend that merges an ordered list of input files into one output
pub trait MergeEngine {
    /// Short name used in events and error messages
    fn name(&self) -> &str;

    /// Set the file the merge writes to
    fn set_output(&mut self, path: &Path);

    /// Append an input file to the merge list
    fn add_input(&mut self, path: &Path);

    /// Run the merge once
    fn merge(&mut self) -> Result<()>;
}

/// What happens to an output file that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Recreate the output from scratch
    #[default]
    Overwrite,
    /// Merge into the existing output
    Append,
}

impl OutputMode {
    /// Open `path` for writing: truncated on overwrite, appended to otherwise
    pub(crate) fn open_output(self, path: &Path) -> Result<File> {
        let mut options = OpenOptions::new();
        options.create(true);
        match self {
            OutputMode::Overwrite => options.write(true).truncate(true),
            OutputMode::Append => options.append(true),
        };
        options
            .open(path)
            .map_err(|e| IoError::from_std(e).with_path(path).into())
    }
}

/// Available merge backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// ROOT's `hadd` command
    #[default]
    Hadd,
    /// Plain byte concatenation
    Concat,
}

/// Settings needed to build any backend
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub kind: EngineKind,
    pub mode: OutputMode,
    pub hadd_program: PathBuf,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            kind: EngineKind::default(),
            mode: OutputMode::default(),
            hadd_program: PathBuf::from(DEFAULT_HADD_PROGRAM),
        }
    }
}

/// Factory for merge engine implementations
pub struct EngineFactory;

impl EngineFactory {
    /// Create an engine from settings
    pub fn create(settings: &EngineSettings) -> Box<dyn MergeEngine> {
        match settings.kind {
            EngineKind::Hadd => Box::new(
                HaddEngine::new(settings.mode).with_program(settings.hadd_program.clone()),
            ),
            EngineKind::Concat => Box::new(ConcatEngine::new(settings.mode)),
        }
    }
}
