//! Stub merge engine

use ntuple_merge_core::error::{IoError, MergeError};
use ntuple_merge_core::{MergeEngine, Result};
use std::path::{Path, PathBuf};

/// What the stub does when `merge` is called
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Write an output of exactly this many bytes
    WriteBytes(u64),
    /// Report failure without touching the output
    Fail(String),
    /// Report success without creating any output
    SucceedWithoutOutput,
}

/// Merge engine that records its calls and follows a fixed behavior
pub struct StubEngine {
    behavior: StubBehavior,
    output: Option<PathBuf>,
    inputs: Vec<PathBuf>,
    merge_calls: usize,
}

impl StubEngine {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            output: None,
            inputs: Vec::new(),
            merge_calls: 0,
        }
    }

    /// Stub that writes `bytes` bytes of output
    pub fn writing(bytes: u64) -> Self {
        Self::new(StubBehavior::WriteBytes(bytes))
    }

    /// Stub that always fails
    pub fn failing(reason: &str) -> Self {
        Self::new(StubBehavior::Fail(reason.to_string()))
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    pub fn merge_calls(&self) -> usize {
        self.merge_calls
    }
}

impl MergeEngine for StubEngine {
    fn name(&self) -> &str {
        "stub"
    }

    fn set_output(&mut self, path: &Path) {
        self.output = Some(path.to_path_buf());
    }

    fn add_input(&mut self, path: &Path) {
        self.inputs.push(path.to_path_buf());
    }

    fn merge(&mut self) -> Result<()> {
        self.merge_calls += 1;

        match &self.behavior {
            StubBehavior::WriteBytes(bytes) => {
                let output = self
                    .output
                    .as_ref()
                    .ok_or_else(|| MergeError::output_not_configured("stub"))?;
                std::fs::write(output, vec![0u8; *bytes as usize])
                    .map_err(|e| IoError::from_std(e).with_path(output))?;
                Ok(())
            }
            StubBehavior::Fail(reason) => Err(MergeError::engine_failed("stub", reason).into()),
            StubBehavior::SucceedWithoutOutput => Ok(()),
        }
    }
}
