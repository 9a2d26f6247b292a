//! Byte concatenation backend
//!
//! Writes every input, in order, into the output. The result is only a valid
//! ROOT file for formats that tolerate concatenation; it is meant for flat
//! binary data and as a backend with no external program.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{MergeEngine, OutputMode};
use crate::error::{IoError, MergeError, Result};

pub struct ConcatEngine {
    mode: OutputMode,
    output: Option<PathBuf>,
    inputs: Vec<PathBuf>,
}

impl ConcatEngine {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            output: None,
            inputs: Vec::new(),
        }
    }
}

impl MergeEngine for ConcatEngine {
    fn name(&self) -> &str {
        "concat"
    }

    fn set_output(&mut self, path: &Path) {
        self.output = Some(path.to_path_buf());
    }

    fn add_input(&mut self, path: &Path) {
        self.inputs.push(path.to_path_buf());
    }

    fn merge(&mut self) -> Result<()> {
        let output = self
            .output
            .clone()
            .ok_or_else(|| MergeError::output_not_configured(self.name()))?;

        let mut writer = BufWriter::new(self.mode.open_output(&output)?);

        for input in &self.inputs {
            let file = File::open(input).map_err(|e| IoError::from_std(e).with_path(input))?;
            std::io::copy(&mut BufReader::new(file), &mut writer)
                .map_err(|e| IoError::from_std(e).with_path(&output))?;
        }

        writer
            .flush()
            .map_err(|e| IoError::from_std(e).with_path(&output))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_concatenates_in_input_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.root"), b"first-").unwrap();
        fs::write(dir.path().join("b.root"), b"second").unwrap();
        let output = dir.path().join("merged.root");

        let mut engine = ConcatEngine::new(OutputMode::Overwrite);
        engine.set_output(&output);
        engine.add_input(&dir.path().join("b.root"));
        engine.add_input(&dir.path().join("a.root"));
        engine.merge().unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"secondfirst-");
    }

    #[test]
    fn test_overwrite_truncates_existing_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.root"), b"new").unwrap();
        let output = dir.path().join("merged.root");
        fs::write(&output, b"stale contents").unwrap();

        let mut engine = ConcatEngine::new(OutputMode::Overwrite);
        engine.set_output(&output);
        engine.add_input(&dir.path().join("a.root"));
        engine.merge().unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"new");
    }

    #[test]
    fn test_append_keeps_existing_output() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.root"), b"+tail").unwrap();
        let output = dir.path().join("merged.root");
        fs::write(&output, b"head").unwrap();

        let mut engine = ConcatEngine::new(OutputMode::Append);
        engine.set_output(&output);
        engine.add_input(&dir.path().join("a.root"));
        engine.merge().unwrap();

        assert_eq!(fs::read(&output).unwrap(), b"head+tail");
    }

    #[test]
    fn test_no_inputs_produces_empty_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("merged.root");

        let mut engine = ConcatEngine::new(OutputMode::Overwrite);
        engine.set_output(&output);
        engine.merge().unwrap();

        assert_eq!(fs::metadata(&output).unwrap().len(), 0);
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = TempDir::new().unwrap();
        let mut engine = ConcatEngine::new(OutputMode::Overwrite);
        engine.set_output(&dir.path().join("merged.root"));
        engine.add_input(&dir.path().join("gone.root"));

        assert!(matches!(engine.merge(), Err(Error::Io(_))));
    }

    #[test]
    fn test_merge_without_output_fails() {
        let mut engine = ConcatEngine::new(OutputMode::Overwrite);
        assert!(matches!(
            engine.merge(),
            Err(Error::Merge(MergeError::OutputNotConfigured { .. }))
        ));
    }
}
