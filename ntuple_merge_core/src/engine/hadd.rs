//! ROOT `hadd` backend
//!
//! Runs `hadd <-f|-a> -v 0 <output> <inputs...>` and treats a zero exit status
//! as success. With no inputs `hadd` is not run; the output is created (or
//! truncated, or left as is when appending) directly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{MergeEngine, OutputMode};
use crate::error::{MergeError, Result};

/// Program looked up on `PATH` when none is configured
pub const DEFAULT_HADD_PROGRAM: &str = "hadd";

pub struct HaddEngine {
    program: PathBuf,
    mode: OutputMode,
    output: Option<PathBuf>,
    inputs: Vec<PathBuf>,
}

impl HaddEngine {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            program: PathBuf::from(DEFAULT_HADD_PROGRAM),
            mode,
            output: None,
            inputs: Vec::new(),
        }
    }

    /// Use a specific `hadd` executable
    pub fn with_program(mut self, program: PathBuf) -> Self {
        self.program = program;
        self
    }

    /// Arguments passed to `hadd`, output first then inputs in order
    pub fn command_args(&self) -> Result<Vec<OsString>> {
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| MergeError::output_not_configured(self.name()))?;

        let mode_flag = match self.mode {
            OutputMode::Overwrite => "-f",
            OutputMode::Append => "-a",
        };

        let mut args: Vec<OsString> = vec![mode_flag.into(), "-v".into(), "0".into()];
        args.push(output.as_os_str().to_owned());
        args.extend(self.inputs.iter().map(|p| p.as_os_str().to_owned()));
        Ok(args)
    }
}

impl MergeEngine for HaddEngine {
    fn name(&self) -> &str {
        "hadd"
    }

    fn set_output(&mut self, path: &Path) {
        self.output = Some(path.to_path_buf());
    }

    fn add_input(&mut self, path: &Path) {
        self.inputs.push(path.to_path_buf());
    }

    fn merge(&mut self) -> Result<()> {
        if self.inputs.is_empty() {
            let output = self
                .output
                .as_ref()
                .ok_or_else(|| MergeError::output_not_configured(self.name()))?;
            log::debug!("No inputs, creating {} without hadd", output.display());
            self.mode.open_output(output)?;
            return Ok(());
        }

        let args = self.command_args()?;
        let program = self.program.display().to_string();
        log::debug!("Running {program} with {} arguments", args.len());

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| MergeError::launch(&program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(MergeError::engine_failed(self.name(), &status.to_string()).into())
        }
    }
}
