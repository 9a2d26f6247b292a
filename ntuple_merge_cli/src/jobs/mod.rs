//! Job descriptor generation
//!
//! Every immediate subdirectory of the storage root is one unit of work. The
//! generator writes either a sequential shell script or an HTCondor
//! submission file with one merge invocation per unit; unit `R/D` merges to
//! `R/D.root`.

mod batch;
mod local;
mod templates;

pub use batch::write_batch_file;
pub use local::write_local_script;
pub use templates::DescriptorRenderer;

use anyhow::{Context, Result};
use ntuple_merge_core::error::IoError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::JobsConfig;

/// One subdirectory of the storage root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkUnit {
    pub name: String,
    pub path: PathBuf,
}

impl WorkUnit {
    /// File the merge for this unit writes to
    pub fn output(&self) -> PathBuf {
        let mut output = self.path.clone().into_os_string();
        output.push(".root");
        PathBuf::from(output)
    }
}

/// Kind of descriptor to generate
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobMode {
    /// Sequential bash script
    Local,
    /// HTCondor submission file
    #[value(alias = "condor")]
    Batch,
}

/// Everything the generator needs, resolved from configuration
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub storage_root: PathBuf,
    pub pattern: String,
    pub executable: String,
    pub job_flavour: String,
    pub local_script: PathBuf,
    pub batch_file: PathBuf,
    pub log_dir: PathBuf,
}

impl From<&JobsConfig> for JobSettings {
    fn from(config: &JobsConfig) -> Self {
        Self {
            storage_root: config.storage_root.clone(),
            pattern: config.pattern.clone(),
            executable: config.executable.clone(),
            job_flavour: config.job_flavour.clone(),
            local_script: config.local_script.clone(),
            batch_file: config.batch_file.clone(),
            log_dir: config.log_dir.clone(),
        }
    }
}

/// Summary of a written descriptor
#[derive(Debug, Clone)]
pub struct GeneratedDescriptor {
    pub path: PathBuf,
    pub mode: JobMode,
    pub units: Vec<WorkUnit>,
}

/// List the immediate subdirectories of `root`, sorted by name
///
/// Plain files are ignored. Failing to list the root is fatal.
pub fn list_work_units(root: &Path) -> Result<Vec<WorkUnit>> {
    let entries = fs::read_dir(root)
        .map_err(|e| ntuple_merge_core::Error::from(IoError::from_std(e).with_path(root)))
        .with_context(|| format!("Failed to list storage root '{}'", root.display()))?;

    let mut units = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| ntuple_merge_core::Error::from(IoError::from_std(e).with_path(root)))?;
        let path = entry.path();
        if path.is_dir() {
            units.push(WorkUnit {
                name: entry.file_name().to_string_lossy().into_owned(),
                path: root.join(entry.file_name()),
            });
        }
    }

    units.sort_by(|a, b| a.name.cmp(&b.name));
    log::debug!(
        "Found {} work units under '{}'",
        units.len(),
        root.display()
    );
    Ok(units)
}

/// Enumerate units and write the descriptor for `mode`
pub fn generate(mode: JobMode, settings: &JobSettings) -> Result<GeneratedDescriptor> {
    let units = list_work_units(&settings.storage_root)?;
    let renderer = DescriptorRenderer::new()?;

    let path = match mode {
        JobMode::Local => write_local_script(&renderer, settings, &units)?,
        JobMode::Batch => write_batch_file(&renderer, settings, &units)?,
    };

    Ok(GeneratedDescriptor { path, mode, units })
}
