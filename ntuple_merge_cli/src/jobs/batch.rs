use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::{DescriptorRenderer, JobSettings, WorkUnit};

/// Write the HTCondor submission file
///
/// The log directory is created first; an existing one is left as is.
pub fn write_batch_file(
    renderer: &DescriptorRenderer,
    settings: &JobSettings,
    units: &[WorkUnit],
) -> Result<PathBuf> {
    fs::create_dir_all(&settings.log_dir).with_context(|| {
        format!(
            "Failed to create log directory '{}'",
            settings.log_dir.display()
        )
    })?;

    let submit = renderer.render_batch(settings, units)?;
    let path = settings.batch_file.clone();
    fs::write(&path, submit)
        .with_context(|| format!("Failed to write submission file '{}'", path.display()))?;

    log::debug!("Wrote {} job stanzas to '{}'", units.len(), path.display());
    Ok(path)
}
