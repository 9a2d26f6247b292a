use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{DescriptorRenderer, JobSettings, WorkUnit};

/// Write the local run script and mark it executable
pub fn write_local_script(
    renderer: &DescriptorRenderer,
    settings: &JobSettings,
    units: &[WorkUnit],
) -> Result<PathBuf> {
    let script = renderer.render_local(settings, units)?;
    let path = settings.local_script.clone();

    fs::write(&path, script)
        .with_context(|| format!("Failed to write local script '{}'", path.display()))?;
    make_executable(&path)?;

    log::debug!("Wrote {} invocations to '{}'", units.len(), path.display());
    Ok(path)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("Failed to set permissions on '{}'", path.display()))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
