//! Placing executables at their install path.
//!
//! The executable is staged next to its destination and renamed into
//! place, so the install path holds either the previous file or the
//! complete new one and never a partial copy.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use tempfile::NamedTempFile;

use super::outcome::ProvisionError;
use crate::check::probe::is_executable;
use crate::shell::is_elevated;

/// Mode applied to installed executables.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Whether `path` already holds a regular executable file.
pub fn is_installed(path: &Path) -> bool {
    path.is_file() && is_executable(path)
}

/// Copy `src` to `dest` atomically and mark it executable.
pub fn install_executable(src: &Path, dest: &Path) -> Result<(), ProvisionError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| ProvisionError::install(dest, "install path has no parent directory"))?;

    if !dir.is_dir() {
        return Err(ProvisionError::install(
            dest,
            format!("install directory {} does not exist", dir.display()),
        ));
    }

    let mut staged = NamedTempFile::new_in(dir).map_err(|e| install_error(dest, &e))?;

    let mut reader = File::open(src)
        .map(BufReader::new)
        .map_err(|e| ProvisionError::install(dest, format!("cannot read {}: {}", src.display(), e)))?;
    io::copy(&mut reader, staged.as_file_mut()).map_err(|e| install_error(dest, &e))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|e| install_error(dest, &e))?;

    set_executable(staged.path()).map_err(|e| install_error(dest, &e))?;

    staged
        .persist(dest)
        .map_err(|e| install_error(dest, &e.error))?;

    tracing::debug!("Installed {} to {}", src.display(), dest.display());
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn install_error(dest: &Path, err: &io::Error) -> ProvisionError {
    let message = if err.kind() == io::ErrorKind::PermissionDenied && !is_elevated() {
        format!(
            "{} (re-run with elevated privileges, e.g. sudo, or choose a writable --install-dir)",
            err
        )
    } else {
        err.to_string()
    };
    ProvisionError::install(dest, message)
}
