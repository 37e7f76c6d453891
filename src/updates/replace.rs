//! Atomic replacement of the installed executable.
//!
//! The new binary is written to a sibling temporary file and renamed over
//! the target, so the target path always holds either the complete old
//! binary or the complete new one. A process already running the old
//! binary keeps its open inode on POSIX filesystems; platforms that refuse
//! to replace a running executable report the rename failure as an error.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::Builder;
use tracing::{debug, warn};

use super::error::UpdateError;

/// Mode given to the replacement binary (rwxr-xr-x).
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Path of the binary to replace.
///
/// An override is returned verbatim. Otherwise the running executable is
/// located and every symlink resolved, so that the real file is replaced
/// instead of the link pointing at it.
pub fn resolve_executable_path(override_path: Option<&Path>) -> Result<PathBuf, UpdateError> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }

    let exe = std::env::current_exe().map_err(UpdateError::Os)?;
    let resolved = fs::canonicalize(&exe).map_err(UpdateError::Os)?;
    debug!(
        "Resolved executable {} -> {}",
        exe.display(),
        resolved.display()
    );
    Ok(resolved)
}

/// Atomically replace `target` with `new_binary`.
///
/// `target` itself is never opened for writing; the final rename is the
/// only operation that touches it. Any failure before the rename removes
/// the temporary file.
pub fn replace_binary(target: &Path, new_binary: &[u8]) -> Result<(), UpdateError> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = format!(
        ".{}.update.",
        target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "aw".to_string())
    );

    // Dropping `tmp` before it is persisted deletes the file.
    let mut tmp = Builder::new()
        .prefix(&prefix)
        .tempfile_in(dir)
        .map_err(|e| UpdateError::io("creating temp file in", dir, e))?;
    debug!("Writing {} bytes to {}", new_binary.len(), tmp.path().display());

    tmp.write_all(new_binary)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| UpdateError::io("writing temp file", tmp.path(), e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(EXECUTABLE_MODE))
            .map_err(|e| UpdateError::io("setting permissions on", tmp.path(), e))?;
    }

    // Close the handle before renaming; the path still cleans up on drop.
    let tmp_path = tmp.into_temp_path();
    tmp_path
        .persist(target)
        .map_err(|e| {
            let leftover = e.path.to_path_buf();
            if let Err(cleanup) = e.path.close() {
                warn!("Failed to remove {}: {}", leftover.display(), cleanup);
            }
            UpdateError::io("renaming over", target, e.error)
        })?;

    debug!("Replaced {}", target.display());
    Ok(())
}
