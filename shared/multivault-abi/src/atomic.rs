//! Crash-safe file replacement shared by the report and batch writers.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Sibling path a write is staged at before being renamed over `path`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_os_string();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Replace `path` with `contents`, creating missing parent directories.
///
/// Readers see either the previous file or the new one, never a partial
/// write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let staged = staging_path(path);
    fs::write(&staged, contents)?;
    fs::rename(&staged, path).map_err(|e| {
        let _ = fs::remove_file(&staged);
        e
    })
}
