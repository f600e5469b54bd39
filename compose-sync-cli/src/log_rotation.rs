//! Size-based rotation of the run log.
//!
//! Checked once at startup, before the log file is opened:
//!   compose-sync.log → compose-sync.log.1 → … → compose-sync.log.5

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Size above which the log is rotated (10 MiB).
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated copies kept; the oldest beyond this is deleted.
pub const MAX_ROTATED_FILES: usize = 5;

/// Rotate `log_path` when it has reached `max_bytes`.
///
/// Returns `Ok(false)` when the file is smaller or does not exist yet. The
/// live path is left absent after rotation; the caller reopens it.
pub fn rotate_if_needed(log_path: &Path, max_bytes: u64, max_files: usize) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    if size < max_bytes || max_files == 0 {
        return Ok(false);
    }

    let oldest = numbered_path(log_path, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..max_files).rev() {
        let src = numbered_path(log_path, n);
        if src.exists() {
            fs::rename(&src, numbered_path(log_path, n + 1))?;
        }
    }
    fs::rename(log_path, numbered_path(log_path, 1))?;
    Ok(true)
}

/// `<base>.<n>`, e.g. `compose-sync.log.2`.
fn numbered_path(base: &Path, n: usize) -> PathBuf {
    let mut name = base.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{n}"));
    base.with_file_name(name)
}
