//! Infallible path predicates.
//!
//! Every query maps I/O errors and non-existence to `false`. For any path
//! that exists, [`is_file`] and [`is_directory`] are mutually exclusive.

use std::fs::OpenOptions;
use std::path::Path;

/// Returns `true` when `path` exists and is a regular file.
pub fn is_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Returns `true` when `path` exists and is a directory.
pub fn is_directory(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Probes whether `path` can be opened for writing.
///
/// The probe opens in append mode so existing content is never touched. If
/// the file did not exist before the call and the probe created it, the probe
/// removes it again: the file system is left exactly as it was found.
pub fn is_writable(path: &Path) -> bool {
    let existed = is_file(path);
    let writable = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .is_ok();
    if !existed && writable {
        // The probe created the file; roll that back.
        let _ = std::fs::remove_file(path);
    }
    writable
}
