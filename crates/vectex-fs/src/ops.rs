//! File operations with explicit preconditions.
//!
//! Every operation checks its preconditions up front and fails with the
//! matching [`FsError`] variant; there is no partial silent success.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::FsError;
use crate::predicates::{is_directory, is_file};

/// Deletes the file at `path`.
///
/// A directory at `path` fails with [`FsError::NotAFile`]. A missing path is
/// a successful no-op unless `fail_if_missing` is set, in which case it fails
/// with [`FsError::NotFound`].
pub fn remove_file(path: &Path, fail_if_missing: bool) -> Result<(), FsError> {
    if is_file(path) {
        std::fs::remove_file(path).map_err(|source| FsError::DeletionFailed {
            path: path.to_path_buf(),
            source,
        })
    } else if is_directory(path) {
        Err(FsError::NotAFile(path.to_path_buf()))
    } else if fail_if_missing {
        Err(FsError::NotFound(path.to_path_buf()))
    } else {
        Ok(())
    }
}

/// Recursively deletes the directory tree at `path`.
///
/// A file at `path` fails with [`FsError::NotADirectory`]. There is no
/// rollback: a failing deletion may leave part of the tree removed, and the
/// error reports what could not be deleted.
pub fn remove_dir_recursive(path: &Path, fail_if_missing: bool) -> Result<(), FsError> {
    if is_directory(path) {
        std::fs::remove_dir_all(path).map_err(|source| FsError::DeletionFailed {
            path: path.to_path_buf(),
            source,
        })
    } else if is_file(path) {
        Err(FsError::NotADirectory(path.to_path_buf()))
    } else if fail_if_missing {
        Err(FsError::NotFound(path.to_path_buf()))
    } else {
        Ok(())
    }
}

/// Writes `text` to `path` as UTF-8.
///
/// The parent directory must already exist ([`FsError::ParentMissing`]).
/// When `path` exists and `overwrite` is false the call fails with
/// [`FsError::AlreadyExists`] and the original content stays untouched.
pub fn write_text_utf8(path: &Path, text: &str, overwrite: bool) -> Result<(), FsError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !is_directory(dir) {
            return Err(FsError::ParentMissing(dir.to_path_buf()));
        }
    }
    if is_file(path) && !overwrite {
        return Err(FsError::AlreadyExists(path.to_path_buf()));
    }
    std::fs::write(path, text).map_err(|source| FsError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the file at `path` as text.
///
/// Accepts plain UTF-8 as well as UTF-8/UTF-16 input carrying a byte-order
/// mark; the BOM is stripped and the result is one normalized [`String`].
pub fn read_text_utf8(path: &Path) -> Result<String, FsError> {
    if !is_file(path) {
        return Err(FsError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|source| FsError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    decode_text(&bytes).ok_or_else(|| FsError::ReadFailed {
        path: path.to_path_buf(),
        source: io::Error::new(
            io::ErrorKind::InvalidData,
            "the file is neither valid UTF-8 nor BOM-marked UTF-16",
        ),
    })
}

fn decode_text(bytes: &[u8]) -> Option<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec()).ok();
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    String::from_utf8(bytes.to_vec()).ok()
}

fn decode_utf16(bytes: &[u8], read_unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| read_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).ok()
}

/// Creates `path` and every missing ancestor, parents first.
///
/// Idempotent: an existing directory is a successful no-op. Fails with
/// [`FsError::PathIsFile`] when any ancestor segment exists as a file.
pub fn create_dir_recursive(path: &Path) -> Result<(), FsError> {
    // Walk up to the deepest existing ancestor, collecting the missing leaf
    // names on the way.
    let mut missing = Vec::new();
    let mut cursor = path.to_path_buf();
    while !is_directory(&cursor) {
        if is_file(&cursor) {
            return Err(FsError::PathIsFile(cursor));
        }
        match cursor.file_name() {
            Some(name) => missing.push(name.to_os_string()),
            None => break,
        }
        if !cursor.pop() {
            break;
        }
    }

    for name in missing.iter().rev() {
        cursor.push(name);
        if !is_directory(&cursor) {
            std::fs::create_dir(&cursor).map_err(|source| FsError::WriteFailed {
                path: cursor.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

/// Copies the file at `src` to `dst`.
///
/// `src` must be an existing file and `dst`'s parent directory must exist.
/// The overwrite policy mirrors [`write_text_utf8`]: an existing destination
/// fails with [`FsError::AlreadyExists`] unless `overwrite` is set.
pub fn copy_file(src: &Path, dst: &Path, overwrite: bool) -> Result<(), FsError> {
    if !is_file(src) {
        return Err(FsError::NotFound(src.to_path_buf()));
    }
    if let Some(dir) = dst.parent() {
        if !dir.as_os_str().is_empty() && !is_directory(dir) {
            return Err(FsError::ParentMissing(dir.to_path_buf()));
        }
    }
    if is_file(dst) && !overwrite {
        return Err(FsError::AlreadyExists(dst.to_path_buf()));
    }
    std::fs::copy(src, dst)
        .map(|_| ())
        .map_err(|source| FsError::CopyFailed {
            path: dst.to_path_buf(),
            source,
        })
}

/// Lists the files in `dir` whose leaf name matches a shell-style glob.
///
/// Non-recursive; subdirectories are skipped even when their name matches.
/// A missing or empty directory, or a pattern nothing matches, yields an
/// empty vector rather than an error. The result is sorted for
/// deterministic iteration.
pub fn find_files_matching(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let pattern = match glob::Pattern::new(pattern) {
        Ok(pattern) => pattern,
        Err(err) => {
            log::warn!("ignoring invalid glob pattern '{pattern}': {err}");
            return Vec::new();
        }
    };
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_file(path))
        .filter(|path| {
            path.file_name()
                .map(|name| pattern.matches(&name.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();
    matches.sort();
    matches
}

/// Absolutizes `path` against the current working directory.
pub fn absolute_path(path: &Path) -> Result<PathBuf, FsError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| FsError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(path))
}
