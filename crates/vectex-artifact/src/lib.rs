//! # vectex-artifact
//!
//! Resolves the per-document artifact directory and computes the next free
//! versioned artifact name.
//!
//! The directory's actual contents are the only ground truth: every call
//! re-scans instead of caching an index counter, so artifacts deleted
//! externally free their index again. The scan is O(n) in the number of
//! artifacts a document has ever accumulated - a deliberate trade-off, since
//! that number stays small in practice.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vectex_fs::{create_dir_recursive, is_file, FsError};

pub mod names;

#[cfg(test)]
mod tests;

/// Failures of the artifact directory and naming service.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The document has no on-disk location yet, so there is nowhere to put
    /// its artifacts.
    #[error("the document has not been saved yet; artifacts need a document location on disk")]
    DocumentUnsaved,

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// The next unused versioned file for one document.
///
/// Transient: recomputed by scanning the artifact directory, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSlot {
    /// The document's artifact directory.
    pub directory: PathBuf,
    /// Version index, starting at 1.
    pub index: u32,
    /// Full path of the unused artifact file.
    pub path: PathBuf,
}

/// Returns the fixed-name artifact directory beside `document_path`,
/// creating it if necessary.
///
/// Fails with [`ArtifactError::DocumentUnsaved`] when the document does not
/// exist on disk.
pub fn resolve_artifact_directory(document_path: &Path) -> Result<PathBuf, ArtifactError> {
    if !is_file(document_path) {
        return Err(ArtifactError::DocumentUnsaved);
    }
    let parent = document_path
        .parent()
        .ok_or(ArtifactError::DocumentUnsaved)?;
    let directory = parent.join(names::ARTIFACT_DIR_NAME);
    create_dir_recursive(&directory)?;
    Ok(directory)
}

/// Computes the smallest unused artifact index for `document_path` and the
/// path it names.
///
/// Probes `<artifact-dir>/<doc>_<i>.pdf` from `i = 1` upward until a free
/// index is found. Calling this twice without creating the returned file
/// yields the same slot; once the file exists, the next call moves on.
pub fn next_artifact_slot(document_path: &Path) -> Result<ArtifactSlot, ArtifactError> {
    let directory = resolve_artifact_directory(document_path)?;
    let document_name = document_stem(document_path);

    let mut index = 1u32;
    loop {
        let path = directory.join(names::artifact_file_name(&document_name, index));
        if !is_file(&path) {
            return Ok(ArtifactSlot {
                directory,
                index,
                path,
            });
        }
        index += 1;
    }
}

fn document_stem(document_path: &Path) -> String {
    document_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
