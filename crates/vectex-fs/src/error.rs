use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Typed failures raised by the file-system layer.
///
/// One variant per precondition, so callers can react to the exact condition
/// (e.g. prompt before overwriting on [`FsError::AlreadyExists`]) instead of
/// string-matching messages.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("the path '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("the path '{0}' is a directory, not a file")]
    NotAFile(PathBuf),

    #[error("the path '{0}' is a file, not a directory")]
    NotADirectory(PathBuf),

    #[error("the file '{0}' already exists and overwrite is disabled")]
    AlreadyExists(PathBuf),

    #[error("the parent directory '{0}' does not exist")]
    ParentMissing(PathBuf),

    #[error("a parent of the path '{0}' is a file")]
    PathIsFile(PathBuf),

    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy to '{path}': {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete '{path}': {source}")]
    DeletionFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid base64 payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
}
