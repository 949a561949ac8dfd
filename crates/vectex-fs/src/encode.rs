//! Binary embedding codec.
//!
//! Bridges artifact bytes on disk and the text-based document format: a PDF
//! is stored inside the document as its base64 image and materialized back
//! into a file when needed.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::FsError;

/// Reads the full byte content of `path` and returns its base64 image.
pub fn encode_file_base64(path: &Path) -> Result<String, FsError> {
    let bytes = std::fs::read(path).map_err(|source| FsError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(STANDARD.encode(bytes))
}

/// Decodes base64 `encoded` and writes the bytes to `path`, creating or
/// truncating it.
///
/// Malformed input fails with [`FsError::InvalidEncoding`] before anything
/// is written; bytes are never silently truncated or substituted.
pub fn decode_file_base64(path: &Path, encoded: &str) -> Result<(), FsError> {
    let bytes = STANDARD.decode(encoded)?;
    std::fs::write(path, bytes).map_err(|source| FsError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
