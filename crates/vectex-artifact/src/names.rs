//! The on-disk naming convention for generated artifacts.

/// Name of the artifact directory created beside the document file.
pub const ARTIFACT_DIR_NAME: &str = "typeset";

/// Extension of the artifacts produced by the external engine.
pub const ARTIFACT_EXTENSION: &str = "pdf";

/// File name of the artifact with the given version index, e.g. `doc_3.pdf`.
///
/// Indices are plain decimal with no padding; the slot scan probes names
/// forward and never parses them back.
pub fn artifact_file_name(document_name: &str, index: u32) -> String {
    format!("{document_name}_{index}.{ARTIFACT_EXTENSION}")
}
