use std::path::PathBuf;

use tempfile::tempdir;

use crate::{names, next_artifact_slot, resolve_artifact_directory, ArtifactError};

fn saved_document(dir: &std::path::Path) -> PathBuf {
    let document = dir.join("doc.graphic");
    std::fs::write(&document, "document body").unwrap();
    document
}

#[test]
fn test_unsaved_document_is_rejected() {
    let dir = tempdir().unwrap();
    let unsaved = dir.path().join("never_saved.graphic");

    assert!(matches!(
        resolve_artifact_directory(&unsaved),
        Err(ArtifactError::DocumentUnsaved)
    ));
    assert!(matches!(
        next_artifact_slot(&unsaved),
        Err(ArtifactError::DocumentUnsaved)
    ));
}

#[test]
fn test_artifact_directory_created_beside_document() {
    let dir = tempdir().unwrap();
    let document = saved_document(dir.path());

    let artifact_dir = resolve_artifact_directory(&document).unwrap();
    assert_eq!(artifact_dir, dir.path().join(names::ARTIFACT_DIR_NAME));
    assert!(artifact_dir.is_dir());

    // Resolving again is idempotent.
    assert_eq!(resolve_artifact_directory(&document).unwrap(), artifact_dir);
}

#[test]
fn test_slot_scan_is_dense_from_one() {
    let dir = tempdir().unwrap();
    let document = saved_document(dir.path());

    let first = next_artifact_slot(&document).unwrap();
    assert_eq!(first.index, 1);
    assert_eq!(
        first.path.file_name().unwrap().to_string_lossy(),
        "doc_1.pdf"
    );

    // Without creating the file, the same slot comes back.
    let again = next_artifact_slot(&document).unwrap();
    assert_eq!(again, first);

    // Once the slot is taken, the scan moves to the next index.
    std::fs::write(&first.path, "pdf bytes").unwrap();
    let second = next_artifact_slot(&document).unwrap();
    assert_eq!(second.index, 2);
    assert_eq!(
        second.path.file_name().unwrap().to_string_lossy(),
        "doc_2.pdf"
    );
}

#[test]
fn test_externally_deleted_artifact_frees_its_index() {
    let dir = tempdir().unwrap();
    let document = saved_document(dir.path());

    let artifact_dir = resolve_artifact_directory(&document).unwrap();
    std::fs::write(artifact_dir.join(names::artifact_file_name("doc", 1)), "a").unwrap();
    std::fs::write(artifact_dir.join(names::artifact_file_name("doc", 2)), "b").unwrap();

    assert_eq!(next_artifact_slot(&document).unwrap().index, 3);

    // The directory contents are the ground truth, not a counter.
    std::fs::remove_file(artifact_dir.join(names::artifact_file_name("doc", 1))).unwrap();
    assert_eq!(next_artifact_slot(&document).unwrap().index, 1);
}

#[test]
fn test_artifact_file_name_format() {
    assert_eq!(names::artifact_file_name("report", 1), "report_1.pdf");
    assert_eq!(names::artifact_file_name("report", 12), "report_12.pdf");
}
