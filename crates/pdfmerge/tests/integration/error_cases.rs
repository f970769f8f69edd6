//! Integration tests for error handling and edge cases.

use pdfmerge::merge::{MergeState, PageSpecErrorKind, SourceEntry};
use pdfmerge::{PdfMergeError, SourceFile};

use crate::common::{labelled_file, labels, merger, merger_with};

#[tokio::test]
async fn test_bad_spec_on_middle_entry_aborts_merge() {
    let mut merger = merger_with(vec![
        labelled_file("a", 2),
        labelled_file("b", 2),
        labelled_file("c", 2),
    ])
    .await;
    merger.set_page_spec(1, "1-9").unwrap();
    let before: Vec<SourceEntry> = merger.entries().to_vec();

    let err = merger.merge().await.unwrap_err();

    match err {
        PdfMergeError::InvalidPageSpec { index, source, .. } => {
            assert_eq!(index, 1);
            assert_eq!(source.kind, PageSpecErrorKind::OutOfRange { page: 9 });
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(merger.last_output().is_none());
    assert_eq!(merger.entries(), before.as_slice());
    assert_eq!(merger.state(), MergeState::Idle);
}

#[tokio::test]
async fn test_error_message_names_entry_and_token() {
    let mut merger = merger_with(vec![labelled_file("a", 2)]).await;
    merger.set_page_spec(0, "2-1").unwrap();

    let message = merger.merge().await.unwrap_err().to_string();
    assert!(message.contains("a.pdf"), "{message}");
    assert!(message.contains("2-1"), "{message}");
}

#[tokio::test]
async fn test_corrupt_file_is_skipped_at_intake() {
    let mut merger = merger();
    let report = merger
        .add_entries(vec![
            labelled_file("a", 1),
            SourceFile::new("corrupt.pdf", b"this is not a pdf".to_vec()),
            labelled_file("b", 1),
        ])
        .await
        .unwrap();

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].name, "corrupt.pdf");
    assert!(report.rejected[0].error.is_recoverable());

    let output = merger.merge().await.unwrap();
    assert_eq!(labels(&output.bytes), ["a0", "b0"]);
}

#[tokio::test]
async fn test_merge_without_entries() {
    let mut merger = merger();
    assert!(matches!(
        merger.merge().await,
        Err(PdfMergeError::NoFilesToMerge)
    ));
}

#[tokio::test]
async fn test_fixing_spec_allows_remerge() {
    let mut merger = merger_with(vec![labelled_file("a", 2)]).await;
    merger.set_page_spec(0, "1,,2").unwrap();
    assert!(merger.merge().await.is_err());

    merger.set_page_spec(0, "1,2").unwrap();
    let output = merger.merge().await.unwrap();
    assert_eq!(labels(&output.bytes), ["a0", "a1"]);
}

#[tokio::test]
async fn test_remove_last_entry_leaves_nothing_to_merge() {
    let mut merger = merger_with(vec![labelled_file("a", 1)]).await;
    merger.remove_entry(0).unwrap();

    assert!(merger.entries().is_empty());
    assert!(matches!(
        merger.merge().await,
        Err(PdfMergeError::NoFilesToMerge)
    ));
}
