//! Reading files from disk and writing merged output back.

use pdfmerge::io::OutputWriter;
use pdfmerge::{MergeConfig, Merger, PdfMergeError};
use tempfile::TempDir;

use crate::common::{labelled_pdf, labels, merger, write_file};

#[tokio::test]
async fn test_add_paths_then_save_merged_pdf() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_file(&dir, "first.pdf", &labelled_pdf("a", 2)),
        write_file(&dir, "second.PDF", &labelled_pdf("b", 1)),
    ];

    let mut merger = merger();
    let report = merger.add_paths(&paths).await.unwrap();
    assert!(report.is_complete());
    assert_eq!(merger.entries()[1].name(), "second.PDF");

    let output = merger.merge().await.unwrap();
    let out_dir = TempDir::new().unwrap();
    let written = OutputWriter::new().save(output, out_dir.path()).await.unwrap();

    assert_eq!(written, out_dir.path().join("merged.pdf"));
    let bytes = std::fs::read(&written).unwrap();
    assert_eq!(labels(&bytes), ["a0", "a1", "b0"]);
}

#[tokio::test]
async fn test_add_paths_reports_skipped_files() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_file(&dir, "a.pdf", &labelled_pdf("a", 1)),
        write_file(&dir, "notes.txt", b"not a pdf"),
        write_file(&dir, "broken.pdf", b"garbage"),
        dir.path().join("missing.pdf"),
    ];

    let mut merger = merger();
    let report = merger.add_paths(&paths).await.unwrap();

    assert_eq!(report.added, [0]);
    // Intake rejections in selection order, then files that failed to open.
    let rejected: Vec<&str> = report.rejected.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(rejected, ["notes.txt", "missing.pdf", "broken.pdf"]);
    assert_eq!(merger.entries().len(), 1);
}

#[tokio::test]
async fn test_add_paths_rejects_oversized_batch() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = (0..6)
        .map(|n| write_file(&dir, &format!("{n}.pdf"), &labelled_pdf("p", 1)))
        .collect();

    let mut merger = merger();
    let err = merger.add_paths(&paths).await.unwrap_err();

    assert!(matches!(err, PdfMergeError::TooManyFiles { count: 6, max: 5 }));
    assert!(merger.entries().is_empty());
}

#[tokio::test]
async fn test_custom_output_name() {
    let config = MergeConfig {
        output_stem: "combined".to_string(),
        ..Default::default()
    };
    let mut merger = Merger::new(config).unwrap();
    merger
        .add_entries(vec![pdfmerge::SourceFile::new("a.pdf", labelled_pdf("a", 1))])
        .await
        .unwrap();

    let output = merger.merge().await.unwrap();
    let dir = TempDir::new().unwrap();
    let written = OutputWriter::new().save(output, dir.path()).await.unwrap();
    assert_eq!(written.file_name().unwrap(), "combined.pdf");
}
