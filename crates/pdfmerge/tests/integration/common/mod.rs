//! Shared helpers for integration tests.
//!
//! Fixtures are generated in memory: every page of a generated document
//! carries a `Label` entry so tests can check which pages ended up where.

use std::path::PathBuf;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pdfmerge::{MergeConfig, Merger, SourceFile};
use tempfile::TempDir;

/// Build a PDF with `pages` pages labelled `"{label}0"`, `"{label}1"`, ...
pub fn labelled_pdf(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let page_ids: Vec<ObjectId> = (0..pages)
        .map(|n| {
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), format!("% {label}{n}").into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Label" => Object::string_literal(format!("{label}{n}")),
            })
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|&id| Object::Reference(id)).collect::<Vec<_>>(),
            "Count" => pages as i64,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A generated source file named `"{label}.pdf"`.
pub fn labelled_file(label: &str, pages: usize) -> SourceFile {
    SourceFile::new(format!("{label}.pdf"), labelled_pdf(label, pages))
}

/// Page labels of a merged document, in page order.
pub fn labels(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| {
            let page = doc.get_dictionary(id).unwrap();
            let label = page.get(b"Label").unwrap().as_str().unwrap();
            String::from_utf8_lossy(label).into_owned()
        })
        .collect()
}

/// A lopdf-backed session with the default configuration.
pub fn merger() -> Merger {
    Merger::new(MergeConfig::default()).unwrap()
}

/// A session pre-loaded with the given files.
pub async fn merger_with(files: Vec<SourceFile>) -> Merger {
    let mut merger = merger();
    let report = merger.add_entries(files).await.unwrap();
    assert!(report.is_complete(), "rejected: {:?}", report.rejected);
    merger
}

/// Write `contents` to `name` inside `dir`.
pub fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
