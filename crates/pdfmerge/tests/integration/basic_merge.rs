//! End-to-end merges over generated documents.

use pdfmerge::{CompressionLevel, MergeConfig, Merger, Reorderable};
use rstest::rstest;

use crate::common::{labelled_file, labels, merger_with};

#[tokio::test]
async fn test_merge_page_range_and_full_document() {
    let mut merger = merger_with(vec![labelled_file("a", 3), labelled_file("b", 2)]).await;
    merger.set_page_spec(0, "1-2").unwrap();

    let output = merger.merge().await.unwrap();

    assert_eq!(labels(&output.bytes), ["a0", "a1", "b0", "b1"]);
    assert_eq!(output.statistics.total_pages, 4);
    assert_eq!(output.file_name, "merged.pdf");
}

#[rstest]
#[case("", &["a0", "a1", "a2", "a3"])]
#[case("4", &["a3"])]
#[case("4,1", &["a3", "a0"])]
#[case("2-3,2", &["a1", "a2", "a1"])]
#[case(" 1 , 3-4 ", &["a0", "a2", "a3"])]
#[tokio::test]
async fn test_page_spec_selects_pages(#[case] spec: &str, #[case] expected: &[&str]) {
    let mut merger = merger_with(vec![labelled_file("a", 4)]).await;
    merger.set_page_spec(0, spec).unwrap();

    let output = merger.merge().await.unwrap();
    assert_eq!(labels(&output.bytes), expected);
}

#[tokio::test]
async fn test_same_document_added_twice() {
    let mut merger = merger_with(vec![labelled_file("a", 2), labelled_file("a", 2)]).await;
    merger.set_page_spec(1, "2").unwrap();

    let output = merger.merge().await.unwrap();
    assert_eq!(labels(&output.bytes), ["a0", "a1", "a1"]);
}

#[tokio::test]
async fn test_reordered_entries_merge_in_new_order() {
    let mut merger = merger_with(vec![
        labelled_file("a", 1),
        labelled_file("b", 1),
        labelled_file("c", 1),
    ])
    .await;
    merger.move_entry(2, 0).unwrap();
    merger.move_down(1).unwrap();

    let output = merger.merge().await.unwrap();
    assert_eq!(labels(&output.bytes), ["c0", "b0", "a0"]);
}

#[tokio::test]
async fn test_remerge_replaces_output() {
    let mut merger = merger_with(vec![labelled_file("a", 3)]).await;
    merger.merge().await.unwrap();

    merger.set_page_spec(0, "3").unwrap();
    merger.merge().await.unwrap();

    let output = merger.last_output().unwrap();
    assert_eq!(labels(&output.bytes), ["a2"]);
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Standard)]
#[case(CompressionLevel::Maximum)]
#[tokio::test]
async fn test_merge_with_compression_level(#[case] compression: CompressionLevel) {
    let config = MergeConfig {
        compression,
        ..Default::default()
    };
    let mut merger = Merger::new(config).unwrap();
    merger
        .add_entries(vec![labelled_file("a", 2), labelled_file("b", 1)])
        .await
        .unwrap();

    let output = merger.merge().await.unwrap();
    assert_eq!(labels(&output.bytes), ["a0", "a1", "b0"]);
}

#[tokio::test]
async fn test_statistics_describe_output() {
    let mut merger = merger_with(vec![labelled_file("a", 2), labelled_file("b", 3)]).await;
    let output = merger.merge().await.unwrap();

    assert_eq!(output.statistics.entries_merged, 2);
    assert_eq!(output.statistics.total_pages, 5);
    assert_eq!(output.statistics.output_size, output.bytes.len() as u64);
}
