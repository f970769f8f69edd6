//! pdfmerge - Select, reorder and concatenate PDF pages into one document.
//!
//! A merge session holds an ordered list of source documents. Each entry
//! carries a page specification such as `"1-3,5"` picking the pages it
//! contributes; a blank specification means every page. Merging copies the
//! selected pages of every entry, in list order, into a new document.
//!
//! - Entries can be added, removed and reordered between merges
//! - Page specifications may reorder and repeat pages
//! - A merge either produces complete output or fails without any
//! - A running merge freezes the entry list
//!
//! # Examples
//!
//! ## Merging files from disk
//!
//! ```no_run
//! use pdfmerge::{MergeConfig, Merger};
//! use pdfmerge::io::OutputWriter;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut merger = Merger::new(MergeConfig::default())?;
//!
//! let report = merger
//!     .add_paths(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
//!     .await?;
//! for rejected in &report.rejected {
//!     eprintln!("skipped {}: {}", rejected.name, rejected.error);
//! }
//!
//! merger.set_page_spec(0, "1-2")?;
//! let output = merger.merge().await?;
//! println!("Created {} page document", output.statistics.total_pages);
//!
//! OutputWriter::new().save(output, Path::new(".")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Parsing page specifications
//!
//! ```
//! use pdfmerge::merge::parse_page_spec;
//!
//! assert_eq!(parse_page_spec("3,1-2", 4).unwrap(), vec![2, 0, 1]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod utils;

// Re-export commonly used types
pub use backend::{DocumentBackend, LopdfBackend};
pub use config::{CompressionLevel, MergeConfig};
pub use error::{PdfMergeError, Result};
pub use merge::{MergeOutput, Merger, Reorderable, SourceFile};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
