//! Error types for pdfmerge.
//!
//! Errors fall into two groups:
//!
//! - **Per-file errors** raised while taking files in (unreadable file,
//!   unsupported extension, document the backend cannot open). These never
//!   abort a batch; the file is skipped and reported.
//! - **Merge errors** raised while composing the output (bad page
//!   specification, backend failure during extraction or serialization).
//!   These abort the whole merge and no partial output is produced.

use std::io;
use std::path::PathBuf;

use crate::merge::page_spec::PageSpecError;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, PdfMergeError>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfMergeError {
    /// The document backend could not open a file as a document.
    #[error("Failed to open document: {name}\n  Reason: {reason}")]
    FailedToOpen {
        /// Display name of the rejected file.
        name: String,
        /// Reason reported by the backend.
        reason: String,
    },

    /// The file does not carry the accepted extension.
    #[error("Unsupported file type: {name}\n  Only .{expected} files are accepted")]
    UnsupportedFileType {
        /// Display name of the rejected file.
        name: String,
        /// Extension the intake accepts.
        expected: String,
    },

    /// Reading a selected file from disk failed.
    #[error("Failed to read file: {}\n  Reason: {source}", path.display())]
    FailedToReadFile {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// More files were selected at once than the intake accepts.
    #[error("Too many files selected: {count}\n  At most {max} file(s) can be added at once")]
    TooManyFiles {
        /// Number of files in the rejected batch.
        count: usize,
        /// Configured batch limit.
        max: usize,
    },

    /// An entry's page specification could not be resolved.
    #[error("Invalid page selection for entry {} ({name}): {source}", index + 1)]
    InvalidPageSpec {
        /// Zero-based position of the entry in the merge order.
        index: usize,
        /// Display name of the entry.
        name: String,
        /// Parser error naming the offending token.
        source: PageSpecError,
    },

    /// The backend failed while extracting pages or serializing output.
    #[error("Merge failed while processing {context}\n  Reason: {reason}")]
    MergeIo {
        /// What was being processed (an entry or the output).
        context: String,
        /// Reason reported by the backend.
        reason: String,
    },

    /// An entry position is outside the current list.
    #[error("Entry index {index} is out of range for a list of {len} entries")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Current number of entries.
        len: usize,
    },

    /// A merge is running and the entry list is frozen.
    #[error("A merge is already in progress; entries cannot change until it finishes")]
    MergeInProgress,

    /// Merge was requested on an empty entry list.
    #[error("No documents to merge")]
    NoFilesToMerge,

    /// The merge was cancelled before it completed.
    #[error("Merge cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Failed to write the merged output.
    #[error("Failed to write output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PdfMergeError {
    /// Create a FailedToOpen error.
    pub fn failed_to_open(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToOpen {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a MergeIo error for a failure while copying an entry's pages.
    pub fn entry_io(index: usize, name: &str, reason: impl Into<String>) -> Self {
        Self::MergeIo {
            context: format!("entry {} ({name})", index + 1),
            reason: reason.into(),
        }
    }

    /// Create a MergeIo error for a failure while serializing the output.
    pub fn output_io(reason: impl Into<String>) -> Self {
        Self::MergeIo {
            context: "merged output".to_string(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Check if this error only affects a single file of a batch.
    ///
    /// Recoverable errors are reported per file and never stop the rest of
    /// the batch from being added.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FailedToOpen { .. }
                | Self::UnsupportedFileType { .. }
                | Self::FailedToReadFile { .. }
        )
    }
}
