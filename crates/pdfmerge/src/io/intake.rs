//! File intake: turning user-selected paths into [`SourceFile`]s.
//!
//! Intake enforces the batch limit and the extension filter before reading
//! anything, then reads the accepted files concurrently. Results keep the
//! order the files were selected in.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::config::MergeConfig;
//! use pdfmerge::io::FileIntake;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MergeConfig::default();
//! let intake = FileIntake::new(&config);
//! let batch = intake
//!     .read_paths(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
//!     .await?;
//! println!("{} accepted, {} rejected", batch.accepted.len(), batch.rejected.len());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::MergeConfig;
use crate::error::{PdfMergeError, Result};
use crate::merge::entries::SourceFile;

/// A file that was not taken in, with the reason.
#[derive(Debug)]
pub struct RejectedFile {
    /// Display name of the file.
    pub name: String,

    /// Why it was rejected.
    pub error: PdfMergeError,
}

/// Files read by one intake call.
#[derive(Debug, Default)]
pub struct IntakeBatch {
    /// Files ready to be added, in selection order.
    pub accepted: Vec<SourceFile>,

    /// Files skipped, in selection order.
    pub rejected: Vec<RejectedFile>,
}

/// Reads user-selected files subject to the batch limit and extension filter.
#[derive(Debug, Clone)]
pub struct FileIntake {
    max_batch_size: usize,
    accepted_extension: String,
}

impl FileIntake {
    /// Create an intake following the configuration.
    pub fn new(config: &MergeConfig) -> Self {
        Self {
            max_batch_size: config.max_batch_size,
            accepted_extension: config.accepted_extension.trim().to_lowercase(),
        }
    }

    /// Whether `name` carries the accepted extension (case-insensitive).
    pub fn accepts(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.accepted_extension))
    }

    fn check_batch_size(&self, count: usize) -> Result<()> {
        if count > self.max_batch_size {
            return Err(PdfMergeError::TooManyFiles {
                count,
                max: self.max_batch_size,
            });
        }
        Ok(())
    }

    fn unsupported(&self, name: String) -> RejectedFile {
        let error = PdfMergeError::UnsupportedFileType {
            name: name.clone(),
            expected: self.accepted_extension.clone(),
        };
        RejectedFile { name, error }
    }

    /// Filter files whose bytes were already supplied by the host.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::TooManyFiles`] if the batch exceeds the
    /// limit; no file of such a batch is accepted.
    pub fn filter_files(&self, files: Vec<SourceFile>) -> Result<IntakeBatch> {
        self.check_batch_size(files.len())?;

        let mut batch = IntakeBatch::default();
        for file in files {
            if self.accepts(&file.name) {
                batch.accepted.push(file);
            } else {
                warn!(name = %file.name, "unsupported file type");
                batch.rejected.push(self.unsupported(file.name));
            }
        }
        Ok(batch)
    }

    /// Read the selected files from disk.
    ///
    /// Files with the wrong extension are rejected without being read;
    /// unreadable files are rejected individually. Neither stops the batch.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::TooManyFiles`] if the batch exceeds the
    /// limit; nothing is read in that case.
    pub async fn read_paths(&self, paths: &[PathBuf]) -> Result<IntakeBatch> {
        self.check_batch_size(paths.len())?;

        let reads = paths.iter().map(|path| async move {
            let name = display_name(path);
            if !self.accepts(&name) {
                warn!(path = %path.display(), "unsupported file type");
                return Err(self.unsupported(name));
            }

            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    debug!(path = %path.display(), size = bytes.len(), "read file");
                    Ok(SourceFile::new(name, bytes))
                }
                Err(source) => {
                    warn!(path = %path.display(), error = %source, "failed to read file");
                    Err(RejectedFile {
                        name,
                        error: PdfMergeError::FailedToReadFile {
                            path: path.clone(),
                            source,
                        },
                    })
                }
            }
        });

        let mut batch = IntakeBatch::default();
        for read in join_all(reads).await {
            match read {
                Ok(file) => batch.accepted.push(file),
                Err(rejected) => batch.rejected.push(rejected),
            }
        }

        Ok(batch)
    }
}

/// File name of `path`, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
