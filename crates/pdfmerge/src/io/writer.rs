//! Delivering merged output to disk.
//!
//! The output is written under its configured file name (`merged.pdf` by
//! default) inside a target directory. Writes go to a temporary file that
//! is renamed into place, so a failed write never leaves a truncated
//! `merged.pdf` behind.

use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::info;

use crate::error::{PdfMergeError, Result};
use crate::merge::MergeOutput;

/// Options for writing output files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Writes merged output into a directory.
#[derive(Debug, Clone, Default)]
pub struct OutputWriter {
    options: WriteOptions,
}

impl OutputWriter {
    /// Create a writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Write `output` into `dir` under its file name, replacing any
    /// existing file, and return the written path.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::FailedToWrite`] if the file cannot be
    /// created, written or moved into place.
    pub async fn save(&self, output: &MergeOutput, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&output.file_name);
        let bytes = output.bytes.clone();
        let options = self.options.clone();

        let written = task::spawn_blocking(move || write_file(&bytes, path, &options))
            .await
            .map_err(|e| PdfMergeError::Io(std::io::Error::other(e)))??;

        info!(path = %written.display(), size = output.bytes.len(), "wrote merged output");
        Ok(written)
    }
}

fn write_file(bytes: &[u8], path: PathBuf, options: &WriteOptions) -> Result<PathBuf> {
    let write_path = if options.atomic {
        path.with_extension("tmp")
    } else {
        path.clone()
    };

    let failed = |source| PdfMergeError::FailedToWrite {
        path: write_path.clone(),
        source,
    };

    let file = std::fs::File::create(&write_path).map_err(failed)?;
    let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);
    writer.write_all(bytes).map_err(failed)?;
    writer.flush().map_err(failed)?;
    drop(writer);

    if options.atomic {
        std::fs::rename(&write_path, &path).map_err(|source| {
            let _ = std::fs::remove_file(&write_path);
            PdfMergeError::FailedToWrite {
                path: path.clone(),
                source,
            }
        })?;
    }

    Ok(path)
}
