//! Configuration for a merge session.
//!
//! [`MergeConfig`] collects the knobs of the intake and output stages. It
//! derives serde traits so a host application can embed it in its own
//! settings; every field has a default.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{PdfMergeError, Result};

/// Default maximum number of files accepted per intake batch.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 5;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - preserves exact quality and structure.
    None,
    /// Compress content streams.
    #[default]
    Standard,
    /// Compress and drop objects nothing references any more.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = PdfMergeError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfMergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Settings for intake, composition and output delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Maximum number of files accepted in a single intake batch.
    pub max_batch_size: usize,

    /// File extension accepted by intake, without the leading dot.
    pub accepted_extension: String,

    /// File name of the merged output, without extension.
    pub output_stem: String,

    /// Compression applied to the merged output.
    pub compression: CompressionLevel,

    /// Reject documents that open but contain no pages.
    pub verify_documents: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            accepted_extension: "pdf".to_string(),
            output_stem: "merged".to_string(),
            compression: CompressionLevel::default(),
            verify_documents: true,
        }
    }
}

impl MergeConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidConfig`] if:
    /// - the batch size is zero
    /// - the accepted extension is empty or starts with a dot
    /// - the output stem is empty or contains a path separator
    pub fn validate(&self) -> Result<()> {
        if self.max_batch_size == 0 {
            return Err(PdfMergeError::invalid_config(
                "Maximum batch size must be at least 1",
            ));
        }

        let extension = self.accepted_extension.trim();
        if extension.is_empty() || extension.starts_with('.') {
            return Err(PdfMergeError::invalid_config(format!(
                "Accepted extension must be a bare extension like 'pdf', got '{}'",
                self.accepted_extension
            )));
        }

        let stem = self.output_stem.trim();
        if stem.is_empty() || stem.contains(['/', '\\']) || stem == "." || stem == ".." {
            return Err(PdfMergeError::invalid_config(format!(
                "Output name must be a plain file name, got '{}'",
                self.output_stem
            )));
        }

        Ok(())
    }

    /// File name the merged output is delivered under, e.g. `merged.pdf`.
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", self.output_stem.trim(), self.accepted_extension.trim())
    }
}
