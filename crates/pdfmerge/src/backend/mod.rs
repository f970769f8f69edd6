//! The document library behind a merge.
//!
//! The orchestrator never manipulates PDF structures itself. It drives a
//! [`DocumentBackend`], which opens documents from raw bytes, copies pages
//! into a document under construction and serializes the result. The
//! default backend, [`LopdfBackend`], is built on `lopdf`.

pub mod lopdf_backend;

pub use lopdf_backend::{ComposedDocument, LopdfBackend};

/// Failure reported by a document backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Create a backend error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Result type alias for backend operations.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Load, copy-pages and serialize primitives of a document library.
///
/// Implementations are used from blocking worker threads, hence the `Send +
/// Sync + 'static` bound. Source and target handles never leave the thread
/// that created them.
pub trait DocumentBackend: Send + Sync + 'static {
    /// An opened source document.
    type Source;

    /// A document under construction.
    type Target;

    /// Open a document from its raw bytes.
    ///
    /// # Errors
    ///
    /// Fails if the bytes are not a document the backend can work with.
    fn open(&self, bytes: &[u8]) -> BackendResult<Self::Source>;

    /// Number of pages in an opened document.
    fn page_count(&self, source: &Self::Source) -> usize;

    /// Start an empty output document.
    fn create_target(&self) -> Self::Target;

    /// Append the pages at `pages` (zero-based, in this order, repeats
    /// allowed) of `source` to `target`.
    ///
    /// # Errors
    ///
    /// Fails if a page index does not exist or the source is damaged. The
    /// target must then be discarded.
    fn copy_pages(
        &self,
        target: &mut Self::Target,
        source: Self::Source,
        pages: &[usize],
    ) -> BackendResult<()>;

    /// Number of pages appended to `target` so far.
    fn target_page_count(&self, target: &Self::Target) -> usize;

    /// Finish `target` and serialize it.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be written.
    fn save(&self, target: Self::Target) -> BackendResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_from_io_error() {
        let err: BackendError = std::io::Error::other("disk full").into();
        assert_eq!(err.message(), "disk full");
    }

    #[test]
    fn test_backend_error_from_lopdf_error() {
        let err: BackendError = lopdf::Document::load_mem(b"not a pdf").unwrap_err().into();
        assert!(!err.message().is_empty());
    }
}
