//! Page specification parsing.
//!
//! A page specification is what a user types next to each document to pick
//! its pages: a comma-separated list of 1-based page numbers (`"3"`) and
//! inclusive ranges (`"2-5"`). Tokens are taken in the order written, so
//! `"3,1,2"` reorders pages and `"1,1"` repeats one.
//!
//! ```
//! use pdfmerge::merge::page_spec::{parse_page_spec, resolve_pages};
//!
//! assert_eq!(parse_page_spec("1-3,5", 5).unwrap(), vec![0, 1, 2, 4]);
//! assert_eq!(resolve_pages("", 3).unwrap(), vec![0, 1, 2]);
//! assert!(parse_page_spec("4-2", 5).is_err());
//! ```

use std::fmt;

/// Why a page token was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSpecErrorKind {
    /// The token is blank (e.g. `"1,,2"` or a trailing comma).
    EmptyToken,
    /// The token is not a page number or a `start-end` range.
    InvalidNumber,
    /// The range runs backwards.
    ReversedRange {
        /// First page of the range, 1-based.
        start: usize,
        /// Last page of the range, 1-based.
        end: usize,
    },
    /// The page does not exist in the document.
    OutOfRange {
        /// Requested page, 1-based.
        page: usize,
    },
}

/// A page token that could not be resolved against a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct PageSpecError {
    /// The offending token as typed (trimmed).
    pub token: String,
    /// Number of pages in the document the spec was resolved against.
    pub total_pages: usize,
    /// What was wrong with the token.
    pub kind: PageSpecErrorKind,
}

impl PageSpecError {
    fn new(token: &str, total_pages: usize, kind: PageSpecErrorKind) -> Self {
        Self {
            token: token.to_string(),
            total_pages,
            kind,
        }
    }
}

impl fmt::Display for PageSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            PageSpecErrorKind::EmptyToken => write!(f, "empty page token")?,
            PageSpecErrorKind::InvalidNumber => write!(
                f,
                "invalid page token '{}': expected a page number or a range like 1-3",
                self.token
            )?,
            PageSpecErrorKind::ReversedRange { start, end } => write!(
                f,
                "invalid page token '{}': range {start}-{end} runs backwards",
                self.token
            )?,
            PageSpecErrorKind::OutOfRange { page } => write!(
                f,
                "invalid page token '{}': page {page} does not exist",
                self.token
            )?,
        }

        if self.total_pages == 0 {
            write!(f, " (document has no pages)")
        } else {
            write!(f, " (valid pages are 1-{})", self.total_pages)
        }
    }
}

/// Parse a page specification into zero-based page indices.
///
/// Blank specifications are rejected here; use [`resolve_pages`] to treat a
/// blank spec as "every page".
///
/// # Errors
///
/// Returns a [`PageSpecError`] naming the first token that is empty, not a
/// number or range, a reversed range, or outside `1..=total_pages`.
pub fn parse_page_spec(spec: &str, total_pages: usize) -> Result<Vec<usize>, PageSpecError> {
    let mut pages = Vec::new();

    for raw in spec.split(',') {
        let token = raw.trim();
        let err = |kind| PageSpecError::new(token, total_pages, kind);

        if token.is_empty() {
            return Err(err(PageSpecErrorKind::EmptyToken));
        }

        if let Some((start, end)) = token.split_once('-') {
            let start =
                parse_page_number(start).ok_or_else(|| err(PageSpecErrorKind::InvalidNumber))?;
            let end =
                parse_page_number(end).ok_or_else(|| err(PageSpecErrorKind::InvalidNumber))?;

            if start > end {
                return Err(err(PageSpecErrorKind::ReversedRange { start, end }));
            }
            // Checking both ends covers every page in between.
            for page in [start, end] {
                check_in_range(page, total_pages)
                    .ok_or_else(|| err(PageSpecErrorKind::OutOfRange { page }))?;
            }

            pages.extend(start - 1..end);
        } else {
            let page =
                parse_page_number(token).ok_or_else(|| err(PageSpecErrorKind::InvalidNumber))?;
            let index = check_in_range(page, total_pages)
                .ok_or_else(|| err(PageSpecErrorKind::OutOfRange { page }))?;

            pages.push(index);
        }
    }

    Ok(pages)
}

/// Resolve an entry's raw page specification.
///
/// A blank specification selects every page in document order.
///
/// # Errors
///
/// Propagates [`parse_page_spec`] errors for non-blank specifications.
pub fn resolve_pages(spec: &str, total_pages: usize) -> Result<Vec<usize>, PageSpecError> {
    if spec.trim().is_empty() {
        return Ok((0..total_pages).collect());
    }
    parse_page_spec(spec, total_pages)
}

/// Parse a 1-based page number, accepting only plain digits.
fn parse_page_number(s: &str) -> Option<usize> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Convert a 1-based page number into an index, if the page exists.
fn check_in_range(page: usize, total_pages: usize) -> Option<usize> {
    (1..=total_pages).contains(&page).then(|| page - 1)
}
