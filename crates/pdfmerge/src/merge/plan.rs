//! Resolving entries into the flat sequence of pages to copy.

use crate::error::{PdfMergeError, Result};
use crate::merge::entries::SourceEntry;
use crate::merge::page_spec::resolve_pages;

/// One page of the output: which entry it comes from and which page of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    /// Position of the source entry in the merge order.
    pub entry: usize,
    /// Zero-based page index within that entry's document.
    pub page: usize,
}

/// The resolved pages of a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEntry {
    /// Position of the entry in the merge order.
    pub entry: usize,
    /// Zero-based page indices in output order.
    pub pages: Vec<usize>,
}

/// Every entry's page selection, resolved and in merge order.
///
/// Building a plan parses all page specifications without touching any
/// document, so it doubles as a dry run of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    entries: Vec<PlannedEntry>,
}

impl MergePlan {
    /// Resolve the page specification of every entry.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidPageSpec`] for the first entry whose
    /// specification does not parse against its own page count.
    pub fn build(entries: &[SourceEntry]) -> Result<Self> {
        let entries = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                resolve_pages(entry.page_spec(), entry.page_count())
                    .map(|pages| PlannedEntry {
                        entry: index,
                        pages,
                    })
                    .map_err(|source| PdfMergeError::InvalidPageSpec {
                        index,
                        name: entry.name().to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { entries })
    }

    /// Resolved entries in merge order.
    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    /// The output pages in order, as references into the entries.
    pub fn page_refs(&self) -> impl Iterator<Item = PageRef> + '_ {
        self.entries.iter().flat_map(|planned| {
            planned.pages.iter().map(move |&page| PageRef {
                entry: planned.entry,
                page,
            })
        })
    }

    /// Number of pages the output will contain.
    pub fn total_pages(&self) -> usize {
        self.entries.iter().map(|planned| planned.pages.len()).sum()
    }
}
