//! The ordered list of documents taking part in a merge.
//!
//! Entries have no identity beyond their position. Every operation keeps the
//! list contiguous and leaves untouched entries in their relative order.

use std::fmt;
use std::sync::Arc;

use crate::error::{PdfMergeError, Result};

/// A file handed over by the intake layer: a display name and its raw bytes.
#[derive(Clone)]
pub struct SourceFile {
    /// Display name, usually the file name.
    pub name: String,

    /// Raw document bytes, shared with every entry created from them.
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    /// Create a source file from a name and its bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// One accepted document plus its page selection.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceEntry {
    name: String,
    bytes: Arc<[u8]>,
    page_count: usize,
    page_spec: String,
}

impl SourceEntry {
    /// Create an entry selecting all pages.
    pub fn new(file: SourceFile, page_count: usize) -> Self {
        Self {
            name: file.name,
            bytes: file.bytes,
            page_count,
            page_spec: String::new(),
        }
    }

    /// Display name of the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw document bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of pages reported when the document was opened.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The page specification as typed; empty means every page.
    pub fn page_spec(&self) -> &str {
        &self.page_spec
    }
}

impl fmt::Debug for SourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceEntry")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .field("page_count", &self.page_count)
            .field("page_spec", &self.page_spec)
            .finish()
    }
}

/// Position-based reordering of a list.
///
/// Presentation layers drive drag-and-drop or up/down buttons through this
/// trait; the ordering rules live with the list.
pub trait Reorderable {
    /// Move the item at `from` so it ends up at `to`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::IndexOutOfRange`] if either position is
    /// outside the list. The list is unchanged on error.
    fn move_entry(&mut self, from: usize, to: usize) -> Result<()>;

    /// Swap the item at `index` with the one before it.
    fn move_up(&mut self, index: usize) -> Result<()> {
        let to = index.checked_sub(1).ok_or(PdfMergeError::IndexOutOfRange {
            index,
            len: self.len(),
        })?;
        self.move_entry(index, to)
    }

    /// Swap the item at `index` with the one after it.
    fn move_down(&mut self, index: usize) -> Result<()> {
        self.move_entry(index, index.saturating_add(1))
    }

    /// Number of items in the list.
    fn len(&self) -> usize;

    /// Whether the list is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered, gap-free sequence of [`SourceEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<SourceEntry>,
}

impl EntryList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry at the tail and return its position.
    pub fn push(&mut self, entry: SourceEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Remove and return the entry at `index`; later entries shift down.
    pub fn remove(&mut self, index: usize) -> Result<SourceEntry> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Replace the page specification of the entry at `index`.
    ///
    /// The specification is stored as typed and only parsed at merge time.
    pub fn set_page_spec(&mut self, index: usize, spec: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.entries[index].page_spec = spec.into();
        Ok(())
    }

    /// Entry at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&SourceEntry> {
        self.entries.get(index)
    }

    /// All entries in merge order.
    pub fn as_slice(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Iterate entries in merge order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(PdfMergeError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl Reorderable for EntryList {
    fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_index(from)?;
        self.check_index(to)?;

        if from != to {
            let entry = self.entries.remove(from);
            self.entries.insert(to, entry);
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a SourceEntry;
    type IntoIter = std::slice::Iter<'a, SourceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
