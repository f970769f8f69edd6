//! [`DocumentBackend`] implementation on top of `lopdf`.
//!
//! Pages are copied one by one into a fresh document: each source is
//! renumbered past the ids already used in the output, every requested page
//! dictionary is cloned with its inherited attributes made explicit, and the
//! objects it references are copied over once. A page requested twice ends
//! up as two page objects sharing the same resources. References to pages
//! that were not selected (link destinations, annotation owners) are
//! replaced by `null`, so unselected pages never reach the output.

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::backend::{BackendError, BackendResult, DocumentBackend};
use crate::config::{CompressionLevel, MergeConfig};
use crate::utils::{INHERITABLE_PAGE_KEYS, PageIdMap, copy_dictionary_references, inherited_attribute};

/// PDF version written to merged output.
const OUTPUT_PDF_VERSION: &str = "1.5";

/// A merged PDF under construction.
#[derive(Debug)]
pub struct ComposedDocument {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl ComposedDocument {
    fn new() -> Self {
        let mut document = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_id = document.new_object_id();

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Attach the page tree and catalog, returning the finished document.
    fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let count = kids.len() as i64;

        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        self.document
    }
}

/// Document backend using `lopdf`.
#[derive(Debug, Clone)]
pub struct LopdfBackend {
    /// Reject documents without pages when opening.
    verify: bool,

    /// Compression applied when saving.
    compression: CompressionLevel,
}

impl LopdfBackend {
    /// Create a backend with default settings.
    pub fn new() -> Self {
        Self {
            verify: true,
            compression: CompressionLevel::default(),
        }
    }

    /// Create a backend following a merge configuration.
    pub fn from_config(config: &MergeConfig) -> Self {
        Self {
            verify: config.verify_documents,
            compression: config.compression,
        }
    }

    /// Create a backend that accepts documents without pages.
    pub fn without_verification() -> Self {
        Self {
            verify: false,
            ..Self::new()
        }
    }

    /// Use the given compression level when saving.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }
}

impl Default for LopdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBackend for LopdfBackend {
    type Source = Document;
    type Target = ComposedDocument;

    fn open(&self, bytes: &[u8]) -> BackendResult<Document> {
        let doc = Document::load_mem(bytes)?;

        if doc.is_encrypted() {
            return Err(BackendError::new("document is encrypted"));
        }
        if self.verify && doc.get_pages().is_empty() {
            return Err(BackendError::new("document has no pages"));
        }

        Ok(doc)
    }

    fn page_count(&self, source: &Document) -> usize {
        source.get_pages().len()
    }

    fn create_target(&self) -> ComposedDocument {
        ComposedDocument::new()
    }

    fn copy_pages(
        &self,
        target: &mut ComposedDocument,
        mut source: Document,
        pages: &[usize],
    ) -> BackendResult<()> {
        if pages.is_empty() {
            return Ok(());
        }

        source.renumber_objects_with(target.document.max_id + 1);
        let source_max_id = source.objects.keys().map(|&(id, _)| id).max().unwrap_or(0);
        target.document.max_id = target.document.max_id.max(source_max_id);

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        let selected = pages
            .iter()
            .map(|&index| {
                page_ids.get(index).copied().ok_or_else(|| {
                    BackendError::new(format!(
                        "page {} does not exist (document has {} pages)",
                        index + 1,
                        page_ids.len()
                    ))
                })
            })
            .collect::<BackendResult<Vec<ObjectId>>>()?;

        // Output ids are allocated up front so links between selected pages
        // can be redirected. A repeated page links to its first copy.
        let output_ids: Vec<ObjectId> = selected
            .iter()
            .map(|_| target.document.new_object_id())
            .collect();
        let mut page_map = PageIdMap::new();
        for (&page_id, &output_id) in selected.iter().zip(&output_ids) {
            page_map.entry(page_id).or_insert(output_id);
        }

        for (&page_id, &output_id) in selected.iter().zip(&output_ids) {
            let mut page = source.get_dictionary(page_id)?.clone();
            for key in INHERITABLE_PAGE_KEYS {
                if !page.has(key)
                    && let Some(value) = inherited_attribute(&source, page_id, key)
                {
                    page.set(key.to_vec(), value);
                }
            }

            page.remove(b"Parent");
            let mut page =
                copy_dictionary_references(&mut target.document, &source, &page, &page_map);
            page.set("Parent", target.pages_id);

            target
                .document
                .objects
                .insert(output_id, Object::Dictionary(page));
            target.kids.push(output_id);
        }

        Ok(())
    }

    fn target_page_count(&self, target: &ComposedDocument) -> usize {
        target.page_count()
    }

    fn save(&self, target: ComposedDocument) -> BackendResult<Vec<u8>> {
        let mut document = target.finish();

        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => {
                document.renumber_objects();
                document.compress();
            }
            CompressionLevel::Maximum => {
                document.prune_objects();
                document.renumber_objects();
                document.compress();
            }
        }

        let mut bytes = Vec::new();
        document.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
