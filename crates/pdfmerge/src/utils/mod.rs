//! Object-graph helpers for copying pages between lopdf documents, and
//! size formatting.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITABLE_PAGE_KEYS: [&[u8]; 4] =
    [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Upper bound on page tree depth when walking `Parent` links.
const MAX_TREE_DEPTH: usize = 64;

/// Where the selected pages of one source document land in the output,
/// keyed by their source object id.
pub type PageIdMap = BTreeMap<ObjectId, ObjectId>;

/// Copy every object `obj` references from `source` into `target` and
/// return `obj` rewritten for `target`.
///
/// Objects keep their ids, so `source` must already be renumbered past the
/// ids used in `target`. An object present in `target` is not copied again,
/// which lets pages of the same source share resources.
///
/// References into the source page tree are never followed. A reference to
/// a page in `pages` is redirected to its output id; any other page tree
/// reference (unselected pages, `Pages` nodes) and any dangling reference
/// becomes `null`.
pub fn copy_references(
    target: &mut Document,
    source: &Document,
    obj: &Object,
    pages: &PageIdMap,
) -> Object {
    match obj {
        Object::Reference(ref_id) => copy_referenced_object(target, source, *ref_id, pages),
        Object::Dictionary(dict) => {
            Object::Dictionary(copy_dictionary_references(target, source, dict, pages))
        }
        Object::Array(arr) => Object::Array(
            arr.iter()
                .map(|item| copy_references(target, source, item, pages))
                .collect(),
        ),
        Object::Stream(stream) => {
            let mut copied = stream.clone();
            copied.dict = copy_dictionary_references(target, source, &stream.dict, pages);
            Object::Stream(copied)
        }
        other => other.clone(),
    }
}

/// Rewrite the values of `dict` for `target`; see [`copy_references`].
pub fn copy_dictionary_references(
    target: &mut Document,
    source: &Document,
    dict: &Dictionary,
    pages: &PageIdMap,
) -> Dictionary {
    let mut copied = Dictionary::new();
    for (key, value) in dict.iter() {
        copied.set(key.clone(), copy_references(target, source, value, pages));
    }
    copied
}

fn copy_referenced_object(
    target: &mut Document,
    source: &Document,
    ref_id: ObjectId,
    pages: &PageIdMap,
) -> Object {
    if let Some(&new_id) = pages.get(&ref_id) {
        return Object::Reference(new_id);
    }
    if target.objects.contains_key(&ref_id) {
        return Object::Reference(ref_id);
    }

    let Ok(referenced) = source.get_object(ref_id) else {
        return Object::Null;
    };
    if is_page_tree_node(referenced) {
        return Object::Null;
    }

    // Reserve the id first so reference cycles terminate.
    target.objects.insert(ref_id, Object::Null);
    let copied = copy_references(target, source, referenced, pages);
    target.objects.insert(ref_id, copied);
    Object::Reference(ref_id)
}

/// Whether `obj` is a `Page` or `Pages` dictionary.
pub fn is_page_tree_node(obj: &Object) -> bool {
    obj.as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .is_ok_and(|name| name == b"Page" || name == b"Pages")
}

/// Look up an attribute a page inherits from its ancestors.
///
/// Returns the value of the nearest ancestor defining `key`, or `None` if
/// no ancestor does.
pub fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        let parent = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = parent.get(key) {
            return Some(value.clone());
        }
        node = parent;
    }

    None
}

/// Format a size in bytes as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
