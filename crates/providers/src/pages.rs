//! Page-tree operations backed by lopdf: counting and prefix extraction.

use crate::RenderError;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

pub fn load(path: &Path) -> Result<Document, RenderError> {
    let doc = Document::load(path).map_err(|e| RenderError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if doc.trailer.get(b"Encrypt").is_ok() {
        return Err(RenderError::Encrypted(path.to_path_buf()));
    }
    Ok(doc)
}

pub fn count_pages(path: &Path) -> Result<usize, RenderError> {
    Ok(load(path)?.get_pages().len())
}

pub fn extract_pages(path: &Path, from: usize, to: usize) -> Result<Vec<u8>, RenderError> {
    let mut doc = load(path)?;
    let count = doc.get_pages().len();
    if from > to || to >= count {
        return Err(RenderError::InvalidRange { from, to, count });
    }

    // lopdf page numbers are 1-based.
    let dropped: Vec<u32> = (1..=count as u32)
        .filter(|n| {
            let idx = (*n - 1) as usize;
            idx < from || idx > to
        })
        .collect();
    if !dropped.is_empty() {
        doc.delete_pages(&dropped);
        let root = doc
            .catalog()
            .and_then(|c| c.get(b"Pages"))
            .and_then(Object::as_reference);
        if let Ok(root) = root {
            recount(&mut doc, root);
        }
        doc.prune_objects();
    }
    doc.renumber_objects();
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| RenderError::Render(format!("save trimmed document: {}", e)))?;
    Ok(out)
}

/// Rewrites `/Count` on every page-tree node below `node`; returns the leaf count.
fn recount(doc: &mut Document, node: ObjectId) -> i64 {
    let kids: Vec<ObjectId> = match doc
        .get_dictionary(node)
        .and_then(|d| d.get(b"Kids"))
        .and_then(Object::as_array)
    {
        Ok(kids) => kids.iter().filter_map(|k| k.as_reference().ok()).collect(),
        Err(_) => return 1,
    };
    let total = kids.into_iter().map(|kid| recount(doc, kid)).sum();
    if let Ok(dict) = doc.get_dictionary_mut(node) {
        dict.set("Count", total);
    }
    total
}
