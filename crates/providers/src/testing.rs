//! Fixtures shared by the workspace's tests.

use crate::{pages, Rasterizer, RenderError, RenderSpec};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Builds an in-memory PDF with `page_count` empty A4 pages.
pub fn blank_pdf(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for _ in 0..page_count {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("serialize blank pdf");
    out
}

pub fn write_blank_pdf(path: &Path, page_count: usize) {
    std::fs::write(path, blank_pdf(page_count)).expect("write blank pdf");
}

/// Deterministic stand-in for a real renderer: the "image" is a blake3 digest
/// of the file bytes and the render parameters. Every call is recorded.
#[derive(Debug, Default)]
pub struct HashRasterizer {
    calls: Mutex<Vec<(PathBuf, usize, RenderSpec)>>,
}

impl HashRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_calls(&self) -> Vec<(PathBuf, usize, RenderSpec)> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn render_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Rasterizer for HashRasterizer {
    fn render_page(&self, path: &Path, page: usize, spec: &RenderSpec) -> Result<Vec<u8>, RenderError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((path.to_path_buf(), page, *spec));
        let count = pages::count_pages(path)?;
        if page >= count {
            return Err(RenderError::PageOutOfRange { page, count });
        }
        let bytes = std::fs::read(path).map_err(|e| RenderError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&bytes);
        hasher.update(&(page as u64).to_le_bytes());
        hasher.update(&spec.width.to_le_bytes());
        hasher.update(&[spec.quality, spec.color as u8]);
        Ok(hasher.finalize().as_bytes().to_vec())
    }

    fn count_pages(&self, path: &Path) -> Result<usize, RenderError> {
        pages::count_pages(path)
    }

    fn extract_pages(&self, source: &Path, from: usize, to: usize) -> Result<Vec<u8>, RenderError> {
        pages::extract_pages(source, from, to)
    }
}
