use crate::{pages, Rasterizer, RenderError, RenderSpec};
use std::path::Path;

/// Structure-only backend: page counts and extraction work, pixel rendering does not.
#[derive(Debug, Default)]
pub struct NoopRasterizer;

impl Rasterizer for NoopRasterizer {
    fn render_page(
        &self,
        _path: &Path,
        _page: usize,
        _spec: &RenderSpec,
    ) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Unsupported("built without the `mupdf` feature"))
    }

    fn count_pages(&self, path: &Path) -> Result<usize, RenderError> {
        pages::count_pages(path)
    }

    fn extract_pages(&self, source: &Path, from: usize, to: usize) -> Result<Vec<u8>, RenderError> {
        pages::extract_pages(source, from, to)
    }
}
