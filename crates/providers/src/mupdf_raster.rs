//! MuPDF-backed rasterizer. Page structure operations still go through lopdf.

use crate::{pages, ColorMode, Rasterizer, RenderError, RenderSpec};
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use mupdf::{Colorspace, Document, Matrix, Pixmap};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default)]
pub struct MupdfRasterizer;

impl MupdfRasterizer {
    pub fn new() -> Self {
        Self
    }
}

fn open(path: &Path) -> Result<Document, RenderError> {
    let open_err = |e: mupdf::Error| RenderError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let doc = Document::open(path.to_string_lossy().as_ref()).map_err(open_err)?;
    if doc.needs_password().map_err(open_err)? {
        return Err(RenderError::Encrypted(path.to_path_buf()));
    }
    Ok(doc)
}

impl Rasterizer for MupdfRasterizer {
    fn render_page(
        &self,
        path: &Path,
        page_num: usize,
        spec: &RenderSpec,
    ) -> Result<Vec<u8>, RenderError> {
        let doc = open(path)?;
        let count = doc
            .page_count()
            .map_err(|e| RenderError::Render(e.to_string()))? as usize;
        if page_num >= count {
            return Err(RenderError::PageOutOfRange {
                page: page_num,
                count,
            });
        }

        let page = doc
            .load_page(page_num as i32)
            .map_err(|e| RenderError::Render(e.to_string()))?;
        let bounds = page
            .bounds()
            .map_err(|e| RenderError::Render(e.to_string()))?;
        let page_width = bounds.x1 - bounds.x0;
        if page_width <= 0.0 {
            return Err(RenderError::Render(format!(
                "page {} has zero width",
                page_num
            )));
        }

        let scale = spec.width as f32 / page_width;
        let transform = Matrix::new_scale(scale, scale);
        let colorspace = match spec.color {
            ColorMode::Gray => Colorspace::device_gray(),
            ColorMode::Rgb => Colorspace::device_rgb(),
        };
        let pixmap = page
            .to_pixmap(&transform, &colorspace, false, false)
            .map_err(|e| RenderError::Render(e.to_string()))?;
        debug!(
            path = %path.display(),
            page = page_num,
            width = pixmap.width(),
            height = pixmap.height(),
            "rendered page"
        );
        encode_jpeg(&pixmap, spec)
    }

    fn count_pages(&self, path: &Path) -> Result<usize, RenderError> {
        pages::count_pages(path)
    }

    fn extract_pages(&self, source: &Path, from: usize, to: usize) -> Result<Vec<u8>, RenderError> {
        pages::extract_pages(source, from, to)
    }
}

fn encode_jpeg(pixmap: &Pixmap, spec: &RenderSpec) -> Result<Vec<u8>, RenderError> {
    let (channels, color_type) = match spec.color {
        ColorMode::Gray => (1usize, ExtendedColorType::L8),
        ColorMode::Rgb => (3usize, ExtendedColorType::Rgb8),
    };
    let n = pixmap.n() as usize;
    if n != channels {
        return Err(RenderError::Encode(format!(
            "expected {} channels, pixmap has {}",
            channels, n
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let stride = pixmap.stride() as usize;
    let row_bytes = width * n;
    let samples = pixmap.samples();
    if row_bytes > stride || samples.len() < stride.saturating_mul(height) {
        return Err(RenderError::Encode("pixmap buffer size mismatch".into()));
    }

    let mut packed = Vec::with_capacity(row_bytes * height);
    for y in 0..height {
        let start = y * stride;
        packed.extend_from_slice(&samples[start..start + row_bytes]);
    }

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, spec.quality)
        .encode(&packed, width as u32, height as u32, color_type)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(out)
}
