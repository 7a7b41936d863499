//! Provider abstractions for PDF rasterization and the OS folder picker.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[cfg(feature = "mupdf")]
pub mod mupdf_raster;
pub mod noop;
pub mod pages;
pub mod picker;
#[cfg(feature = "test-utils")]
pub mod testing;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot open {path}: {message}")]
    Open { path: PathBuf, message: String },
    #[error("{0} is encrypted")]
    Encrypted(PathBuf),
    #[error("page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("invalid page range {from}..={to} (document has {count} pages)")]
    InvalidRange { from: usize, to: usize, count: usize },
    #[error("render failed: {0}")]
    Render(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("rendering not supported: {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    Gray,
    Rgb,
}

/// Output parameters for a single page render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderSpec {
    pub width: u32,
    pub quality: u8,
    pub color: ColorMode,
}

/// Blocking PDF backend. Every call may be slow; callers run them off the
/// request task.
pub trait Rasterizer: Send + Sync {
    /// Renders `page` scaled to `spec.width` pixels wide and returns JPEG bytes.
    fn render_page(&self, path: &Path, page: usize, spec: &RenderSpec)
        -> Result<Vec<u8>, RenderError>;

    fn count_pages(&self, path: &Path) -> Result<usize, RenderError>;

    /// Builds a new document holding pages `from..=to` of `source`.
    fn extract_pages(&self, source: &Path, from: usize, to: usize)
        -> Result<Vec<u8>, RenderError>;
}

#[async_trait::async_trait]
pub trait FolderPicker: Send + Sync {
    /// Returns `None` when the user cancels or no dialog is available.
    async fn pick_folder(&self) -> Option<PathBuf>;
}
