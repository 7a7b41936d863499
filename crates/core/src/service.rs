//! Async entry points used by the request handlers. Blocking work is sent to
//! the worker pool; the calling task only awaits it.

use crate::cache::PreviewCache;
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::{ByteRange, DocumentRef, MoveRecord, MoveRequest, PdfBytes, UndoOutcome};
use crate::worker::WorkerPool;
use crate::{fetch, fs_apply, paths, scanner, undo};
use providers::picker::DialogPicker;
use providers::{FolderPicker, Rasterizer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

pub struct Sorter {
    config: AppConfig,
    cache: Arc<PreviewCache>,
    pool: WorkerPool,
    picker: Arc<dyn FolderPicker>,
}

impl Sorter {
    pub fn new(
        config: AppConfig,
        rasterizer: Arc<dyn Rasterizer>,
        picker: Arc<dyn FolderPicker>,
    ) -> Self {
        let cache = Arc::new(PreviewCache::new(rasterizer, config.preview.clone()));
        let pool = WorkerPool::new(config.workers.max_workers);
        Self {
            config,
            cache,
            pool,
            picker,
        }
    }

    /// Wires the default rasterizer and the native folder dialog.
    pub fn from_config(config: AppConfig) -> Self {
        let picker = Arc::new(DialogPicker::new(Duration::from_secs(
            config.picker.timeout_secs,
        )));
        Self::new(config, build_rasterizer(), picker)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<PreviewCache> {
        &self.cache
    }

    pub async fn scan(&self, folder: &Path) -> Result<Vec<DocumentRef>> {
        let (docs, _warmup) = self.scan_with_warmup(folder).await?;
        Ok(docs)
    }

    /// Like [`scan`](Self::scan) but hands back the warm-up jobs.
    pub async fn scan_with_warmup(
        &self,
        folder: &Path,
    ) -> Result<(Vec<DocumentRef>, Vec<JoinHandle<()>>)> {
        let folder = folder.to_path_buf();
        let docs = self.pool.run(move || scanner::scan(&folder)).await??;
        let warmup = scanner::schedule_warmup(
            &docs,
            self.config.scan.warmup_count,
            &self.cache,
            &self.pool,
        );
        info!(found = docs.len(), warming = warmup.len(), "scanned folder");
        Ok((docs, warmup))
    }

    pub async fn preview(&self, path: &Path) -> Result<Arc<String>> {
        let path = paths::existing_file(path)?;
        let cache = Arc::clone(&self.cache);
        Ok(self.pool.run(move || cache.low(&path)).await??)
    }

    /// Empty when the document cannot be rendered.
    pub async fn all_pages(&self, path: &Path) -> Result<Arc<Vec<String>>> {
        let path = paths::existing_file(path)?;
        let cache = Arc::clone(&self.cache);
        self.pool.run(move || cache.get_or_render_all(&path)).await
    }

    pub async fn page_count(&self, path: &Path) -> Result<usize> {
        let path = paths::existing_file(path)?;
        let cache = Arc::clone(&self.cache);
        Ok(self
            .pool
            .run(move || cache.rasterizer().count_pages(&path))
            .await??)
    }

    pub async fn preview_image(&self, path: &Path) -> Result<Vec<u8>> {
        let path = paths::existing_file(path)?;
        let cache = Arc::clone(&self.cache);
        Ok(self
            .pool
            .run(move || cache.get_or_render_high(&path))
            .await??)
    }

    pub async fn validate_folder(&self, path: &Path) -> Result<PathBuf> {
        let path = path.to_path_buf();
        self.pool.run(move || paths::validate_folder(&path)).await?
    }

    pub async fn move_document(&self, req: MoveRequest) -> Result<MoveRecord> {
        let cache = Arc::clone(&self.cache);
        let safety = self.config.safety.clone();
        self.pool
            .run(move || fs_apply::move_document(&req, &cache, &safety))
            .await?
    }

    pub async fn undo(
        &self,
        sorted_path: &Path,
        backup_path: Option<&Path>,
        original_folder: &Path,
    ) -> Result<UndoOutcome> {
        let cache = Arc::clone(&self.cache);
        let sorted = sorted_path.to_path_buf();
        let backup = backup_path.map(Path::to_path_buf);
        let folder = original_folder.to_path_buf();
        self.pool
            .run(move || undo::undo(&sorted, backup.as_deref(), &folder, &cache))
            .await?
    }

    pub async fn undo_record(&self, record: MoveRecord) -> Result<UndoOutcome> {
        let cache = Arc::clone(&self.cache);
        self.pool
            .run(move || undo::undo_record(&record, &cache))
            .await?
    }

    pub async fn read_pdf(&self, path: &Path, range: Option<ByteRange>) -> Result<PdfBytes> {
        let path = path.to_path_buf();
        self.pool.run(move || fetch::read_pdf(&path, range)).await?
    }

    pub async fn pick_folder(&self) -> Option<PathBuf> {
        self.picker.pick_folder().await
    }
}

#[cfg(feature = "mupdf")]
pub fn build_rasterizer() -> Arc<dyn Rasterizer> {
    Arc::new(providers::mupdf_raster::MupdfRasterizer::new())
}

#[cfg(not(feature = "mupdf"))]
pub fn build_rasterizer() -> Arc<dyn Rasterizer> {
    tracing::warn!("built without the `mupdf` feature; previews are unavailable");
    Arc::new(providers::noop::NoopRasterizer)
}
