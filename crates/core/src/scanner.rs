//! Lists the PDFs in a folder and warms the preview cache for the first few.

use crate::cache::PreviewCache;
use crate::error::{Result, SorterError};
use crate::models::DocumentRef;
use crate::paths;
use crate::worker::WorkerPool;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;
use walkdir::WalkDir;

/// Non-recursive listing of `*.pdf` files (any case), sorted by file name.
pub fn scan(folder: &Path) -> Result<Vec<DocumentRef>> {
    let folder = paths::existing_dir(folder)?;

    let mut docs = Vec::new();
    for entry in WalkDir::new(&folder).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let msg = e.to_string();
            SorterError::io(
                format!("cannot read {}", folder.display()),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, msg)),
            )
        })?;
        // Follows symlinks so linked PDFs are listed too.
        if !entry.path().is_file() || !is_pdf(entry.path()) {
            continue;
        }
        docs.push(DocumentRef {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path().to_path_buf(),
        });
    }
    docs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(docs)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Queues low-res renders for the first `count` documents. Callers may drop
/// the handles; failures never surface.
pub fn schedule_warmup(
    docs: &[DocumentRef],
    count: usize,
    cache: &Arc<PreviewCache>,
    pool: &WorkerPool,
) -> Vec<JoinHandle<()>> {
    docs.iter()
        .take(count)
        .map(|doc| {
            let cache = Arc::clone(cache);
            let path = doc.path.clone();
            pool.spawn_detached(move || {
                if cache.get_or_render_low(&path).is_some() {
                    debug!(path = %path.display(), "warmed preview");
                }
            })
        })
        .collect()
}
