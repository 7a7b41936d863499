//! Bounded cache of rendered previews, keyed by (path, purpose, width).

use crate::config::PreviewConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use lru::LruCache;
use providers::{Rasterizer, RenderError, RenderSpec};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// First page, low resolution, grayscale.
    Low,
    /// Every page at list resolution.
    AllPages,
    /// First page at full resolution and color.
    High,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub purpose: Purpose,
    pub width: u32,
}

impl CacheKey {
    pub fn new(path: &Path, purpose: Purpose, spec: &RenderSpec) -> Self {
        Self {
            path: path.to_path_buf(),
            purpose,
            width: spec.width,
        }
    }
}

/// Base64-encoded JPEG data.
#[derive(Clone, Debug)]
pub enum CacheValue {
    Single(Arc<String>),
    Pages(Arc<Vec<String>>),
}

pub struct PreviewCache {
    entries: Mutex<LruCache<CacheKey, CacheValue>>,
    rasterizer: Arc<dyn Rasterizer>,
    profiles: PreviewConfig,
}

impl PreviewCache {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, profiles: PreviewConfig) -> Self {
        let capacity = NonZeroUsize::new(profiles.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            rasterizer,
            profiles,
        }
    }

    pub fn rasterizer(&self) -> &Arc<dyn Rasterizer> {
        &self.rasterizer
    }

    /// Low-res first-page preview. Blocking.
    pub fn low(&self, path: &Path) -> Result<Arc<String>, RenderError> {
        let spec = self.profiles.low;
        let key = CacheKey::new(path, Purpose::Low, &spec);
        if let Some(CacheValue::Single(hit)) = self.get(&key) {
            return Ok(hit);
        }
        let encoded = Arc::new(STANDARD.encode(self.rasterizer.render_page(path, 0, &spec)?));
        self.insert(key, CacheValue::Single(Arc::clone(&encoded)));
        Ok(encoded)
    }

    /// Lenient form of [`low`](Self::low) for bulk callers: failures are logged
    /// and reported as `None`.
    pub fn get_or_render_low(&self, path: &Path) -> Option<Arc<String>> {
        match self.low(path) {
            Ok(preview) => Some(preview),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "low-res preview failed");
                None
            }
        }
    }

    /// Every page at list resolution, in page order. Blocking.
    pub fn all_pages(&self, path: &Path) -> Result<Arc<Vec<String>>, RenderError> {
        let spec = self.profiles.all_pages;
        let key = CacheKey::new(path, Purpose::AllPages, &spec);
        if let Some(CacheValue::Pages(hit)) = self.get(&key) {
            return Ok(hit);
        }
        let count = self.rasterizer.count_pages(path)?;
        let mut pages = Vec::with_capacity(count);
        for page in 0..count {
            let jpeg = self.rasterizer.render_page(path, page, &spec)?;
            pages.push(STANDARD.encode(jpeg));
        }
        let pages = Arc::new(pages);
        self.insert(key, CacheValue::Pages(Arc::clone(&pages)));
        Ok(pages)
    }

    /// Lenient form of [`all_pages`](Self::all_pages); empty on failure.
    pub fn get_or_render_all(&self, path: &Path) -> Arc<Vec<String>> {
        match self.all_pages(path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "page previews failed");
                Arc::new(Vec::new())
            }
        }
    }

    /// Full-resolution first page as raw JPEG bytes. Failures propagate.
    pub fn get_or_render_high(&self, path: &Path) -> Result<Vec<u8>, RenderError> {
        let spec = self.profiles.high;
        let key = CacheKey::new(path, Purpose::High, &spec);
        if let Some(CacheValue::Single(hit)) = self.get(&key) {
            return STANDARD
                .decode(hit.as_bytes())
                .map_err(|e| RenderError::Encode(e.to_string()));
        }
        let jpeg = self.rasterizer.render_page(path, 0, &spec)?;
        self.insert(key, CacheValue::Single(Arc::new(STANDARD.encode(&jpeg))));
        Ok(jpeg)
    }

    /// Drops every entry derived from `path`. Returns how many were removed.
    pub fn invalidate(&self, path: &Path) -> usize {
        let mut entries = self.lock();
        let stale: Vec<CacheKey> = entries
            .iter()
            .filter(|(k, _)| k.path == path)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &stale {
            entries.pop(key);
        }
        if !stale.is_empty() {
            debug!(path = %path.display(), removed = stale.len(), "invalidated previews");
        }
        stale.len()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.lock().contains(key)
    }

    /// Key this cache uses for `path` and `purpose` under its current profiles.
    pub fn key_for(&self, path: &Path, purpose: Purpose) -> CacheKey {
        let spec = match purpose {
            Purpose::Low => &self.profiles.low,
            Purpose::AllPages => &self.profiles.all_pages,
            Purpose::High => &self.profiles.high,
        };
        CacheKey::new(path, purpose, spec)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    fn get(&self, key: &CacheKey) -> Option<CacheValue> {
        self.lock().get(key).cloned()
    }

    fn insert(&self, key: CacheKey, value: CacheValue) {
        // A move may have invalidated this path while the render was running.
        if !key.path.exists() {
            debug!(path = %key.path.display(), "dropping render of relocated file");
            return;
        }
        self.lock().put(key, value);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, CacheValue>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
