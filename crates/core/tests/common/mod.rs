#![allow(dead_code)]

use providers::testing::{write_blank_pdf, HashRasterizer};
use providers::FolderPicker;
use sorter_core::config::AppConfig;
use sorter_core::Sorter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct NoDialog;

#[async_trait::async_trait]
impl FolderPicker for NoDialog {
    async fn pick_folder(&self) -> Option<PathBuf> {
        None
    }
}

pub fn sorter() -> (Sorter, Arc<HashRasterizer>) {
    let raster = Arc::new(HashRasterizer::new());
    let sorter = Sorter::new(AppConfig::default(), raster.clone(), Arc::new(NoDialog));
    (sorter, raster)
}

pub fn pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    write_blank_pdf(&path, pages);
    path
}

pub fn page_count(path: &Path) -> usize {
    providers::pages::count_pages(path).unwrap()
}
