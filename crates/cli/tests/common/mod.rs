#![allow(dead_code)]

use providers::testing::{write_blank_pdf, HashRasterizer};
use providers::FolderPicker;
use sorter_core::config::AppConfig;
use sorter_core::Sorter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Picker that answers with a fixed folder, or "cancelled" when `None`.
pub struct FixedPicker(pub Option<PathBuf>);

#[async_trait::async_trait]
impl FolderPicker for FixedPicker {
    async fn pick_folder(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

pub fn sorter() -> Sorter {
    sorter_with_picker(None)
}

pub fn sorter_with_picker(choice: Option<PathBuf>) -> Sorter {
    Sorter::new(
        AppConfig::default(),
        Arc::new(HashRasterizer::new()),
        Arc::new(FixedPicker(choice)),
    )
}

pub fn pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let path = dir.join(name);
    write_blank_pdf(&path, pages);
    path
}
