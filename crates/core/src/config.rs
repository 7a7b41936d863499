use providers::{ColorMode, RenderSpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub workers: WorkerConfig,
    #[serde(default)]
    pub safety: SafetyConfig,
    #[serde(default)]
    pub picker: PickerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// First page, shown in the document list.
    pub low: RenderSpec,
    /// Every page, shown in the page strip.
    pub all_pages: RenderSpec,
    /// First page at full quality, shown on demand.
    pub high: RenderSpec,
    pub cache_capacity: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            low: RenderSpec {
                width: 1200,
                quality: 75,
                color: ColorMode::Gray,
            },
            all_pages: RenderSpec {
                width: 1200,
                quality: 70,
                color: ColorMode::Gray,
            },
            high: RenderSpec {
                width: 1400,
                quality: 90,
                color: ColorMode::Rgb,
            },
            cache_capacity: 256,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub warmup_count: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { warmup_count: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub max_workers: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { max_workers: 8 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// Always copy then delete instead of trying a rename first.
    #[serde(default)]
    pub copy_then_delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub timeout_secs: u64,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix("PDF_SORTER")
            .separator("__")
            .try_parsing(true),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
