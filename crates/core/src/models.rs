use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A PDF found by a directory scan. Identity is the absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    pub source: PathBuf,
    pub destination_folder: PathBuf,
    #[serde(default)]
    pub pages_to_keep: i64,
    #[serde(default)]
    pub backup_folder: Option<PathBuf>,
}

/// What a move did, returned to the caller and handed back for undo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub new_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub original_folder: PathBuf,
    pub original_name: String,
    /// Pages written to `new_path` when the move was a split.
    pub pages_kept: Option<usize>,
    pub moved_at: DateTime<Utc>,
}

impl MoveRecord {
    pub fn is_split(&self) -> bool {
        self.pages_kept.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoOutcome {
    pub restored_path: Option<PathBuf>,
}

/// Inclusive byte range, as in an HTTP `Range: bytes=start-end` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: u64,
    #[serde(default)]
    pub end: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfBytes {
    pub data: Vec<u8>,
    pub total_len: u64,
    /// Inclusive range actually served; `None` for the whole file.
    pub range: Option<(u64, u64)>,
}
