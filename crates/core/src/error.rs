use providers::RenderError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SorterError {
    #[error("not found: {0}")]
    NotFound(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("split failed: {message}{}", backup_note(.backup_path))]
    Split {
        message: String,
        backup_path: Option<PathBuf>,
    },
    #[error("move failed: {message}{}", backup_note(.backup_path))]
    Move {
        message: String,
        backup_path: Option<PathBuf>,
        #[source]
        source: io::Error,
    },
    #[error("undo failed: {0}")]
    Undo(String),
    #[error("invalid byte range {start}-{end:?} for {len} byte file")]
    InvalidRange { start: u64, end: Option<u64>, len: u64 },
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("worker job failed: {0}")]
    Worker(String),
}

fn backup_note(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(p) => format!(" (backup kept at {})", p.display()),
        None => " (no backup was created)".to_string(),
    }
}

impl SorterError {
    /// Stable machine-readable name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            SorterError::NotFound(_) => "not_found",
            SorterError::NotADirectory(_) => "not_a_directory",
            SorterError::Render(_) => "render_error",
            SorterError::Split { .. } => "split_error",
            SorterError::Move { .. } => "move_error",
            SorterError::Undo(_) => "undo_error",
            SorterError::InvalidRange { .. } => "invalid_range",
            SorterError::Io { .. } => "io_error",
            SorterError::Worker(_) => "worker_error",
        }
    }

    /// Backup copy that survived a failed split or move, if any.
    pub fn backup_path(&self) -> Option<&PathBuf> {
        match self {
            SorterError::Split { backup_path, .. } | SorterError::Move { backup_path, .. } => {
                backup_path.as_ref()
            }
            _ => None,
        }
    }

    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        SorterError::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T, E = SorterError> = std::result::Result<T, E>;
