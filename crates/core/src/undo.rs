use crate::cache::PreviewCache;
use crate::error::{Result, SorterError};
use crate::fs_apply::relocate;
use crate::models::{MoveRecord, UndoOutcome};
use crate::paths;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Deletes `sorted_path` and moves `backup_path` (if given) back into
/// `original_folder` under the backup's file name.
///
/// Without a backup the sorted file is deleted and nothing is restored: a plain
/// move keeps no copy to restore from. A backup that is given but no longer
/// exists, or a restore target that is already taken, fails with
/// [`SorterError::Undo`] before the sorted file is touched.
pub fn undo(
    sorted_path: &Path,
    backup_path: Option<&Path>,
    original_folder: &Path,
    cache: &PreviewCache,
) -> Result<UndoOutcome> {
    restore(sorted_path, backup_path, original_folder, None, cache)
}

/// Undo driven by the record `move_document` returned; restores under the
/// original file name even if the backup had to be renamed.
pub fn undo_record(record: &MoveRecord, cache: &PreviewCache) -> Result<UndoOutcome> {
    restore(
        &record.new_path,
        record.backup_path.as_deref(),
        &record.original_folder,
        Some(&record.original_name),
        cache,
    )
}

fn restore(
    sorted_path: &Path,
    backup_path: Option<&Path>,
    original_folder: &Path,
    restore_name: Option<&str>,
    cache: &PreviewCache,
) -> Result<UndoOutcome> {
    let sorted = paths::normalize(sorted_path);
    let folder = paths::normalize(original_folder);

    // Validate before deleting anything so a failed undo loses nothing.
    let plan = match backup_path {
        Some(backup) => {
            let backup = paths::normalize(backup);
            if !backup.exists() {
                return Err(SorterError::Undo(format!(
                    "backup {} no longer exists",
                    backup.display()
                )));
            }
            let name = match restore_name {
                Some(name) => OsString::from(name),
                None => backup
                    .file_name()
                    .map(|n| n.to_os_string())
                    .ok_or_else(|| SorterError::Undo(format!("bad backup path {}", backup.display())))?,
            };
            let target = folder.join(name);
            if target.exists() && target != sorted {
                return Err(SorterError::Undo(format!(
                    "{} already exists",
                    target.display()
                )));
            }
            Some((backup, target))
        }
        None => None,
    };

    cache.invalidate(&sorted);
    if sorted.exists() {
        fs::remove_file(&sorted)
            .map_err(|e| SorterError::Undo(format!("remove {}: {}", sorted.display(), e)))?;
    }

    let Some((backup, target)) = plan else {
        warn!(path = %sorted.display(), "no backup recorded; sorted file deleted without restore");
        return Ok(UndoOutcome {
            restored_path: None,
        });
    };

    fs::create_dir_all(&folder)
        .map_err(|e| SorterError::Undo(format!("create {}: {}", folder.display(), e)))?;
    relocate(&backup, &target, false).map_err(|e| {
        SorterError::Undo(format!(
            "restore {} -> {}: {}",
            backup.display(),
            target.display(),
            e
        ))
    })?;
    cache.invalidate(&backup);
    cache.invalidate(&target);

    info!(restored = %target.display(), removed = %sorted.display(), "undid move");
    Ok(UndoOutcome {
        restored_path: Some(target),
    })
}
