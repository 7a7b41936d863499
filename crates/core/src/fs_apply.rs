use crate::cache::PreviewCache;
use crate::config::SafetyConfig;
use crate::error::{Result, SorterError};
use crate::models::{MoveRecord, MoveRequest};
use crate::paths;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Moves `req.source` into `req.destination_folder`. With a positive
/// `pages_to_keep` and a backup folder, the original is first copied to the
/// backup folder and only the leading pages are written to the destination.
pub fn move_document(
    req: &MoveRequest,
    cache: &PreviewCache,
    safety: &SafetyConfig,
) -> Result<MoveRecord> {
    let source = paths::existing_file(&req.source)?;
    let dest_folder = paths::existing_dir(&req.destination_folder)?;
    let file_name = source
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| SorterError::NotFound(source.clone()))?;
    let original_folder = source
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));

    let wanted = dest_folder.join(&file_name);
    cache.invalidate(&source);

    let (destination, backup_path, pages_kept) = match (&req.backup_folder, req.pages_to_keep) {
        (Some(backup_folder), keep) if keep > 0 => {
            let (destination, backup, kept) = split_with_backup(
                &source,
                &wanted,
                &paths::normalize(backup_folder),
                keep as usize,
                cache,
            )?;
            (destination, Some(backup), Some(kept))
        }
        _ => {
            let destination = resolve_conflict(&wanted);
            cache.invalidate(&destination);
            relocate(&source, &destination, safety.copy_then_delete).map_err(|e| {
                SorterError::Move {
                    message: format!("{} -> {}", source.display(), destination.display()),
                    backup_path: None,
                    source: e,
                }
            })?;
            (destination, None, None)
        }
    };

    info!(
        from = %source.display(),
        to = %destination.display(),
        backup = ?backup_path,
        pages_kept = ?pages_kept,
        "moved document"
    );
    Ok(MoveRecord {
        new_path: destination,
        backup_path,
        original_folder,
        original_name: file_name.to_string_lossy().into_owned(),
        pages_kept,
        moved_at: Utc::now(),
    })
}

/// Returns the trimmed document's path, the backup's path and the pages kept.
fn split_with_backup(
    source: &Path,
    wanted: &Path,
    backup_folder: &Path,
    pages_to_keep: usize,
    cache: &PreviewCache,
) -> Result<(PathBuf, PathBuf, usize)> {
    let backup = backup_copy(source, backup_folder).map_err(|e| SorterError::Move {
        message: format!("backup of {} into {}", source.display(), backup_folder.display()),
        backup_path: None,
        source: e,
    })?;
    cache.invalidate(&backup);
    // Named after the backup exists so the two can never share a path.
    let destination = resolve_conflict(wanted);
    cache.invalidate(&destination);

    // From here on the backup is complete; every failure reports it.
    let split_err = |message: String| SorterError::Split {
        message,
        backup_path: Some(backup.clone()),
    };
    let raster = cache.rasterizer();
    let total = raster
        .count_pages(source)
        .map_err(|e| split_err(e.to_string()))?;
    let kept = pages_to_keep.min(total);
    if kept == 0 {
        return Err(split_err(format!("{} has no pages", source.display())));
    }
    let trimmed = raster
        .extract_pages(source, 0, kept - 1)
        .map_err(|e| split_err(e.to_string()))?;
    if let Err(e) = fs::write(&destination, &trimmed) {
        let _ = fs::remove_file(&destination);
        return Err(split_err(format!("write {}: {}", destination.display(), e)));
    }
    debug!(
        source = %source.display(),
        kept,
        total,
        backup = %backup.display(),
        "wrote trimmed document"
    );

    fs::remove_file(source).map_err(|e| SorterError::Move {
        message: format!("remove original {}", source.display()),
        backup_path: Some(backup.clone()),
        source: e,
    })?;
    Ok((destination, backup, kept))
}

/// Copies `src` into `backup_dir`, creating the folder and picking a free name.
fn backup_copy(src: &Path, backup_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(backup_dir)?;
    let file_name = src
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "backup".into());
    let candidate = resolve_conflict(&backup_dir.join(file_name));
    fs::copy(src, &candidate)?;
    Ok(candidate)
}

/// Returns `dest` if free, else the first free `<stem>_<n>.<ext>` for n = 1, 2, ...
pub fn resolve_conflict(dest: &Path) -> PathBuf {
    if !dest.exists() {
        return dest.to_path_buf();
    }
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let ext = dest
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut counter = 1;
    loop {
        let name = if ext.is_empty() {
            format!("{}_{}", stem, counter)
        } else {
            format!("{}_{}.{}", stem, counter, ext)
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Rename, falling back to copy + delete (e.g. across filesystems).
pub(crate) fn relocate(from: &Path, to: &Path, copy_then_delete: bool) -> io::Result<()> {
    if !copy_then_delete {
        match fs::rename(from, to) {
            Ok(()) => return Ok(()),
            Err(e) => debug!(error = %e, "rename failed, copying instead"),
        }
    }
    fs::copy(from, to)?;
    if let Err(e) = fs::remove_file(from) {
        warn!(path = %from.display(), error = %e, "could not remove original after copy");
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}
