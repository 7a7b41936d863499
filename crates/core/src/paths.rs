use crate::error::{Result, SorterError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Expands a leading `~`, makes the path absolute and folds `.` and `..`
/// lexically, without touching the filesystem. Cache keys rely on one
/// spelling per file.
pub fn normalize(path: &Path) -> PathBuf {
    let expanded = expand_home(path);
    let absolute = std::path::absolute(&expanded).unwrap_or(expanded);
    fold_dots(&absolute)
}

fn fold_dots(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` at the root stays at the root.
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Ensures `path` is a usable folder, creating it (and parents) when absent.
pub fn validate_folder(path: &Path) -> Result<PathBuf> {
    let path = normalize(path);
    if !path.exists() {
        fs::create_dir_all(&path)
            .map_err(|e| SorterError::io(format!("cannot create folder {}", path.display()), e))?;
    }
    if !path.is_dir() {
        return Err(SorterError::NotADirectory(path));
    }
    Ok(path)
}

/// Folder that must already exist.
pub fn existing_dir(path: &Path) -> Result<PathBuf> {
    let path = normalize(path);
    if !path.exists() {
        return Err(SorterError::NotFound(path));
    }
    if !path.is_dir() {
        return Err(SorterError::NotADirectory(path));
    }
    Ok(path)
}

/// File that must already exist.
pub fn existing_file(path: &Path) -> Result<PathBuf> {
    let path = normalize(path);
    if !path.exists() {
        return Err(SorterError::NotFound(path));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(normalize(Path::new("~/Sorted")), home.join("Sorted"));
        }
    }

    #[test]
    fn relative_paths_become_absolute() {
        assert!(normalize(Path::new("inbox/a.pdf")).is_absolute());
    }

    #[test]
    fn dot_segments_fold_away() {
        let temp = tempfile::tempdir().unwrap();
        let dotted = temp.path().join("sub").join("..").join(".").join("a.pdf");
        assert_eq!(normalize(&dotted), temp.path().join("a.pdf"));
        assert!(!normalize(Path::new("inbox/../a.pdf"))
            .components()
            .any(|c| c == Component::ParentDir));
    }

    #[test]
    fn validate_creates_missing_folders() {
        let temp = tempfile::tempdir().unwrap();
        let nested = temp.path().join("x").join("y");
        let got = validate_folder(&nested).unwrap();
        assert!(got.is_dir());
        assert_eq!(got, nested);
    }

    #[test]
    fn validate_rejects_files() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("a.pdf");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            validate_folder(&file),
            Err(SorterError::NotADirectory(_))
        ));
        assert!(matches!(
            existing_dir(&temp.path().join("missing")),
            Err(SorterError::NotFound(_))
        ));
    }
}
