//! Where the database lives when `--db-path` is not given:
//! `$XDG_DATA_HOME/kindred/kindred.sqlite3`, or `~/.local/share/kindred/`
//! when that variable is unset or not absolute.

use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "kindred";
const DB_FILENAME: &str = "kindred.sqlite3";

pub fn data_dir() -> Result<PathBuf> {
    let base = match env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        Some(dir) if dir.is_absolute() => dir,
        _ => dirs::home_dir()
            .ok_or(StoreError::MissingHomeDir)?
            .join(".local")
            .join("share"),
    };
    Ok(base.join(APP_DIR))
}

/// An explicit path is used as given, creating missing parents. The default
/// location is created on first use and kept owner-only.
pub fn resolve_db_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let Some(path) = explicit else {
        let dir = data_dir()?;
        fs::create_dir_all(&dir)?;
        owner_only_dir(&dir)?;
        return Ok(dir.join(DB_FILENAME));
    };

    if path.as_os_str().is_empty() || path.is_dir() {
        return Err(StoreError::InvalidDataPath(path));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(path)
}

#[cfg(unix)]
fn owner_only_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn owner_only_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreErrorKind;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_gets_its_parents() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("people.sqlite3");

        let resolved = resolve_db_path(Some(path.clone())).expect("resolve");
        assert_eq!(resolved, path);
        assert!(temp.path().join("nested").is_dir());
    }

    #[test]
    fn directories_and_empty_paths_are_not_databases() {
        let temp = TempDir::new().expect("tempdir");

        let err = resolve_db_path(Some(temp.path().to_path_buf())).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::InvalidDataPath);

        let err = resolve_db_path(Some(PathBuf::new())).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::InvalidDataPath);
    }
}
