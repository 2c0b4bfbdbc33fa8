use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::task::TaskList;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Task list not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to parse task list {path}: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize task list: {0}")]
    Serialize(serde_json::Error),
    #[error("Task list IO error: {0}")]
    Io(#[from] io::Error),
}

pub fn load_list(path: &Path) -> Result<TaskList, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::NotFound(path.to_path_buf()))
        }
        Err(err) => return Err(StoreError::Io(err)),
    };
    serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

/// Stamps `updated_at` and writes the list as pretty JSON through a temp
/// file + rename, so a failed write never truncates the previous file.
pub fn save_list(path: &Path, list: &mut TaskList) -> Result<(), StoreError> {
    list.updated_at = Utc::now();
    let raw = serde_json::to_string_pretty(list).map_err(StoreError::Serialize)?;
    let tmp = tmp_path(path);
    fs::write(&tmp, raw)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
