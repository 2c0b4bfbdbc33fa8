use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::store::{save_list, StoreError};
use crate::task::TaskList;

pub const LIST_SUFFIX: &str = ".json";

#[derive(Debug, Error)]
pub enum ListDirError {
    #[error("Cannot read task directory {0}")]
    NoDirectory(PathBuf),
    #[error("No task lists found")]
    NoLists,
    #[error("List name cannot be empty")]
    EmptyName,
    #[error("List '{0}' already exists")]
    AlreadyExists(String),
    #[error("List file not found: {0}")]
    NotFound(PathBuf),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sorted `.json` file names in the task directory.
pub fn list_files(dir: &Path) -> Result<Vec<String>, ListDirError> {
    let entries = fs::read_dir(dir).map_err(|_| ListDirError::NoDirectory(dir.to_path_buf()))?;
    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter(|name| name.ends_with(LIST_SUFFIX))
        .collect();
    if files.is_empty() {
        return Err(ListDirError::NoLists);
    }
    files.sort();
    Ok(files)
}

/// List file name without the `.json` suffix.
pub fn display_name(file_name: &str) -> &str {
    file_name.strip_suffix(LIST_SUFFIX).unwrap_or(file_name)
}

/// Filesystem-safe identifier: lowercased, spaces become hyphens, anything
/// outside `[a-z0-9_-]` is dropped.
pub fn sanitize_list_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter_map(|ch| match ch {
            ' ' => Some('-'),
            'a'..='z' | '0'..='9' | '-' | '_' => Some(ch),
            _ => None,
        })
        .collect()
}

/// Creates `<sanitized>.json` holding an empty list titled with the
/// original, un-sanitized name. A name that sanitizes to nothing is
/// rejected the same as a blank one.
pub fn create_list(dir: &Path, name: &str) -> Result<PathBuf, ListDirError> {
    let title = name.trim();
    if title.is_empty() {
        return Err(ListDirError::EmptyName);
    }
    let sanitized = sanitize_list_name(title);
    if sanitized.is_empty() {
        return Err(ListDirError::EmptyName);
    }

    let path = dir.join(format!("{sanitized}{LIST_SUFFIX}"));
    if path.exists() {
        return Err(ListDirError::AlreadyExists(title.to_string()));
    }

    let mut list = TaskList::new(title);
    save_list(&path, &mut list)?;
    Ok(path)
}

/// Deletes a list file. Destructive, no recovery.
pub fn remove_list(dir: &Path, file_name: &str) -> Result<(), ListDirError> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Err(ListDirError::NotFound(path));
    }
    fs::remove_file(&path).map_err(StoreError::Io)?;
    Ok(())
}
