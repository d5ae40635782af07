use chrono::{DateTime, Utc};
use std::fs::{File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

/// Checks if a directory entry is hidden (starts with '.').
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Recursively lists all files below `dir`, propagating traversal errors.
/// The root itself is never treated as hidden.
pub fn list_files_walkdir_filtered(
    dir: &Path,
    include_hidden: bool,
) -> Result<Vec<PathBuf>, walkdir::Error> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| include_hidden || e.depth() == 0 || !is_hidden(e))
        .filter_map(|entry_result| match entry_result {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}

/// Sets both access and modification time of `path` to `instant`.
///
/// Like `touch`, this only needs ownership of the file: on unix the file is
/// opened read-only, so read-only media keeps working.
pub fn set_file_times(path: &Path, instant: DateTime<Utc>) -> std::io::Result<()> {
    let time = SystemTime::from(instant);
    let times = FileTimes::new().set_accessed(time).set_modified(time);
    open_for_times(path)?.set_times(times)
}

#[cfg(unix)]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    File::open(path)
}

// SetFileTime needs a handle with write-attribute access.
#[cfg(not(unix))]
fn open_for_times(path: &Path) -> std::io::Result<File> {
    File::options().write(true).open(path)
}
