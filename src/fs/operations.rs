use std::{
    fs::OpenOptions,
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use fs4::fs_std::FileExt;
use tempfile::NamedTempFile;

/// Runs `action` while holding an advisory lock on `lock_path`. Shared locks are meant for
/// readers, exclusive ones for writers. The lock file itself never carries data.
pub fn with_file_lock<T>(
    lock_path: &Path,
    exclusive: bool,
    action: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let lock = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(lock_path)
        .with_context(|| format!("Failed to open lock file {lock_path:?}"))?;

    if exclusive {
        FileExt::lock_exclusive(&lock)?;
    } else {
        FileExt::lock_shared(&lock)?;
    }
    let result = action();
    FileExt::unlock(&lock)?;
    result
}

/// Replaces the whole file at `path` with `contents`. Data is written into a sibling temporary
/// file first and then renamed over the target, so readers see either the old or the new
/// payload and never a partial one.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temporary = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {dir:?}"))?;
    temporary.write_all(contents)?;
    temporary.as_file().sync_all()?;
    temporary
        .persist(path)
        .with_context(|| format!("Failed to replace {path:?}"))?;
    Ok(())
}

/// Reads a whole file, mapping a missing file to `None`.
pub fn read_if_exists(path: &Path) -> Result<Option<String>, io::Error> {
    match std::fs::read_to_string(path) {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Removes a file, treating an already missing file as success.
pub fn remove_if_exists(path: &Path) -> Result<(), io::Error> {
    match std::fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
