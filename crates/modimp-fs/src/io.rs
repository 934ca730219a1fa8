//! Atomic I/O operations with file locking

use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes.
/// Acquires an advisory lock to prevent concurrent access.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read raw bytes from a file.
pub fn read_bytes(path: &NormalizedPath) -> Result<Vec<u8>> {
    let native_path = path.to_native();
    fs::read(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Copy `from` over `to`, creating the destination's parent directories.
pub fn copy_file(from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
    ensure_parent(to)?;
    fs::copy(from.to_native(), to.to_native()).map_err(|e| Error::io(from.to_native(), e))?;
    Ok(())
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent(path: &NormalizedPath) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent.to_native()).map_err(|e| Error::io(parent.to_native(), e))?;
    }
    Ok(())
}

/// Remove a directory tree if present, then recreate it empty.
pub fn reset_dir(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    if native.exists() {
        fs::remove_dir_all(&native).map_err(|e| Error::io(&native, e))?;
    }
    fs::create_dir_all(&native).map_err(|e| Error::io(&native, e))
}

/// List the direct children of a directory, sorted by name.
pub fn list_dir(path: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native = path.to_native();
    let mut entries = fs::read_dir(&native)
        .map_err(|e| Error::io(&native, e))?
        .map(|entry| {
            entry
                .map(|e| NormalizedPath::new(e.path()))
                .map_err(|e| Error::io(&native, e))
        })
        .collect::<Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

/// Remove a file, reporting the path on failure.
pub fn remove_file(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    fs::remove_file(&native).map_err(|e| Error::io(&native, e))
}

/// Remove empty directories below and including `path`, deepest first.
///
/// Returns `true` if `path` itself was removed. Directories that still hold
/// files are left in place.
pub fn prune_empty_dirs(path: &NormalizedPath) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut empty = true;
    for entry in list_dir(path)? {
        if entry.is_dir() {
            empty &= prune_empty_dirs(&entry)?;
        } else {
            empty = false;
        }
    }
    if empty {
        let native = path.to_native();
        fs::remove_dir(&native).map_err(|e| Error::io(&native, e))?;
    }
    Ok(empty)
}
