use std::path::{Path, PathBuf};

use globset::{Glob, GlobSetBuilder};

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the directory containing the file, or `None`.
pub fn find_ancestor_with(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Remove a file or directory tree. Returns `Ok(false)` when nothing was there.
pub fn remove_path(path: &Path) -> std::io::Result<bool> {
    let Ok(meta) = std::fs::symlink_metadata(path) else {
        return Ok(false);
    };
    if meta.is_dir() {
        std::fs::remove_dir_all(path)?;
    } else {
        std::fs::remove_file(path)?;
    }
    Ok(true)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None if path == "~" => home_dir(),
        None => PathBuf::from(path),
    }
}

/// The user's home directory (`HOME`, then `USERPROFILE`, then `.`).
pub fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

/// Resolve clean-rule entries against `dir`.
///
/// Plain entries are joined onto `dir`. Entries containing glob metacharacters
/// are matched against the direct children of `dir`. Only existing paths are
/// returned, sorted.
pub fn expand_entries(dir: &Path, entries: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut globs = GlobSetBuilder::new();
    let mut has_globs = false;

    for entry in entries {
        let trimmed = entry.trim_start_matches("./");
        if trimmed.contains(|c: char| matches!(c, '*' | '?' | '[' | '{')) {
            let glob = Glob::new(trimmed)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
            globs.add(glob);
            has_globs = true;
        } else {
            let path = dir.join(trimmed);
            if std::fs::symlink_metadata(&path).is_ok() {
                found.push(path);
            }
        }
    }

    if has_globs && dir.is_dir() {
        let set = globs
            .build()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        for child in std::fs::read_dir(dir)? {
            let child = child?;
            if set.is_match(child.file_name()) {
                found.push(child.path());
            }
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}
