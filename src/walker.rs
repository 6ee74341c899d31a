use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A discovered topic source file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the content root.
    pub relative_path: PathBuf,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
}

/// Extensions treated as markdown topics.
const SUPPORTED_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Version-control metadata directories, never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Recursively walk a directory and discover topic files.
///
/// Only returns files with a markdown extension. Dot-prefixed files and
/// directories are walked like any other; only version-control folders
/// (`.git`, `.hg`, `.svn`) are left out. A markdown symlink whose target
/// cannot be resolved is an [`Error::FileAccess`]. Results are sorted by
/// relative path so repeated walks see the same order.
pub fn discover_files(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let canonical_root =
        root.canonicalize().map_err(|e| Error::file_access(root, e))?;
    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

/// Whether `path` has a markdown extension.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

fn walk_dir(
    root: &Path,
    current: &Path,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    let entries =
        std::fs::read_dir(current).map_err(|e| Error::file_access(current, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::file_access(current, e))?;
        let path = entry.path();
        let file_type =
            entry.file_type().map_err(|e| Error::file_access(&path, e))?;

        if file_type.is_dir() {
            if is_skipped_dir(&entry.file_name().to_string_lossy()) {
                continue;
            }
            walk_dir(root, &path, results)?;
        } else if file_type.is_symlink() {
            let resolved = match path.canonicalize() {
                Ok(p) => p,
                Err(e) if is_supported(&path) => {
                    return Err(Error::file_access(&path, e));
                }
                Err(_) => continue,
            };
            // Never follow links to directories: they may loop.
            if resolved.is_file() && is_supported(&path) {
                results.push(make_discovered(root, &path, resolved));
            }
        } else if file_type.is_file() && is_supported(&path) {
            let abs = path
                .canonicalize()
                .map_err(|e| Error::file_access(&path, e))?;
            results.push(make_discovered(root, &path, abs));
        }
    }

    Ok(())
}

fn is_skipped_dir(name: &str) -> bool {
    SKIPPED_DIRS.contains(&name)
}

fn make_discovered(
    root: &Path,
    original_path: &Path,
    absolute_path: PathBuf,
) -> DiscoveredFile {
    let relative_path = original_path
        .strip_prefix(root)
        .unwrap_or(original_path)
        .to_path_buf();

    DiscoveredFile {
        relative_path,
        absolute_path,
    }
}
