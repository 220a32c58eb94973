//! Directory traversal feeding the bundle builder.
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use walkdir::WalkDir;

use crate::build::{Error, Result};

/// A file read from disk, keyed by its path inside the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Slash-separated path relative to the walked root.
    pub path: String,
    /// Where the bytes were read from.
    pub origin: PathBuf,
    pub bytes: Vec<u8>,
}

/// Reads every regular file under `root`, recursively.
///
/// Directories are skipped and entries come out sorted by file name, so the
/// order is stable across runs. If `root` is itself a file it yields a
/// single entry keyed by its file name. Failures are reported per file and
/// do not stop the walk.
pub fn walk(root: &Path) -> impl Iterator<Item = Result<SourceEntry>> + use<> {
    let root = root.to_path_buf();
    WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => return Some(Err(Error::Walk(err))),
            };
            // Symlinks are not followed by the walker, so a link to a
            // directory shows up here as a non-directory.
            if entry.file_type().is_dir() || entry.path().is_dir() {
                return None;
            }
            Some(read_entry(&root, entry.path()))
        })
}

fn read_entry(root: &Path, path: &Path) -> Result<SourceEntry> {
    let key = bundle_key(root, path)?;
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.display().to_string(),
        source,
    })?;
    Ok(SourceEntry {
        path: key,
        origin: path.to_path_buf(),
        bytes,
    })
}

/// Slash-separated key for `path` relative to `root`.
fn bundle_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if relative.as_os_str().is_empty() {
        return path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_owned)
            .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()));
    }

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(
                part.to_str()
                    .ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?,
            ),
            Component::CurDir => {}
            _ => return Err(Error::UnsupportedPath(path.display().to_string())),
        }
    }
    Ok(parts.join("/"))
}
