use crate::error::RegistrarError;
use crate::resolver::SOURCE_EXTENSION;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Controller source files under `dir`, in sorted pre-order.
///
/// Hidden entries are pruned, symlinks are neither followed nor returned, and
/// only `.rs` files are kept. Unreadable subdirectories are logged and
/// skipped; an unreadable `dir` itself is an error.
pub(crate) fn source_files(dir: &Path) -> Result<Vec<PathBuf>, RegistrarError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                return Err(RegistrarError::Directory {
                    path: dir.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(
                    directory = %dir.display(),
                    path = ?e.path(),
                    error = %e,
                    "Skipping unreadable entry"
                );
                continue;
            }
        };
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
