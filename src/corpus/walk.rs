use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A document file found under the corpus root.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    /// Cache key: path relative to the root, `/`-separated.
    pub relative_path: String,
    pub path: PathBuf,
}

/// Walk the corpus root and list every markdown/YAML file, in file-name order.
///
/// Hidden directories are pruned. An unreadable root or subtree is logged and
/// skipped, so a missing root simply yields an empty list.
pub fn walk_document_files(root: &Path) -> Vec<DocumentFile> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden_dir(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable corpus entry under {}: {e}", root.display());
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_document_file(entry.path()) {
            continue;
        }

        let path = entry.path();
        let relative_path = relative_key(path.strip_prefix(root).unwrap_or(path));

        files.push(DocumentFile {
            relative_path,
            path: path.to_path_buf(),
        });
    }

    files
}

/// Build the `/`-separated cache key for a path relative to the root.
pub fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_hidden_dir(entry: &walkdir::DirEntry) -> bool {
    // The root is walked even when it is itself a dot-directory.
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

pub(crate) fn is_document_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    matches!(ext.as_str(), "md" | "yaml" | "yml")
}
