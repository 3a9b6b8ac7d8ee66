//! Corpus loader: walks the knowledge-base directory and memoizes documents by relative path.

pub mod title;
pub mod walk;

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::error::KbError;
use crate::models::Document;

/// Files whose trimmed content is shorter than this are placeholders.
const MIN_CONTENT_CHARS: usize = 10;

/// A document directory plus its in-memory cache.
///
/// The cache lives as long as the instance and is only emptied by
/// [`Corpus::clear_cache`]; edits on disk are not picked up until then.
pub struct Corpus {
    root: PathBuf,
    cache: RwLock<HashMap<String, Document>>,
}

impl Corpus {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every document under the root, in traversal order.
    ///
    /// Cached paths are not re-read. Never fails: unreadable files and a
    /// missing root only shrink the result.
    pub async fn load_all(&self) -> Vec<Document> {
        let root = self.root.clone();
        let files =
            match tokio::task::spawn_blocking(move || walk::walk_document_files(&root)).await {
                Ok(files) => files,
                Err(e) => {
                    tracing::warn!("Corpus walk of {} failed: {e}", self.root.display());
                    return Vec::new();
                }
            };

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            if let Some(doc) = self.cached(&file.relative_path) {
                documents.push(doc);
                continue;
            }
            if let Some(doc) = read_document(&file.path, file.relative_path).await {
                self.cache.write().insert(doc.path.clone(), doc.clone());
                documents.push(doc);
            }
        }

        tracing::debug!(
            "Loaded {} documents from {}",
            documents.len(),
            self.root.display()
        );
        documents
    }

    /// Load a single document by path relative to the root.
    ///
    /// Any path with a `..`, root or drive component, or one that resolves
    /// outside the root (e.g. through a symlink), is rejected with
    /// [`KbError::InvalidPath`] whether or not the target exists. A missing,
    /// unreadable or placeholder file is `Ok(None)`, and so is any file
    /// [`load_all`](Self::load_all) would not visit: a non-document extension
    /// or a path through a hidden directory.
    pub async fn load_document(&self, relative: &str) -> Result<Option<Document>, KbError> {
        let normalized = normalize_relative(relative)?;
        if !is_listed(&normalized) {
            tracing::debug!("Not serving {relative}: outside the document listing");
            return Ok(None);
        }
        let key = walk::relative_key(&normalized);

        if let Some(doc) = self.cached(&key) {
            return Ok(Some(doc));
        }

        let Ok(root) = tokio::fs::canonicalize(&self.root).await else {
            tracing::warn!("Corpus root {} is not accessible", self.root.display());
            return Ok(None);
        };
        let Ok(full) = tokio::fs::canonicalize(root.join(&normalized)).await else {
            return Ok(None);
        };
        if !full.starts_with(&root) {
            return Err(KbError::InvalidPath(relative.to_string()));
        }

        let Some(doc) = read_document(&full, key).await else {
            return Ok(None);
        };
        self.cache.write().insert(doc.path.clone(), doc.clone());
        Ok(Some(doc))
    }

    /// Drop every cached document. In-flight loads are unaffected.
    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    pub fn cached_count(&self) -> usize {
        self.cache.read().len()
    }

    fn cached(&self, key: &str) -> Option<Document> {
        self.cache.read().get(key).cloned()
    }
}

/// Lexically normalize a caller-supplied relative path, rejecting traversal.
fn normalize_relative(relative: &str) -> Result<PathBuf, KbError> {
    let mut normalized = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(KbError::InvalidPath(relative.to_string()));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(KbError::InvalidPath(relative.to_string()));
    }
    Ok(normalized)
}

/// Whether a normalized relative path is one the corpus walk would list.
fn is_listed(normalized: &Path) -> bool {
    let mut dirs = normalized.parent().into_iter().flat_map(Path::components);
    walk::is_document_file(normalized)
        && !dirs.any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

async fn read_document(path: &Path, relative_path: String) -> Option<Document> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Skipping unreadable document {}: {e}", path.display());
            return None;
        }
    };

    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        tracing::debug!("Skipping placeholder document {}", path.display());
        return None;
    }

    let title = title::extract_title(&content, path);
    Some(Document {
        path: relative_path,
        title,
        content,
    })
}
