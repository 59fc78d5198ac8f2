//! Document resolution: cited document names → local PDF files.

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use docquery_core::{CoreError, Reference, ResolvedDocument};

use crate::error::Result;

/// A read-only local tree of source PDF documents.
///
/// Resolution policy, first hit wins, over a full recursive walk:
///
/// 1. normalize the cited name — trim, append `.pdf` unless it already ends
///    with it (case-insensitive, never double-appended);
/// 2. case-insensitive filename equality against the normalized name;
/// 3. partial fallback — the normalized name minus `.pdf` as a
///    case-insensitive literal substring of the candidate filename.
///
/// The walk order is the platform's directory traversal order, so a corpus
/// where two files both satisfy the partial test resolves
/// non-deterministically. Known limitation, kept deliberately: this is a
/// first-match policy, not a ranked best-match.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Open a document store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidStoreRoot`] (via [`RagError::Core`](crate::RagError::Core))
    /// if the root does not exist or is not a directory. This is the one
    /// fail-fast environment check; per-query misses are never errors.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CoreError::InvalidStoreRoot(root).into());
        }
        Ok(Self { root })
    }

    /// The store root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a cited document name to a file in the store.
    ///
    /// Returns `None` when nothing in the tree matches — a normal outcome.
    pub fn resolve(&self, document_name: &str) -> Option<PathBuf> {
        let normalized = normalize_name(document_name);
        let normalized_lower = normalized.to_lowercase();
        let stem_lower = normalized_lower.trim_end_matches(".pdf").to_string();

        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let Some(file_name) = entry.file_name().to_str() else { continue };
            let file_lower = file_name.to_lowercase();
            if !file_lower.ends_with(".pdf") {
                continue;
            }

            if file_lower == normalized_lower || file_lower.contains(&stem_lower) {
                debug!(document_name, path = %entry.path().display(), "resolved document");
                return Some(entry.into_path());
            }
        }

        debug!(document_name, "no matching file in store");
        None
    }

    /// Resolve one reference, attaching the matched path and file size.
    ///
    /// Unreadable file metadata degrades to `size_bytes: None` rather than
    /// failing the resolution.
    pub fn resolve_reference(&self, reference: &Reference) -> ResolvedDocument {
        let path = self.resolve(&reference.document_name);
        let size_bytes = path.as_deref().and_then(|p| p.metadata().ok()).map(|m| m.len());
        ResolvedDocument { reference: reference.clone(), path, size_bytes }
    }

    /// Resolve every reference in a result set.
    ///
    /// Per-reference misses do not fail the set; unresolved entries carry
    /// `path: None`.
    pub fn resolve_all(&self, references: &[Reference]) -> Vec<ResolvedDocument> {
        references.iter().map(|r| self.resolve_reference(r)).collect()
    }
}

/// Trim the cited name and ensure a single `.pdf` suffix.
fn normalize_name(document_name: &str) -> String {
    let trimmed = document_name.trim();
    if trimmed.to_lowercase().ends_with(".pdf") {
        trimmed.to_string()
    } else {
        format!("{trimmed}.pdf")
    }
}
