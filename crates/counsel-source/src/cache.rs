//! Per-process source cache
//!
//! Source files are assumed not to change while a test binary runs, so
//! each path is read once and shared. Entries are never refreshed
//! automatically; call [`SourceCache::invalidate`] or
//! [`SourceCache::clear`] when files do change.

use crate::error::{SourceError, SourceResult};
use crate::excerpt::{reconstruct_source, SourceExcerpt, Window};
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static GLOBAL: Lazy<SourceCache> = Lazy::new(SourceCache::new);

/// Source text keyed by the path it was requested under
#[derive(Debug, Default)]
pub struct SourceCache {
    files: DashMap<PathBuf, Arc<str>>,
}

impl SourceCache {
    /// Create empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: DashMap::new(),
        }
    }

    /// Process-wide cache used by [`reconstruct`]
    #[inline]
    #[must_use]
    pub fn global() -> &'static SourceCache {
        &GLOBAL
    }

    /// Get source text, reading it on first use
    ///
    /// # Errors
    /// Returns error if the file cannot be read
    pub fn source(&self, path: &Path) -> SourceResult<Arc<str>> {
        if let Some(hit) = self.files.get(path) {
            tracing::trace!(path = %path.display(), "source cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        let resolved = resolve_path(path);
        tracing::trace!(path = %resolved.display(), "source cache miss");
        let text: Arc<str> = fs::read_to_string(&resolved)
            .map_err(|e| SourceError::io_error(&resolved, e))?
            .into();

        self.files.insert(path.to_path_buf(), Arc::clone(&text));
        Ok(text)
    }

    /// Rebuild the statement containing `line` of the file at `path`
    ///
    /// # Errors
    /// Returns error if the file cannot be read or the statement cannot be
    /// located
    pub fn reconstruct(
        &self,
        path: &Path,
        line: usize,
        window: Window,
    ) -> SourceResult<SourceExcerpt> {
        let text = self.source(path)?;
        reconstruct_source(&text, line, window)
    }

    /// Drop one cached file
    #[inline]
    pub fn invalidate(&self, path: &Path) -> bool {
        self.files.remove(path).is_some()
    }

    /// Drop every cached file
    #[inline]
    pub fn clear(&self) {
        self.files.clear();
    }

    /// Check if `path` is cached
    #[inline]
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    /// Number of cached files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Rebuild a statement through the process-wide cache
///
/// # Errors
/// See [`SourceCache::reconstruct`]
pub fn reconstruct(path: &Path, line: usize, window: Window) -> SourceResult<SourceExcerpt> {
    SourceCache::global().reconstruct(path, line, window)
}

/// Locate a source path on disk
///
/// rustc records workspace-relative paths while cargo runs tests from the
/// package directory, so relative paths are tried against the manifest
/// directory, the current directory and their ancestors.
#[must_use]
pub fn resolve_path(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }

    let roots = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .into_iter()
        .chain(env::current_dir().ok());

    for root in roots {
        for dir in root.ancestors() {
            let candidate = dir.join(path);
            if candidate.exists() {
                return candidate;
            }
        }
    }

    path.to_path_buf()
}
