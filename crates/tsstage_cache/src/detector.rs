//! The change detector deciding whether a build cycle may skip compilation.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tsstage_common::{ContentHash, StagingLayout, TrackedFile};
use tsstage_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::error::CacheError;
use crate::hasher::SourceHasher;

/// Why a cycle cannot reuse the previous compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// Caching is turned off.
    Disabled,
    /// No compilation has succeeded yet.
    Empty,
    /// The scratch root is gone, so previous output is too.
    MissingRoot,
    /// Files were added or removed since the last compilation.
    CountChanged {
        /// Number of entries in the cache.
        cached: usize,
        /// Number of files tracked this cycle.
        current: usize,
    },
    /// A file has no cache entry.
    Untracked(PathBuf),
    /// A file's staged artifact no longer exists.
    MissingArtifact(PathBuf),
    /// A file's content changed.
    Modified(PathBuf),
    /// A file could not be read to compare its content.
    Unreadable(PathBuf),
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::Disabled => write!(f, "cache disabled"),
            StaleReason::Empty => write!(f, "no previous compilation"),
            StaleReason::MissingRoot => write!(f, "scratch directory missing"),
            StaleReason::CountChanged { cached, current } => {
                write!(f, "file count changed from {cached} to {current}")
            }
            StaleReason::Untracked(p) => write!(f, "new file {}", p.display()),
            StaleReason::MissingArtifact(p) => write!(f, "missing artifact {}", p.display()),
            StaleReason::Modified(p) => write!(f, "modified {}", p.display()),
            StaleReason::Unreadable(p) => write!(f, "unreadable {}", p.display()),
        }
    }
}

/// Per-path content hashes from the last successful compilation.
///
/// The map is replaced wholesale by [`refresh`](Self::refresh) and only read
/// by [`needs_recompile`](Self::needs_recompile). A disabled detector always
/// reports a change and never records anything.
#[derive(Debug)]
pub struct ChangeDetector {
    enabled: bool,
    entries: HashMap<PathBuf, ContentHash>,
}

impl ChangeDetector {
    /// Creates an empty detector.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: HashMap::new(),
        }
    }

    /// Returns `true` if the detector may allow cycles to be skipped.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cached hash for a relative path.
    pub fn get(&self, relative: &Path) -> Option<&ContentHash> {
        self.entries.get(relative)
    }

    /// Forgets every entry, forcing the next cycle to compile.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    /// Returns `true` if the tracked files must be staged and compiled again.
    pub fn needs_recompile(
        &self,
        files: &[TrackedFile],
        layout: &StagingLayout,
        sink: &DiagnosticSink,
    ) -> bool {
        match self.stale_reason(files, layout, sink) {
            Some(reason) => {
                tracing::debug!("recompiling: {reason}");
                true
            }
            None => false,
        }
    }

    /// Returns the first reason the previous compilation cannot be reused.
    ///
    /// Checks run in order: disabled, empty cache, missing scratch root,
    /// changed file count, then per file: no entry, missing artifact,
    /// changed hash.
    pub fn stale_reason(
        &self,
        files: &[TrackedFile],
        layout: &StagingLayout,
        sink: &DiagnosticSink,
    ) -> Option<StaleReason> {
        if !self.enabled {
            return Some(StaleReason::Disabled);
        }
        if self.entries.is_empty() {
            return Some(StaleReason::Empty);
        }
        if !layout.root().is_dir() {
            return Some(StaleReason::MissingRoot);
        }
        if self.entries.len() != files.len() {
            return Some(StaleReason::CountChanged {
                cached: self.entries.len(),
                current: files.len(),
            });
        }

        for file in files {
            let relative = file.relative_path();
            let Some(cached) = self.entries.get(relative) else {
                return Some(StaleReason::Untracked(relative.to_path_buf()));
            };
            if !layout.artifact_path(file).exists() {
                return Some(StaleReason::MissingArtifact(relative.to_path_buf()));
            }
            match SourceHasher::hash_file(file) {
                Ok(hash) if hash == *cached => {}
                Ok(hash) => {
                    tracing::trace!("{}: {cached} -> {hash}", relative.display());
                    return Some(StaleReason::Modified(relative.to_path_buf()));
                }
                Err(e) => {
                    sink.emit(
                        Diagnostic::warning(
                            DiagnosticCode::UNREADABLE_SOURCE,
                            format!("could not read {} to check for changes", relative.display()),
                        )
                        .with_path(relative)
                        .with_note(e.to_string()),
                    );
                    return Some(StaleReason::Unreadable(relative.to_path_buf()));
                }
            }
        }

        None
    }

    /// Replaces the cache with hashes of exactly the given files.
    ///
    /// Entries for files no longer tracked do not survive. On error the
    /// previous map is left untouched. Does nothing when disabled.
    pub fn refresh(&mut self, files: &[TrackedFile]) -> Result<(), CacheError> {
        if !self.enabled {
            return Ok(());
        }
        self.entries = SourceHasher::hash_files(files)?;
        tracing::debug!("cached {} file hashes", self.entries.len());
        Ok(())
    }
}
