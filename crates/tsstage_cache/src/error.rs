//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur while refreshing the cache.
///
/// Change detection itself never fails: anything it cannot verify counts as
/// a change. Only [`refresh`](crate::ChangeDetector::refresh), which must
/// record a hash for every file, reports errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// A tracked file could not be read to compute its hash.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
