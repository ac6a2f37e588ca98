//! Content hashing of tracked files.

use std::collections::HashMap;
use std::path::PathBuf;

use tsstage_common::{ContentHash, FileSource, TrackedFile};

use crate::error::CacheError;

/// Computes content hashes over the bytes the compiler will consume.
pub struct SourceHasher;

impl SourceHasher {
    /// Hashes a single tracked file.
    ///
    /// Pages hash their in-memory content; static files are read from disk.
    pub fn hash_file(file: &TrackedFile) -> Result<ContentHash, CacheError> {
        let content = file.read_content().map_err(|source| CacheError::Io {
            path: match file.source() {
                FileSource::Static { source_path } => source_path.clone(),
                FileSource::Page { .. } => file.relative_path().to_path_buf(),
            },
            source,
        })?;
        Ok(ContentHash::from_bytes(&content))
    }

    /// Hashes every file, keyed by relative path.
    ///
    /// Fails on the first file that cannot be read.
    pub fn hash_files(files: &[TrackedFile]) -> Result<HashMap<PathBuf, ContentHash>, CacheError> {
        let mut hashes = HashMap::with_capacity(files.len());
        for file in files {
            hashes.insert(file.relative_path().to_path_buf(), Self::hash_file(file)?);
        }
        Ok(hashes)
    }
}
