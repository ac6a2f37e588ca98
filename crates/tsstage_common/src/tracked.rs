//! Tracked files: the host pipeline's view of a file that must be staged.
//!
//! A [`TrackedFile`] is a transient snapshot taken while the host renders a
//! build cycle. It is either a page whose content lives in memory, or a
//! static file that is byte-copied from its location on disk.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

/// Whether a tracked file goes through the compiler or is only staged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// Staged and compiled; its output is fed back to the host.
    Compile,
    /// Staged so the compiler can resolve it, never compiled itself.
    PassThrough,
}

/// Where a tracked file's content comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileSource {
    /// A page rendered by the host; its content is held in memory.
    Page {
        /// The raw page content, exactly as the compiler should see it.
        content: String,
    },
    /// A plain file copied verbatim from its source location.
    Static {
        /// Absolute (or host-relative) location of the original file.
        source_path: PathBuf,
    },
}

/// A file the orchestrator must stage for one build cycle.
///
/// The relative path is the stable identity key used by the change detector
/// and mirrored under the staging root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedFile {
    relative_path: PathBuf,
    source: FileSource,
    role: FileRole,
}

impl TrackedFile {
    /// Creates a tracked page with in-memory content.
    pub fn page(relative_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            source: FileSource::Page {
                content: content.into(),
            },
            role: FileRole::PassThrough,
        }
    }

    /// Creates a tracked static file copied from `source_path`.
    pub fn static_file(relative_path: impl Into<PathBuf>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
            source: FileSource::Static {
                source_path: source_path.into(),
            },
            role: FileRole::PassThrough,
        }
    }

    /// Returns this file under a different relative path.
    pub fn with_relative_path(mut self, relative_path: impl Into<PathBuf>) -> Self {
        self.relative_path = relative_path.into();
        self
    }

    /// Returns this file with its role replaced.
    pub fn with_role(mut self, role: FileRole) -> Self {
        self.role = role;
        self
    }

    /// The path relative to the site root.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Where the content comes from.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// The role assigned when the file was accepted for staging.
    pub fn role(&self) -> FileRole {
        self.role
    }

    /// Returns `true` if the file goes through the compiler.
    pub fn is_compilable(&self) -> bool {
        self.role == FileRole::Compile
    }

    /// The normalized extension (lowercase, leading dot), or `""` if none.
    pub fn extension(&self) -> String {
        self.relative_path
            .extension()
            .and_then(|e| e.to_str())
            .map(normalize_extension)
            .unwrap_or_default()
    }

    /// Reads the exact bytes the compiler will consume.
    ///
    /// Pages are borrowed from memory; static files are read from disk.
    pub fn read_content(&self) -> io::Result<Cow<'_, [u8]>> {
        match &self.source {
            FileSource::Page { content } => Ok(Cow::Borrowed(content.as_bytes())),
            FileSource::Static { source_path } => std::fs::read(source_path).map(Cow::Owned),
        }
    }
}

/// A host item that can receive compiled output.
pub trait OutputSlot {
    /// The item's path relative to the site root.
    fn relative_path(&self) -> &Path;

    /// Replaces the item's output content.
    fn assign_output(&mut self, output: String);
}

/// Normalizes an extension to lowercase with a single leading dot.
///
/// `"TS"`, `"ts"` and `".ts"` all become `".ts"`. An empty input stays empty.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return String::new();
    }
    format!(".{}", trimmed.to_ascii_lowercase())
}
