//! Path mapping between relative source paths and the staging tree.

use std::path::{Path, PathBuf};

use crate::tracked::{FileRole, TrackedFile};

/// Maps relative source paths onto the scratch root.
///
/// Staged copies mirror the relative path exactly. Compiled output keeps the
/// directory structure but always replaces the final extension with the
/// configured output extension:
///
/// ```text
/// src/app/main.ts  ->  <root>/src/app/main.ts   (staged)
///                  ->  <root>/src/app/main.js   (output)
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagingLayout {
    root: PathBuf,
    output_ext: String,
}

impl StagingLayout {
    /// Creates a layout rooted at `root` producing files with `output_ext`.
    ///
    /// `output_ext` is expected in normalized form (e.g. `".js"`).
    pub fn new(root: impl Into<PathBuf>, output_ext: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            output_ext: output_ext.into(),
        }
    }

    /// The scratch root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The extension given to compiled output.
    pub fn output_ext(&self) -> &str {
        &self.output_ext
    }

    /// Where a file with the given relative path is staged.
    pub fn staged_path(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Where the compiler writes output for the given relative path.
    pub fn output_path(&self, relative: &Path) -> PathBuf {
        let stem = relative.file_stem().unwrap_or(relative.as_os_str());
        let mut name = stem.to_os_string();
        name.push(&self.output_ext);
        match relative.parent() {
            Some(parent) => self.root.join(parent).join(name),
            None => self.root.join(name),
        }
    }

    /// The artifact whose presence proves a file was handled last cycle.
    ///
    /// That is the compiled output for compilable files and the staged copy
    /// for pass-through files.
    pub fn artifact_path(&self, file: &TrackedFile) -> PathBuf {
        match file.role() {
            FileRole::Compile => self.output_path(file.relative_path()),
            FileRole::PassThrough => self.staged_path(file.relative_path()),
        }
    }
}
