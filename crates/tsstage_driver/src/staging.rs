//! The scratch directory the compiler works in.
//!
//! The staging tree mirrors the relative paths of every tracked file. It is
//! emptied and rebuilt in full on every compiling cycle, never patched, so
//! it never holds files left over from an earlier cycle.

use std::fs;
use std::path::{Path, PathBuf};

use tsstage_common::{FileSource, StagingLayout, TrackedFile};

use crate::error::DriverError;

/// Owner of the scratch root and everything beneath it.
#[derive(Debug)]
pub struct StagingDir {
    layout: StagingLayout,
    ready: bool,
}

impl StagingDir {
    /// Manages the tree described by `layout`. Nothing is created yet.
    pub fn new(layout: StagingLayout) -> Self {
        Self {
            layout,
            ready: false,
        }
    }

    /// The path mapping for this tree.
    pub fn layout(&self) -> &StagingLayout {
        &self.layout
    }

    /// The scratch root.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Ensures the scratch root exists.
    ///
    /// Cheap after the first call unless the root was removed from outside.
    pub fn setup(&mut self) -> Result<(), DriverError> {
        if self.ready && self.root().is_dir() {
            return Ok(());
        }
        fs::create_dir_all(self.root()).map_err(|source| staging_err(self.root(), source))?;
        self.ready = true;
        Ok(())
    }

    /// Removes everything under the scratch root, keeping the root itself.
    pub fn clear(&self) -> Result<(), DriverError> {
        let root = self.root();
        if !root.exists() {
            return Ok(());
        }
        tracing::debug!("clearing out temporary build directory {}", root.display());

        let entries = fs::read_dir(root).map_err(|source| staging_err(root, source))?;
        for entry in entries {
            let entry = entry.map_err(|source| staging_err(root, source))?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|source| staging_err(&path, source))?;
            let removed = if file_type.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|source| staging_err(&path, source))?;
        }
        Ok(())
    }

    /// Writes every tracked file into the tree at its relative path.
    ///
    /// Pages are written from memory; static files are byte-copied.
    pub fn populate(&self, files: &[TrackedFile]) -> Result<(), DriverError> {
        for file in files {
            let dest = self.layout.staged_path(file.relative_path());
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|source| staging_err(parent, source))?;
            }
            match file.source() {
                FileSource::Page { content } => {
                    fs::write(&dest, content).map_err(|source| staging_err(&dest, source))?;
                }
                FileSource::Static { source_path } => {
                    fs::copy(source_path, &dest).map_err(|source| staging_err(source_path, source))?;
                }
            }
        }
        tracing::debug!("staged {} files in {}", files.len(), self.root().display());
        Ok(())
    }

    /// Clears the tree and writes the given files, in that order.
    pub fn rebuild(&mut self, files: &[TrackedFile]) -> Result<(), DriverError> {
        self.setup()?;
        self.clear()?;
        self.populate(files)
    }

    /// Deletes the scratch root entirely.
    pub fn remove(&mut self) -> Result<(), DriverError> {
        self.ready = false;
        match fs::remove_dir_all(self.root()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(staging_err(self.root(), source)),
        }
    }
}

fn staging_err(path: &Path, source: std::io::Error) -> DriverError {
    DriverError::Staging {
        path: PathBuf::from(path),
        source,
    }
}
