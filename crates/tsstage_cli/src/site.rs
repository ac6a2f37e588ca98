//! The site being built: every file under the source directory.
//!
//! Compilable files are read into memory as pages so the orchestrator can
//! replace their content with compiled output. Everything else is a static
//! file that is copied as-is; pass-through files are also offered to the
//! orchestrator so the compiler can resolve imports of them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tsstage_common::{OutputSlot, StagingLayout, TrackedFile};
use tsstage_driver::FileClassifier;

/// How a site file is published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteFileKind {
    /// Read into memory; may be replaced by compiled output.
    Page {
        /// The source text.
        content: String,
        /// Compiled output assigned after the build cycle.
        output: Option<String>,
    },
    /// Copied byte-for-byte.
    Static,
}

/// One file of the site.
#[derive(Debug, Clone)]
pub struct SiteFile {
    relative_path: PathBuf,
    source_path: PathBuf,
    kind: SiteFileKind,
}

impl SiteFile {
    /// The path relative to the site source.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// How the file is published.
    pub fn kind(&self) -> &SiteFileKind {
        &self.kind
    }

    /// The orchestrator's view of this file.
    pub fn tracked(&self) -> TrackedFile {
        match &self.kind {
            SiteFileKind::Page { content, .. } => {
                TrackedFile::page(&self.relative_path, content.clone())
            }
            SiteFileKind::Static => TrackedFile::static_file(&self.relative_path, &self.source_path),
        }
    }

    /// Where the file is written under `dest`.
    ///
    /// A page with compiled output takes the output extension, the same way
    /// the compiler names its output in the staging tree.
    pub fn destination(&self, dest: &Path, output_ext: &str) -> PathBuf {
        match &self.kind {
            SiteFileKind::Page {
                output: Some(_), ..
            } => StagingLayout::new(dest, output_ext).output_path(&self.relative_path),
            _ => dest.join(&self.relative_path),
        }
    }

    fn write(&self, dest: &Path, output_ext: &str) -> io::Result<()> {
        let target = self.destination(dest, output_ext);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        match &self.kind {
            SiteFileKind::Page { content, output } => {
                fs::write(&target, output.as_deref().unwrap_or(content))
            }
            SiteFileKind::Static => fs::copy(&self.source_path, &target).map(|_| ()),
        }
    }
}

impl OutputSlot for SiteFile {
    fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    fn assign_output(&mut self, compiled: String) {
        if let SiteFileKind::Page { output, .. } = &mut self.kind {
            *output = Some(compiled);
        }
    }
}

/// Every file of a site, sorted by relative path.
#[derive(Debug, Default)]
pub struct Site {
    files: Vec<SiteFile>,
}

impl Site {
    /// Walks `source`, skipping dot-prefixed entries and the `skip` paths.
    pub fn read(source: &Path, skip: &[&Path], classifier: &FileClassifier) -> io::Result<Self> {
        let mut files = Vec::new();
        walk(source, source, skip, classifier, &mut files)?;
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(Self { files })
    }

    /// The site's files.
    pub fn files(&self) -> &[SiteFile] {
        &self.files
    }

    /// Mutable access for assigning compiled output.
    pub fn files_mut(&mut self) -> &mut [SiteFile] {
        &mut self.files
    }

    /// Writes every file under `dest`. Returns the number written.
    pub fn write(&self, dest: &Path, output_ext: &str) -> io::Result<usize> {
        for file in &self.files {
            file.write(dest, output_ext)?;
        }
        Ok(self.files.len())
    }
}

fn walk(
    root: &Path,
    dir: &Path,
    skip: &[&Path],
    classifier: &FileClassifier,
    out: &mut Vec<SiteFile>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden || skip.iter().any(|s| *s == path.as_path()) {
            continue;
        }
        if entry.file_type()?.is_dir() {
            walk(root, &path, skip, classifier, out)?;
            continue;
        }

        let relative_path = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let kind = if classifier.is_compilable(&ext) {
            SiteFileKind::Page {
                content: fs::read_to_string(&path)?,
                output: None,
            }
        } else {
            SiteFileKind::Static
        };
        out.push(SiteFile {
            relative_path,
            source_path: path,
            kind,
        });
    }
    Ok(())
}
