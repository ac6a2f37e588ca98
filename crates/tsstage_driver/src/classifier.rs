//! Classification of tracked items by extension.

use std::collections::BTreeSet;

use tsstage_common::{normalize_extension, FileRole};
use tsstage_config::Settings;

/// Decides which files are compiled and which are only staged.
///
/// Both extension sets are fixed at construction; lookups normalize the
/// queried extension, so `".TS"`, `"ts"` and `".ts"` are equivalent.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    compilable: BTreeSet<String>,
    pass_through: BTreeSet<String>,
}

impl FileClassifier {
    /// Builds a classifier from explicit extension sets.
    pub fn new<I, J, S, T>(compilable: I, pass_through: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            compilable: normalize_all(compilable),
            pass_through: normalize_all(pass_through),
        }
    }

    /// Builds a classifier from the configured extension lists.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            compilable: settings.compilable_extensions(),
            pass_through: settings.copy_extensions(),
        }
    }

    /// Returns `true` if files with this extension go through the compiler.
    pub fn is_compilable(&self, ext: &str) -> bool {
        self.compilable.contains(&normalize_extension(ext))
    }

    /// Returns `true` if files with this extension must be staged.
    pub fn needs_staging(&self, ext: &str) -> bool {
        let ext = normalize_extension(ext);
        self.compilable.contains(&ext) || self.pass_through.contains(&ext)
    }

    /// The role of a file with this extension, or `None` if it is ignored.
    pub fn role(&self, ext: &str) -> Option<FileRole> {
        if self.is_compilable(ext) {
            Some(FileRole::Compile)
        } else if self.needs_staging(ext) {
            Some(FileRole::PassThrough)
        } else {
            None
        }
    }
}

fn normalize_all<I, S>(exts: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    exts.into_iter()
        .map(|e| normalize_extension(e.as_ref()))
        .filter(|e| !e.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FileClassifier {
        FileClassifier::new([".ts", ".tsx"], [".js", ".json"])
    }

    #[test]
    fn compilable_extensions() {
        let c = classifier();
        assert!(c.is_compilable(".ts"));
        assert!(c.is_compilable(".TSX"));
        assert!(c.is_compilable("ts"));
        assert!(!c.is_compilable(".js"));
        assert!(!c.is_compilable(".md"));
    }

    #[test]
    fn staging_covers_both_sets() {
        let c = classifier();
        assert!(c.needs_staging(".ts"));
        assert!(c.needs_staging(".JS"));
        assert!(c.needs_staging(".json"));
        assert!(!c.needs_staging(".css"));
        assert!(!c.needs_staging(""));
    }

    #[test]
    fn roles() {
        let c = classifier();
        assert_eq!(c.role(".tsx"), Some(FileRole::Compile));
        assert_eq!(c.role(".js"), Some(FileRole::PassThrough));
        assert_eq!(c.role(".html"), None);
    }

    #[test]
    fn compile_wins_over_pass_through() {
        let c = FileClassifier::new([".ts"], [".ts"]);
        assert_eq!(c.role(".ts"), Some(FileRole::Compile));
    }

    #[test]
    fn defaults_from_settings() {
        let c = FileClassifier::from_settings(&Settings::default());
        assert!(c.is_compilable(".ts"));
        assert!(c.is_compilable(".tsx"));
        assert!(!c.needs_staging(".js"));
    }
}
