//! Settings types deserialized from the `[typescript]` table of `tsstage.toml`.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

use tsstage_common::normalize_extension;

/// The top-level settings file.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    /// Orchestrator settings; defaults apply when the table is absent.
    #[serde(default)]
    pub typescript: Settings,
}

/// Orchestrator settings.
///
/// Every field has a documented default so an absent file, an absent table
/// and an absent key all behave the same way.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Extensions of files passed through the compiler.
    pub extensions: StringList,
    /// Extensions of files that are staged but never compiled.
    pub copy_ext: StringList,
    /// Scratch directory, relative to the project root unless absolute.
    pub temp_dir: PathBuf,
    /// Compiler command; the first element is the program.
    pub command: StringList,
    /// Whether unchanged cycles may skip compilation.
    pub cache: bool,
    /// Extension given to compiled output.
    pub output_ext: String,
    /// Project configuration file, relative to the project root unless absolute.
    pub project_config: PathBuf,
    /// Key of the options object inside the project configuration.
    pub options_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extensions: StringList::from([".ts", ".tsx"]),
            copy_ext: StringList::default(),
            temp_dir: PathBuf::from(".typescript"),
            command: StringList::from(["tsc"]),
            cache: true,
            output_ext: ".js".to_string(),
            project_config: PathBuf::from("tsconfig.json"),
            options_key: "compilerOptions".to_string(),
        }
    }
}

impl Settings {
    /// Compilable extensions in normalized form.
    pub fn compilable_extensions(&self) -> BTreeSet<String> {
        normalized_set(&self.extensions)
    }

    /// Pass-through extensions in normalized form.
    pub fn copy_extensions(&self) -> BTreeSet<String> {
        normalized_set(&self.copy_ext)
    }

    /// The output extension in normalized form.
    pub fn normalized_output_ext(&self) -> String {
        normalize_extension(&self.output_ext)
    }
}

fn normalized_set(list: &StringList) -> BTreeSet<String> {
    list.iter()
        .map(|e| normalize_extension(e))
        .filter(|e| !e.is_empty())
        .collect()
}

/// A list of strings that may also be written as a single string.
///
/// `command = "tsc"` and `command = ["tsc"]` deserialize to the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct StringList(pub Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for StringList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(s) => Self(vec![s]),
            OneOrMany::Many(v) => Self(v),
        }
    }
}

impl<const N: usize> From<[&str; N]> for StringList {
    fn from(items: [&str; N]) -> Self {
        Self(items.iter().map(|s| s.to_string()).collect())
    }
}

impl std::ops::Deref for StringList {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
