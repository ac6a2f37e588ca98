//! Translation of the project configuration into compiler flags.
//!
//! When the compiler is invoked on a single file it does not read the
//! project configuration at all, so its options are re-expressed on the
//! command line:
//!
//! | option value     | flags                          |
//! |------------------|--------------------------------|
//! | `true`           | `--option`                     |
//! | `false`          | nothing                        |
//! | `"text"`         | `--option text`                |
//! | `["a", "b"]`     | `--option a,b`                 |
//! | anything else    | nothing, plus a `W002` warning |
//!
//! Flags follow the key order of the file.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tsstage_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::error::ConfigError;
use crate::jsonc::strip_comments;

/// The project configuration file and the key holding its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    path: PathBuf,
    options_key: String,
}

impl ProjectConfig {
    /// Describes a project configuration at `path` with options under `options_key`.
    pub fn new(path: impl Into<PathBuf>, options_key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            options_key: options_key.into(),
        }
    }

    /// The configuration file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file and translates its options into flags.
    ///
    /// A missing file emits a `W001` warning and yields no flags. A file that
    /// exists but cannot be read or parsed is an error.
    pub fn load_flags(&self, sink: &DiagnosticSink) -> Result<Vec<String>, ConfigError> {
        if !self.path.exists() {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::MISSING_PROJECT_CONFIG,
                    format!("no config file found at {}", self.path.display()),
                )
                .with_path(&self.path)
                .with_note("compiling with the compiler's default options"),
            );
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        self.parse_flags(&content, sink)
    }

    /// Translates already-read configuration text into flags.
    pub fn parse_flags(
        &self,
        content: &str,
        sink: &DiagnosticSink,
    ) -> Result<Vec<String>, ConfigError> {
        let json: Value = serde_json::from_str(&strip_comments(content)).map_err(|e| {
            ConfigError::ProjectConfigParse {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        match json.get(&self.options_key) {
            None => {
                tracing::debug!(
                    "{} has no `{}` entry",
                    self.path.display(),
                    self.options_key
                );
                Ok(Vec::new())
            }
            Some(Value::Object(options)) => Ok(translate_options(options, Some(&self.path), sink)),
            Some(_) => Err(ConfigError::InvalidOptions {
                path: self.path.clone(),
                key: self.options_key.clone(),
            }),
        }
    }
}

/// Translates an options object into an ordered flag list.
///
/// Options with unsupported value types are skipped with a `W002` warning;
/// the remaining options are still translated.
pub fn translate(options: &Map<String, Value>, sink: &DiagnosticSink) -> Vec<String> {
    translate_options(options, None, sink)
}

fn translate_options(
    options: &Map<String, Value>,
    origin: Option<&Path>,
    sink: &DiagnosticSink,
) -> Vec<String> {
    let mut args = Vec::new();
    for (option, value) in options {
        push_option(&mut args, option, value, origin, sink);
    }
    args
}

fn push_option(
    args: &mut Vec<String>,
    option: &str,
    value: &Value,
    origin: Option<&Path>,
    sink: &DiagnosticSink,
) {
    let flag = format!("--{option}");
    match value {
        Value::Bool(true) => args.push(flag),
        Value::Bool(false) => {}
        Value::String(s) => {
            args.push(flag);
            args.push(s.clone());
        }
        Value::Array(items) => {
            args.push(flag);
            args.push(join_items(items));
        }
        other => {
            let mut diag = Diagnostic::warning(
                DiagnosticCode::UNSUPPORTED_OPTION,
                format!(
                    "unknown option type for {option} of type {}",
                    type_name(other)
                ),
            )
            .with_help("only boolean, string and list options are passed to the compiler");
            if let Some(path) = origin {
                diag = diag.with_path(path);
            }
            sink.emit(diag);
        }
    }
}

fn join_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
