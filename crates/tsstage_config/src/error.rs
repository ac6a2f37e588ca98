//! Error types for configuration loading and translation.

use std::path::PathBuf;

/// Errors that can occur when loading settings or the project configuration.
///
/// A missing project configuration is not an error (it yields an empty flag
/// list and a diagnostic); a present but malformed one is.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The settings TOML could not be parsed.
    #[error("failed to parse settings: {0}")]
    SettingsParse(String),

    /// The project configuration is not valid JSON after comment stripping.
    #[error("invalid project configuration {path}: {reason}")]
    ProjectConfigParse {
        /// The project configuration file.
        path: PathBuf,
        /// The parser's description of the problem.
        reason: String,
    },

    /// The options entry of the project configuration is not a JSON object.
    #[error("`{key}` in {path} must be an object")]
    InvalidOptions {
        /// The project configuration file.
        path: PathBuf,
        /// The options key that was looked up.
        key: String,
    },

    /// A settings value failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_project_config_parse() {
        let err = ConfigError::ProjectConfigParse {
            path: PathBuf::from("tsconfig.json"),
            reason: "expected `,` at line 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid project configuration tsconfig.json: expected `,` at line 3"
        );
    }

    #[test]
    fn display_invalid_options() {
        let err = ConfigError::InvalidOptions {
            path: PathBuf::from("tsconfig.json"),
            key: "compilerOptions".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`compilerOptions` in tsconfig.json must be an object"
        );
    }

    #[test]
    fn display_io_error() {
        let err = ConfigError::Io {
            path: PathBuf::from("tsstage.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("failed to read tsstage.toml"));
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::Validation("`command` must not be empty".to_string());
        assert_eq!(err.to_string(), "validation error: `command` must not be empty");
    }
}
