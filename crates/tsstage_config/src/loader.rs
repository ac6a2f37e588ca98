//! Settings file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::{Settings, SettingsFile};

/// Name of the settings file looked up in the project directory.
pub const SETTINGS_FILE: &str = "tsstage.toml";

/// Loads settings from `<project_dir>/tsstage.toml`.
///
/// A missing file is not an error: the defaults apply.
pub fn load_settings(project_dir: &Path) -> Result<Settings, ConfigError> {
    let path = project_dir.join(SETTINGS_FILE);
    if !path.exists() {
        tracing::debug!("no {} in {}, using defaults", SETTINGS_FILE, project_dir.display());
        return Ok(Settings::default());
    }
    load_settings_from_path(&path)
}

/// Loads settings from an explicit file path, which must exist.
pub fn load_settings_from_path(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_settings_from_str(&content)
}

/// Parses and validates settings from a TOML string.
pub fn load_settings_from_str(content: &str) -> Result<Settings, ConfigError> {
    let file: SettingsFile =
        toml::from_str(content).map_err(|e| ConfigError::SettingsParse(e.to_string()))?;
    validate_settings(&file.typescript)?;
    Ok(file.typescript)
}

fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.command.iter().all(|part| part.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "`command` must name a program".to_string(),
        ));
    }
    if settings.normalized_output_ext().is_empty() {
        return Err(ConfigError::Validation(
            "`output_ext` must not be empty".to_string(),
        ));
    }
    if settings.temp_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "`temp_dir` must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = load_settings_from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn other_tables_are_ignored() {
        let settings = load_settings_from_str("[site]\ntitle = \"blog\"\n").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn parse_full_settings() {
        let toml = r#"
[typescript]
extensions = [".ts", ".mts"]
copy_ext = [".js", ".d.ts"]
temp_dir = "build/.ts-scratch"
command = ["npx", "tsc"]
cache = false
output_ext = "mjs"
project_config = "config/tsconfig.json"
options_key = "options"
"#;
        let s = load_settings_from_str(toml).unwrap();
        assert_eq!(&*s.extensions, &[".ts".to_string(), ".mts".to_string()]);
        assert_eq!(s.copy_ext.len(), 2);
        assert_eq!(s.temp_dir, PathBuf::from("build/.ts-scratch"));
        assert_eq!(&*s.command, &["npx".to_string(), "tsc".to_string()]);
        assert!(!s.cache);
        assert_eq!(s.normalized_output_ext(), ".mjs");
        assert_eq!(s.project_config, PathBuf::from("config/tsconfig.json"));
        assert_eq!(s.options_key, "options");
    }

    #[test]
    fn scalar_promoted_to_list() {
        let toml = r#"
[typescript]
extensions = ".ts"
command = "node_modules/.bin/tsc"
"#;
        let s = load_settings_from_str(toml).unwrap();
        assert_eq!(&*s.extensions, &[".ts".to_string()]);
        assert_eq!(&*s.command, &["node_modules/.bin/tsc".to_string()]);
    }

    #[test]
    fn partial_table_keeps_other_defaults() {
        let s = load_settings_from_str("[typescript]\ncache = false\n").unwrap();
        assert!(!s.cache);
        assert_eq!(s.temp_dir, PathBuf::from(".typescript"));
        assert_eq!(&*s.command, &["tsc".to_string()]);
    }

    #[test]
    fn empty_command_errors() {
        let err = load_settings_from_str("[typescript]\ncommand = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn empty_output_ext_errors() {
        let err = load_settings_from_str("[typescript]\noutput_ext = \".\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_settings_from_str("[typescript\ncache = ").unwrap_err();
        assert!(matches!(err, ConfigError::SettingsParse(_)));
    }

    #[test]
    fn wrong_type_errors() {
        let err = load_settings_from_str("[typescript]\ncache = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::SettingsParse(_)));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_settings(dir.path()).unwrap(), Settings::default());
    }

    #[test]
    fn loads_file_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "[typescript]\ntemp_dir = \".scratch\"\n",
        )
        .unwrap();
        let s = load_settings(dir.path()).unwrap();
        assert_eq!(s.temp_dir, PathBuf::from(".scratch"));
    }

    #[test]
    fn explicit_missing_path_errors() {
        let err = load_settings_from_path(Path::new("/nonexistent/tsstage.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
