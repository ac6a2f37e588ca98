//! Configuration for the tsstage orchestrator.
//!
//! Two inputs are handled here. The settings file (`tsstage.toml`) supplies
//! the extension sets, scratch directory, compiler command and cache switch,
//! each with a documented default. The project configuration file
//! (`tsconfig.json`, JSON with comments) is translated into command-line
//! flags, because the compiler ignores it when invoked on a single file.

#![warn(missing_docs)]

pub mod error;
pub mod jsonc;
pub mod loader;
pub mod tsconfig;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_settings, load_settings_from_path, load_settings_from_str, SETTINGS_FILE};
pub use tsconfig::{translate, ProjectConfig};
pub use types::{Settings, StringList};
