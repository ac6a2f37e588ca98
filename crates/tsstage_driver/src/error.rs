//! Error types for the build-cycle driver.

use std::path::PathBuf;

use tsstage_cache::CacheError;
use tsstage_config::ConfigError;

use crate::orchestrator::CycleState;

/// Errors that abort a build cycle.
///
/// Every variant is fatal to the cycle it occurs in. Nothing is retried: a
/// failing compile needs a source fix, not another attempt.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The settings or project configuration are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The cache could not be refreshed after a successful compilation.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A filesystem operation on the staging tree failed.
    #[error("staging failed at {path}: {source}")]
    Staging {
        /// The path being created, written or removed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A tracked item's relative path would escape the staging root.
    #[error("tracked path {0} must be relative and stay inside the site")]
    InvalidPath(PathBuf),

    /// The compiler command is empty.
    #[error("compiler command is empty")]
    EmptyCommand,

    /// The compiler process could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// The program that was executed.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The compiler exited unsuccessfully for an item.
    #[error("typescript failed to convert: {path}\n{output}")]
    Compilation {
        /// The relative path of the item being compiled.
        path: PathBuf,
        /// Everything the compiler printed, verbatim.
        output: String,
    },

    /// A compiled output artifact that should exist could not be read.
    #[error("compiled output {path} could not be read: {source}")]
    MissingOutput {
        /// The expected output location under the staging root.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A lifecycle method was called out of order.
    #[error("build cycle is {actual}, expected {expected}")]
    InvalidState {
        /// The state the call requires.
        expected: CycleState,
        /// The state the orchestrator was in.
        actual: CycleState,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compilation_error_carries_path_and_output() {
        let err = DriverError::Compilation {
            path: PathBuf::from("js/app.ts"),
            output: "js/app.ts(3,1): error TS1005: ';' expected.".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("typescript failed to convert: js/app.ts\n"));
        assert!(msg.ends_with("error TS1005: ';' expected."));
    }

    #[test]
    fn config_error_is_transparent() {
        let err: DriverError = ConfigError::Validation("bad".to_string()).into();
        assert_eq!(err.to_string(), "validation error: bad");
    }

    #[test]
    fn invalid_state_display() {
        let err = DriverError::InvalidState {
            expected: CycleState::Collecting,
            actual: CycleState::Idle,
        };
        assert_eq!(err.to_string(), "build cycle is idle, expected collecting");
    }
}
