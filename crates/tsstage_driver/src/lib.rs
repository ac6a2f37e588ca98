//! Build-cycle driver: classification, staging and per-file compilation.
//!
//! The host pipeline owns an [`Orchestrator`] and calls it at three points
//! of every build cycle:
//!
//! 1. [`Orchestrator::begin_cycle`] before rendering starts,
//! 2. [`Orchestrator::add_item`] for each rendered item,
//! 3. [`Orchestrator::finish_cycle`] once rendering is complete.
//!
//! The last call either restores the previous compiled output from the
//! staging tree (when nothing changed) or rebuilds the tree and invokes the
//! compiler once per compilable file, failing fast on the first error.

#![warn(missing_docs)]

pub mod classifier;
pub mod compiler;
pub mod error;
pub mod orchestrator;
pub mod staging;

pub use classifier::FileClassifier;
pub use compiler::{CompileCommand, CompileOutput};
pub use error::DriverError;
pub use orchestrator::{CycleMode, CycleOutcome, CycleState, Orchestrator};
pub use staging::StagingDir;
