//! In-process change detection between build cycles.
//!
//! The [`ChangeDetector`] remembers a content hash per tracked file from the
//! last successful compilation. When a new cycle tracks the same set of
//! files with the same content, and every previous artifact is still in the
//! staging tree, compilation can be skipped and the old output reused.
//!
//! The map lives only as long as the detector; nothing is written to disk.

#![warn(missing_docs)]

pub mod detector;
pub mod error;
pub mod hasher;

pub use detector::{ChangeDetector, StaleReason};
pub use error::CacheError;
pub use hasher::SourceHasher;
