//! Shared foundational types used across the tsstage workspace.
//!
//! This crate provides the content hash used for change detection, the
//! tracked-file data model handed over by the host pipeline, and the staging
//! layout that maps relative source paths to staged and compiled locations.

#![warn(missing_docs)]

pub mod hash;
pub mod layout;
pub mod tracked;

pub use hash::ContentHash;
pub use layout::StagingLayout;
pub use tracked::{normalize_extension, FileRole, FileSource, OutputSlot, TrackedFile};
