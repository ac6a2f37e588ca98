//! Non-fatal diagnostics reported back to the host pipeline.
//!
//! Conditions that must not fail a build (a missing project configuration,
//! an option the translator cannot express as a flag) are emitted as
//! [`Diagnostic`] values into a thread-safe [`DiagnosticSink`]. The host
//! drains the sink after each build cycle and renders it with a
//! [`DiagnosticRenderer`].

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
