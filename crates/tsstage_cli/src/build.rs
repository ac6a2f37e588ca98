//! `tsstage build`: one build cycle over the whole site.
//!
//! 1. Resolve the source and destination directories
//! 2. Open the orchestrator with the site's settings
//! 3. Read the site, skipping hidden entries, the destination and the
//!    scratch directory
//! 4. Offer every file to the orchestrator and finish the cycle
//! 5. Assign compiled output to its pages and write the site
//! 6. Render diagnostics

use std::path::Path;

use tsstage_diagnostics::{Diagnostic, DiagnosticCode};
use tsstage_driver::{CycleMode, DriverError, Orchestrator};

use crate::pipeline::{open_project, render_diagnostics, SiteDirs};
use crate::site::Site;
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// What a single build produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    /// Whether the compiler ran.
    pub mode: CycleMode,
    /// Pages that received compiled output.
    pub compiled: usize,
    /// Files written to the destination.
    pub written: usize,
}

/// Runs the `tsstage build` command.
///
/// Returns exit code 0 on success; any fatal error is propagated.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let dirs = SiteDirs::resolve(args)?;
    let mut orch = open_project(&dirs.source, global)?;

    let summary = build_once(&mut orch, &dirs, global, args.format)?;
    print_summary(&summary, global, args.format);
    Ok(0)
}

/// Runs one build cycle and writes the site.
///
/// Diagnostics are rendered even when the cycle fails, since warnings
/// emitted before the failure often explain it. A JSON report also carries
/// the failure itself as an `E001` error.
pub fn build_once(
    orch: &mut Orchestrator,
    dirs: &SiteDirs,
    global: &GlobalArgs,
    format: ReportFormat,
) -> Result<BuildSummary, Box<dyn std::error::Error>> {
    let result = run_cycle(orch, dirs);
    if let (Err(e), ReportFormat::Json) = (&result, format) {
        orch.sink().emit(failure_diagnostic(e.as_ref()));
    }
    render_diagnostics(orch.sink(), global, format);
    result
}

fn failure_diagnostic(err: &(dyn std::error::Error + 'static)) -> Diagnostic {
    match err.downcast_ref::<DriverError>() {
        Some(DriverError::Compilation { path, output }) => {
            Diagnostic::error(DiagnosticCode::BUILD_FAILED, "typescript failed to convert")
                .with_path(path)
                .with_note(output.clone())
        }
        _ => Diagnostic::error(DiagnosticCode::BUILD_FAILED, err.to_string()),
    }
}

fn run_cycle(
    orch: &mut Orchestrator,
    dirs: &SiteDirs,
) -> Result<BuildSummary, Box<dyn std::error::Error>> {
    let scratch = orch.layout().root().to_path_buf();
    let skip: [&Path; 2] = [&dirs.dest, &scratch];
    let mut site = Site::read(&dirs.source, &skip, orch.classifier())?;

    orch.begin_cycle();
    let mut tracked = 0;
    for file in site.files() {
        if orch.add_item(file.tracked())? {
            tracked += 1;
        }
    }
    tracing::debug!("tracking {} of {} site files", tracked, site.files().len());

    let outcome = orch.finish_cycle()?;
    let compiled = outcome.apply(site.files_mut());
    let written = site.write(&dirs.dest, orch.layout().output_ext())?;

    Ok(BuildSummary {
        mode: outcome.mode,
        compiled,
        written,
    })
}

/// Prints the one-line build summary to stderr.
pub fn print_summary(summary: &BuildSummary, global: &GlobalArgs, format: ReportFormat) {
    if global.quiet || format == ReportFormat::Json {
        return;
    }
    let how = match summary.mode {
        CycleMode::Compiled => "compiled",
        CycleMode::Skipped => "unchanged",
    };
    eprintln!(
        "    Finished {} file(s), {} script(s) {}",
        summary.written, summary.compiled, how
    );
}
