//! Shared pipeline helpers for CLI commands.
//!
//! Contains the pieces used by every command: resolving the site
//! directories, opening the orchestrator with the right settings file, and
//! rendering the diagnostics a build cycle left behind.

use std::path::{Path, PathBuf};

use tsstage_config::{load_settings, load_settings_from_path};
use tsstage_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use tsstage_driver::Orchestrator;

use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Resolved, absolute site directories.
#[derive(Debug, Clone)]
pub struct SiteDirs {
    /// The site source directory; also the project root.
    pub source: PathBuf,
    /// The directory the generated site is written to.
    pub dest: PathBuf,
}

impl SiteDirs {
    /// Resolves the directories named on the command line.
    ///
    /// The destination is created if it does not exist so both paths can be
    /// canonicalized and compared against walked entries.
    pub fn resolve(args: &BuildArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let source = resolve_source(&args.source)?;
        std::fs::create_dir_all(&args.dest)?;
        let dest = std::fs::canonicalize(&args.dest)?;
        Ok(Self { source, dest })
    }
}

/// Canonicalizes the site source directory, which must exist.
pub fn resolve_source(source: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = Path::new(source);
    if !path.is_dir() {
        return Err(format!("site source {} is not a directory", path.display()).into());
    }
    Ok(std::fs::canonicalize(path)?)
}

/// Creates the orchestrator for the site at `project_root`.
///
/// Settings come from `--config` when given, otherwise from
/// `<project_root>/tsstage.toml` if it exists.
pub fn open_project(
    project_root: &Path,
    global: &GlobalArgs,
) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    let settings = match global.config {
        Some(ref config_path) => load_settings_from_path(Path::new(config_path))?,
        None => load_settings(project_root)?,
    };
    tracing::debug!(
        "opened site {} (scratch directory {})",
        project_root.display(),
        settings.temp_dir.display()
    );
    Ok(Orchestrator::new(project_root, settings))
}

/// Drains the sink and prints its diagnostics.
///
/// Text goes to stderr, JSON to stdout. Warnings are hidden under
/// `--quiet`. Returns the number of diagnostics drained.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs, format: ReportFormat) -> usize {
    let diagnostics = sink.take_all();
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(global.color);
            for diag in &diagnostics {
                if global.quiet && !diag.severity.is_error() {
                    continue;
                }
                eprintln!("{}", renderer.render(diag));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&diagnostics).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
    diagnostics.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tsstage_diagnostics::{Diagnostic, DiagnosticCode};

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config,
        }
    }

    #[test]
    fn resolve_creates_dest() {
        let tmp = TempDir::new().unwrap();
        let args = BuildArgs {
            source: tmp.path().to_string_lossy().into_owned(),
            dest: tmp.path().join("out").to_string_lossy().into_owned(),
            format: ReportFormat::Text,
        };
        let dirs = SiteDirs::resolve(&args).unwrap();
        assert!(dirs.dest.is_dir());
        assert!(dirs.dest.is_absolute());
        assert!(dirs.dest.starts_with(&dirs.source));
    }

    #[test]
    fn missing_source_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(resolve_source(&missing.to_string_lossy()).is_err());
    }

    #[test]
    fn open_project_reads_site_settings() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("tsstage.toml"),
            "[typescript]\ntemp_dir = \"build/tmp\"\n",
        )
        .unwrap();
        let orch = open_project(tmp.path(), &global(None)).unwrap();
        assert_eq!(orch.layout().root(), tmp.path().join("build/tmp"));
    }

    #[test]
    fn open_project_prefers_explicit_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("tsstage.toml"),
            "[typescript]\ntemp_dir = \"ignored\"\n",
        )
        .unwrap();
        let custom = tmp.path().join("custom.toml");
        fs::write(&custom, "[typescript]\noutput_ext = \"mjs\"\n").unwrap();

        let orch = open_project(
            tmp.path(),
            &global(Some(custom.to_string_lossy().into_owned())),
        )
        .unwrap();
        assert_eq!(orch.layout().output_ext(), ".mjs");
        assert_eq!(orch.layout().root(), tmp.path().join(".typescript"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        assert!(open_project(
            tmp.path(),
            &global(Some(missing.to_string_lossy().into_owned()))
        )
        .is_err());
    }

    #[test]
    fn render_drains_sink() {
        let sink = DiagnosticSink::new();
        sink.emit(Diagnostic::warning(
            DiagnosticCode::MISSING_PROJECT_CONFIG,
            "no config file found",
        ));
        assert_eq!(render_diagnostics(&sink, &global(None), ReportFormat::Text), 1);
        assert!(sink.is_empty());
    }
}
