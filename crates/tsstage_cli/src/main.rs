//! tsstage CLI: a minimal site pipeline around the TypeScript orchestrator.
//!
//! Provides `tsstage build` for a one-shot site build, `tsstage watch` for
//! repeated builds that reuse the in-memory cache, `tsstage flags` to show
//! the translated compiler flags, and `tsstage clean` to remove the scratch
//! directory.

#![warn(missing_docs)]

mod build;
mod clean;
mod flags;
mod pipeline;
mod site;
mod watch;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Stage and compile TypeScript for a static site.
#[derive(Parser, Debug)]
#[command(name = "tsstage", version, about = "TypeScript staging for static sites")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `tsstage.toml` settings file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the site once.
    Build(BuildArgs),
    /// Rebuild the site repeatedly until interrupted.
    Watch(WatchArgs),
    /// Print the compiler flags translated from the project configuration.
    Flags(FlagsArgs),
    /// Remove the scratch directory.
    Clean(ProjectArgs),
}

/// Locates the site whose settings a command reads.
#[derive(Parser, Debug, Clone)]
pub struct ProjectArgs {
    /// Site source directory.
    #[arg(short, long, default_value = ".")]
    pub source: String,
}

/// Source and destination directories shared by `build` and `watch`.
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Site source directory.
    #[arg(short, long, default_value = ".")]
    pub source: String,

    /// Output directory for the generated site.
    #[arg(short, long, default_value = "_site")]
    pub dest: String,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `tsstage watch` subcommand.
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Directories and report format.
    #[command(flatten)]
    pub build: BuildArgs,

    /// Delay between builds, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Stop after this many builds.
    #[arg(long)]
    pub cycles: Option<usize>,
}

/// Arguments for the `tsstage flags` subcommand.
#[derive(Parser, Debug)]
pub struct FlagsArgs {
    /// Site whose project configuration is translated.
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Output format for the flag list.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom settings file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Watch(ref args) => watch::run(args, &global),
        Command::Flags(ref args) => flags::run(args, &global),
        Command::Clean(ref args) => clean::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` enables debug output for
/// the tsstage crates and everything else stays at warnings.
fn init_tracing(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(global.verbose)
        .with_ansi(global.color)
        .try_init();
}

fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.verbose {
        "warn,tsstage=debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    }
}
