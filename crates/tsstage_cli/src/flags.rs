//! `tsstage flags`: show what the project configuration translates to.

use crate::pipeline::{open_project, render_diagnostics, resolve_source};
use crate::{FlagsArgs, GlobalArgs, ReportFormat};

/// Runs the `tsstage flags` command.
///
/// Prints one flag per line, or a JSON array with `--format json`.
pub fn run(args: &FlagsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let source = resolve_source(&args.project.source)?;
    let orch = open_project(&source, global)?;

    let flags = orch.flags()?;
    render_diagnostics(orch.sink(), global, ReportFormat::Text);

    match args.format {
        ReportFormat::Text => {
            for flag in &flags {
                println!("{flag}");
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string(&flags)?),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectArgs;
    use std::fs;
    use tempfile::TempDir;

    fn args(tmp: &TempDir) -> FlagsArgs {
        FlagsArgs {
            project: ProjectArgs {
                source: tmp.path().to_string_lossy().into_owned(),
            },
            format: ReportFormat::Json,
        }
    }

    fn global() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    #[test]
    fn missing_project_config_is_not_fatal() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(run(&args(&tmp), &global()).unwrap(), 0);
    }

    #[test]
    fn malformed_project_config_is_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("tsconfig.json"), "{\"compilerOptions\": 5}").unwrap();
        let err = run(&args(&tmp), &global()).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }
}
