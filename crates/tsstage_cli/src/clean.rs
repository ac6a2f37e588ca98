//! `tsstage clean`: remove the scratch directory.

use crate::pipeline::{open_project, resolve_source};
use crate::{GlobalArgs, ProjectArgs};

/// Runs the `tsstage clean` command.
pub fn run(args: &ProjectArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let source = resolve_source(&args.source)?;
    let mut orch = open_project(&source, global)?;
    let root = orch.layout().root().to_path_buf();

    orch.clean()?;
    if !global.quiet {
        eprintln!("     Removed {}", root.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn removes_configured_scratch_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("tsstage.toml"),
            "[typescript]\ntemp_dir = \"scratch\"\n",
        )
        .unwrap();
        fs::create_dir_all(tmp.path().join("scratch/js")).unwrap();
        fs::write(tmp.path().join("scratch/js/app.js"), "x").unwrap();

        let args = ProjectArgs {
            source: tmp.path().to_string_lossy().into_owned(),
        };
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
        assert!(!tmp.path().join("scratch").exists());
        assert!(tmp.path().join("tsstage.toml").exists());
    }
}
