//! `tsstage watch`: rebuild the site on an interval.
//!
//! The orchestrator lives for the whole process, so its in-memory cache
//! carries across builds and unchanged cycles never start the compiler.
//! The first fatal error stops the loop.

use std::thread;
use std::time::Duration;

use crate::build::{build_once, print_summary};
use crate::pipeline::{open_project, SiteDirs};
use crate::{GlobalArgs, WatchArgs};

/// Runs the `tsstage watch` command.
pub fn run(args: &WatchArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let dirs = SiteDirs::resolve(&args.build)?;
    let mut orch = open_project(&dirs.source, global)?;
    let interval = Duration::from_millis(args.interval_ms);

    if !global.quiet {
        eprintln!(
            "    Watching {} (every {}ms)",
            dirs.source.display(),
            args.interval_ms
        );
    }

    let mut builds = 0;
    loop {
        let summary = build_once(&mut orch, &dirs, global, args.build.format)?;
        builds += 1;
        print_summary(&summary, global, args.build.format);

        if args.cycles.is_some_and(|limit| builds >= limit) {
            return Ok(0);
        }
        thread::sleep(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuildArgs, ReportFormat};
    use std::fs;
    use tempfile::TempDir;

    fn watch_args(tmp: &TempDir, cycles: usize) -> WatchArgs {
        WatchArgs {
            build: BuildArgs {
                source: tmp.path().join("site").to_string_lossy().into_owned(),
                dest: tmp.path().join("out").to_string_lossy().into_owned(),
                format: ReportFormat::Text,
            },
            interval_ms: 1,
            cycles: Some(cycles),
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
    fn stops_after_requested_cycles() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("site")).unwrap();
        fs::write(tmp.path().join("site/index.html"), "hi").unwrap();

        assert_eq!(run(&watch_args(&tmp, 3), &global()).unwrap(), 0);
        assert_eq!(
            fs::read_to_string(tmp.path().join("out/index.html")).unwrap(),
            "hi"
        );
    }

    #[test]
    fn fatal_error_stops_the_loop() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        fs::create_dir_all(&site).unwrap();
        fs::write(site.join("tsconfig.json"), "{ broken").unwrap();
        fs::write(site.join("app.ts"), "let a;").unwrap();

        assert!(run(&watch_args(&tmp, 100), &global()).is_err());
    }
}
