//! Compiler invocation.
//!
//! The argument vector is always:
//!
//! ```text
//! <command...> --pretty --rootDir <scratch root> <translated flags...> <input>
//! ```
//!
//! The compiler runs synchronously, one file at a time. There is no timeout:
//! a compiler that never exits blocks the build.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::error::DriverError;

/// A compiler command line, complete except for the input file.
#[derive(Debug, Clone)]
pub struct CompileCommand {
    program: String,
    args: Vec<OsString>,
}

/// What a compiler run produced.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The exit status of the compiler process.
    pub status: ExitStatus,
    /// Standard output followed by standard error, minus one final line break.
    pub text: String,
}

impl CompileOutput {
    /// Returns `true` if the compiler exited with status zero.
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

impl CompileCommand {
    /// Builds the fixed part of the command line.
    ///
    /// `command` is the configured program followed by any of its own
    /// arguments; `root` is the scratch root passed as `--rootDir`.
    pub fn new(command: &[String], root: &Path, flags: &[String]) -> Result<Self, DriverError> {
        let (program, base) = command.split_first().ok_or(DriverError::EmptyCommand)?;
        if program.trim().is_empty() {
            return Err(DriverError::EmptyCommand);
        }

        let mut args: Vec<OsString> = base.iter().map(OsString::from).collect();
        args.push("--pretty".into());
        args.push("--rootDir".into());
        args.push(root.as_os_str().to_os_string());
        args.extend(flags.iter().map(OsString::from));

        Ok(Self {
            program: program.clone(),
            args,
        })
    }

    /// The program to execute.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The full argument vector (excluding the program) for one input.
    pub fn args_for(&self, input: &Path) -> Vec<OsString> {
        let mut args = self.args.clone();
        args.push(input.as_os_str().to_os_string());
        args
    }

    /// Runs the compiler on `input` and waits for it to exit.
    ///
    /// A non-zero exit is reported through [`CompileOutput::success`], not
    /// as an error; only failing to start the process is an error.
    pub fn run(&self, input: &Path) -> Result<CompileOutput, DriverError> {
        let args = self.args_for(input);
        tracing::debug!(
            "running compile command: {} {}",
            self.program,
            shell_join(&args)
        );

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| DriverError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        chomp(&mut text);

        Ok(CompileOutput {
            status: output.status,
            text,
        })
    }
}

/// Removes a single trailing `\n` or `\r\n`.
fn chomp(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}

/// Joins arguments for display, single-quoting any that need it.
fn shell_join(args: &[OsString]) -> String {
    args.iter()
        .map(|arg| {
            let arg = arg.to_string_lossy();
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./,=:@%+".contains(c));
            if plain {
                arg.into_owned()
            } else {
                format!("'{}'", arg.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn argument_order() {
        let cmd = CompileCommand::new(
            &strings(&["npx", "tsc"]),
            Path::new("/site/.typescript"),
            &strings(&["--strict", "--lib", "dom,es2015"]),
        )
        .unwrap();

        assert_eq!(cmd.program(), "npx");
        let args: Vec<String> = cmd
            .args_for(Path::new("/site/.typescript/js/app.ts"))
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();
        assert_eq!(
            args,
            vec![
                "tsc",
                "--pretty",
                "--rootDir",
                "/site/.typescript",
                "--strict",
                "--lib",
                "dom,es2015",
                "/site/.typescript/js/app.ts",
            ]
        );
    }

    #[test]
    fn empty_command_errors() {
        let err = CompileCommand::new(&[], Path::new("."), &[]).unwrap_err();
        assert!(matches!(err, DriverError::EmptyCommand));
        let err = CompileCommand::new(&strings(&[" "]), Path::new("."), &[]).unwrap_err();
        assert!(matches!(err, DriverError::EmptyCommand));
    }

    #[test]
    fn shell_join_quotes_when_needed() {
        let args: Vec<OsString> = ["--rootDir", "my dir", "it's", ""]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(shell_join(&args), r"--rootDir 'my dir' 'it'\''s' ''");
    }

    #[test]
    fn chomp_removes_one_line_break() {
        let mut text = "a.ts(1,1): error\n\n   \n".to_string();
        chomp(&mut text);
        assert_eq!(text, "a.ts(1,1): error\n\n   ");

        let mut text = "done\r\n".to_string();
        chomp(&mut text);
        assert_eq!(text, "done");

        let mut text = "no break ".to_string();
        chomp(&mut text);
        assert_eq!(text, "no break ");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let cmd = CompileCommand::new(
            &strings(&["tsstage-no-such-compiler"]),
            Path::new("."),
            &[],
        )
        .unwrap();
        let err = cmd.run(Path::new("a.ts")).unwrap_err();
        assert!(matches!(err, DriverError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_then_stderr_and_status() {
        let cmd = CompileCommand::new(
            &strings(&["sh", "-c", "echo out; echo err >&2; exit 3", "fakec"]),
            Path::new("."),
            &[],
        )
        .unwrap();
        let output = cmd.run(Path::new("a.ts")).unwrap();
        assert!(!output.success());
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.text, "out\nerr");
    }

    #[cfg(unix)]
    #[test]
    fn input_is_last_argument() {
        let cmd = CompileCommand::new(
            &strings(&["sh", "-c", "for last; do :; done; printf '%s' \"$last\"", "fakec"]),
            Path::new("/scratch"),
            &strings(&["--strict"]),
        )
        .unwrap();
        let output = cmd.run(Path::new("/scratch/x.ts")).unwrap();
        assert!(output.success());
        assert_eq!(output.text, "/scratch/x.ts");
    }

    #[cfg(unix)]
    #[test]
    fn output_keeps_inner_blank_lines_and_spaces() {
        let cmd = CompileCommand::new(
            &strings(&["sh", "-c", "printf 'a.ts(1,1): error\\n\\n   \\n'", "fakec"]),
            Path::new("."),
            &[],
        )
        .unwrap();
        let output = cmd.run(Path::new("a.ts")).unwrap();
        assert_eq!(output.text, "a.ts(1,1): error\n\n   ");
    }
}
