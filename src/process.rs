//! External process invocation behind an injectable trait.
//!
//! The external converter is treated as an untrusted oracle: every call is
//! modeled as a pure function `(command, stdin) -> (exit code, stdout,
//! stderr)`, so tests substitute a fake runner instead of shelling out to a
//! real binary.

use std::io::{self, Write};
use std::process::{Command, Stdio};
use tracing::debug;

/// A single external command invocation: the full argv plus optional bytes
/// to stream to the child's standard input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

impl Invocation {
    /// Builds an invocation from an argv; the first element is the program.
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
            stdin: None,
        }
    }

    /// Attaches bytes to stream to the child's standard input.
    pub fn with_stdin(mut self, data: Vec<u8>) -> Self {
        self.stdin = Some(data);
        self
    }

    /// The full command line, for log and error messages.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

/// Captured result of a finished invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs external commands to completion and captures their output.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Runs the invocation, blocking until the child exits.
    ///
    /// `Err` means the child could not be spawned or its pipes broke;
    /// a child that ran and exited non-zero is an `Ok` with a non-zero
    /// exit code.
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
///
/// There is deliberately no timeout around the child: a hung converter
/// hangs the caller. This matches the synchronous, blocking execution
/// model of the engine.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        let (program, args) = invocation.command.split_first().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "empty command line")
        })?;

        debug!(command = %invocation.command_line(), "spawning external converter");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(if invocation.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn()?;

        if let Some(data) = &invocation.stdin {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(data)?;
                // Dropping the handle closes the pipe so the child sees EOF.
            }
        }

        let output = child.wait_with_output()?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_simple_command() {
        let runner = SystemRunner;
        let output = runner
            .run(&Invocation::new(["echo", "hello"]))
            .expect("echo should spawn");

        assert!(output.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
    }

    #[test]
    fn pipes_stdin_to_child() {
        let runner = SystemRunner;
        let output = runner
            .run(&Invocation::new(["cat"]).with_stdin(b"stream me".to_vec()))
            .expect("cat should spawn");

        assert!(output.success());
        assert_eq!(output.stdout, b"stream me");
    }

    #[test]
    fn nonzero_exit_is_ok_with_code() {
        let runner = SystemRunner;
        let output = runner
            .run(&Invocation::new(["false"]))
            .expect("false should spawn");

        assert!(!output.success());
        assert_eq!(output.exit_code, 1);
    }

    #[test]
    fn missing_binary_is_an_error() {
        let runner = SystemRunner;
        let result = runner.run(&Invocation::new(["definitely-not-a-real-binary-xyz"]));
        assert!(result.is_err());
    }

    #[test]
    fn empty_command_is_rejected() {
        let runner = SystemRunner;
        let result = runner.run(&Invocation::new(Vec::<String>::new()));
        assert_eq!(
            result.unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
    }

    #[test]
    fn command_line_joins_argv() {
        let invocation = Invocation::new(["inkscape", "/tmp/in.pdf", "--export-plain-svg=-"]);
        assert_eq!(
            invocation.command_line(),
            "inkscape /tmp/in.pdf --export-plain-svg=-"
        );
    }
}
