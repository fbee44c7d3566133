//! Running a checker as a child process.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

use super::AdapterError;

/// What a finished checker process left behind.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the exit code is one of `expected`.
    pub fn exited_with(&self, expected: &[i32]) -> bool {
        self.exit_code.is_some_and(|code| expected.contains(&code))
    }

    /// Turn an unexpected exit into [`AdapterError::Crashed`].
    pub fn require_exit(self, tool: &'static str, expected: &[i32]) -> Result<Self, AdapterError> {
        if self.exited_with(expected) {
            Ok(self)
        } else {
            Err(AdapterError::Crashed {
                tool,
                exit_code: self.exit_code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Run `program args...`, feeding `input` on stdin and capturing both outputs.
///
/// The input is written from a separate thread so a child that fills its
/// stdout pipe before reading all of stdin cannot block us.
pub fn run_with_stdin(
    tool: &'static str,
    program: &Path,
    args: &[String],
    input: &str,
) -> Result<ToolOutput, AdapterError> {
    let start = Instant::now();

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => AdapterError::ToolMissing {
                tool,
                program: program.display().to_string(),
            },
            _ => AdapterError::Io { tool, source },
        })?;

    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.to_owned();
        thread::spawn(move || stdin.write_all(input.as_bytes()))
    });

    let output = child
        .wait_with_output()
        .map_err(|source| AdapterError::Io { tool, source })?;

    if let Some(handle) = writer {
        match handle.join() {
            // A checker may exit without reading all of its input.
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(source)) => return Err(AdapterError::Io { tool, source }),
            Ok(Ok(())) | Err(_) => {}
        }
    }

    tracing::debug!(
        "{} exited with {:?} after {:?}",
        tool,
        output.status.code(),
        start.elapsed()
    );

    Ok(ToolOutput {
        exit_code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
