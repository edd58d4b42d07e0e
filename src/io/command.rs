use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::io::sources::SourceError;

/// Runs the external task tool and returns its stdout as plain text.
///
/// Any failure (missing binary, non-zero exit, timeout) comes back as a
/// `SourceError`; callers treat all of them as "source unavailable".
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, args: &[&str], limit: Duration) -> Result<String, SourceError>;

    /// Program name, for hints shown to the user
    fn program(&self) -> &str;
}

/// Spawns the real task tool as a child process
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: String,
}

impl ProcessRunner {
    pub fn new(program: impl Into<String>) -> Self {
        ProcessRunner {
            program: program.into(),
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, args: &[&str], limit: Duration) -> Result<String, SourceError> {
        let command_line = self.describe(args);
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        tracing::debug!(command = %command_line, "running external command");
        let output = match tokio::time::timeout(limit, command.output()).await {
            Err(_) => {
                return Err(SourceError::Timeout {
                    command: command_line,
                    after_secs: limit.as_secs(),
                });
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(SourceError::MissingProgram {
                    program: self.program.clone(),
                });
            }
            Ok(Err(e)) => {
                return Err(SourceError::SpawnError {
                    command: command_line,
                    source: e,
                });
            }
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(SourceError::CommandFailed {
                command: command_line,
                status: output.status,
            });
        }

        Ok(strip_ansi_escapes::strip_str(String::from_utf8_lossy(
            &output.stdout,
        )))
    }

    fn program(&self) -> &str {
        &self.program
    }
}
