//! engine::runner
//!
//! Executes assembled invocations against the container engine.
//!
//! # Design
//!
//! [`CommandRunner`] is the only seam between codo and the outside world's
//! container engine. The system implementation shells out to the configured
//! engine command (`sudo docker` by default); tests use
//! [`RecordingRunner`](super::mock::RecordingRunner).
//!
//! A runner reports how the process ended; it does not decide whether a
//! non-zero exit is a failure. Callers that need success use
//! [`ExecOutput::check`].

use std::io;
use std::process::{Command, Stdio};

use thiserror::Error;

use super::invocation::ResolvedInvocation;

/// Errors from running the container engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start {argv:?}: {source}")]
    Spawn { argv: Vec<String>, source: io::Error },

    #[error("{argv:?} {}", describe_status(.status))]
    ExternalEngineFailure {
        argv: Vec<String>,
        status: Option<i32>,
        stderr: String,
    },
}

fn describe_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("failed with exit code {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

/// How the child's standard streams are connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoMode {
    /// Inherit stdin, stdout and stderr (containers the user interacts with).
    Interactive,
    /// Capture stdout and stderr; stdin is closed.
    Captured,
}

/// Outcome of one engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// The full argument vector that was run, engine command included.
    pub argv: Vec<String>,
    /// Exit code, `None` if killed by a signal.
    pub status: Option<i32>,
    /// Captured stdout (empty in interactive mode).
    pub stdout: String,
    /// Captured stderr (empty in interactive mode).
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Turn a non-zero exit into `EngineError::ExternalEngineFailure`.
    pub fn check(self) -> Result<Self, EngineError> {
        if self.success() {
            Ok(self)
        } else {
            Err(EngineError::ExternalEngineFailure {
                argv: self.argv,
                status: self.status,
                stderr: self.stderr,
            })
        }
    }
}

/// Executes engine invocations.
pub trait CommandRunner {
    /// Run `invocation` and wait for it to finish.
    ///
    /// Returns `Err` only if the process could not be started.
    fn execute(&self, invocation: &ResolvedInvocation, mode: IoMode)
        -> Result<ExecOutput, EngineError>;
}

/// Runs invocations through the real engine binary.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    /// Program and leading arguments, e.g. `["sudo", "docker"]`.
    engine: Vec<String>,
}

impl SystemRunner {
    pub fn new(engine: Vec<String>) -> Self {
        Self { engine }
    }

    fn argv(&self, invocation: &ResolvedInvocation) -> Vec<String> {
        self.engine
            .iter()
            .chain(invocation.args())
            .cloned()
            .collect()
    }
}

impl CommandRunner for SystemRunner {
    fn execute(
        &self,
        invocation: &ResolvedInvocation,
        mode: IoMode,
    ) -> Result<ExecOutput, EngineError> {
        let argv = self.argv(invocation);
        if argv.is_empty() {
            return Err(EngineError::Spawn {
                argv,
                source: io::Error::new(io::ErrorKind::InvalidInput, "no engine command configured"),
            });
        }

        log::debug!("running {:?}", argv);
        let mut command = Command::new(&argv[0]);
        command.args(&argv[1..]);

        let result = match mode {
            IoMode::Interactive => command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .map(|status| (status.code(), String::new(), String::new())),
            IoMode::Captured => command.stdin(Stdio::null()).output().map(|output| {
                (
                    output.status.code(),
                    String::from_utf8_lossy(&output.stdout).into_owned(),
                    String::from_utf8_lossy(&output.stderr).into_owned(),
                )
            }),
        };

        match result {
            Ok((status, stdout, stderr)) => {
                log::debug!("{:?} exited with {:?}", argv, status);
                Ok(ExecOutput {
                    argv,
                    status,
                    stdout,
                    stderr,
                })
            }
            Err(source) => Err(EngineError::Spawn { argv, source }),
        }
    }
}
