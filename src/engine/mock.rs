//! engine::mock
//!
//! Recording runner for deterministic testing.
//!
//! # Design
//!
//! [`RecordingRunner`] never starts a process. It records every invocation
//! and answers with scripted outcomes, so invocation assembly and the build
//! flow can be tested without a container engine installed.
//!
//! # Example
//!
//! ```
//! use codo::engine::invocation::ResolvedInvocation;
//! use codo::engine::mock::RecordingRunner;
//! use codo::engine::runner::{CommandRunner, IoMode};
//!
//! let runner = RecordingRunner::new();
//! runner.respond("image inspect", 1, "");
//!
//! let inspect = ResolvedInvocation::new(vec!["image".into(), "inspect".into(), "img".into()]);
//! let output = runner.execute(&inspect, IoMode::Captured).unwrap();
//! assert_eq!(output.status, Some(1));
//! assert_eq!(runner.calls().len(), 1);
//! ```

use std::sync::{Arc, Mutex};

use super::invocation::ResolvedInvocation;
use super::runner::{CommandRunner, EngineError, ExecOutput, IoMode};

/// Engine prefix recorded in every [`ExecOutput::argv`].
pub const MOCK_ENGINE: &str = "mock-engine";

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub args: Vec<String>,
    pub mode: IoMode,
}

#[derive(Debug, Clone)]
struct Response {
    prefix: String,
    status: Option<i32>,
    stdout: String,
}

#[derive(Debug, Default)]
struct Inner {
    calls: Vec<RecordedCall>,
    responses: Vec<Response>,
}

/// Runner that records invocations instead of executing them.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingRunner {
    /// Create a runner where every invocation succeeds with empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer invocations whose space-joined arguments start with `prefix`.
    ///
    /// Earlier registrations win over later ones.
    pub fn respond(&self, prefix: &str, status: i32, stdout: &str) {
        self.lock().responses.push(Response {
            prefix: prefix.to_string(),
            status: Some(status),
            stdout: stdout.to_string(),
        });
    }

    /// All invocations so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Arguments of every invocation so far, oldest first.
    pub fn call_args(&self) -> Vec<Vec<String>> {
        self.lock().calls.iter().map(|c| c.args.clone()).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CommandRunner for RecordingRunner {
    fn execute(
        &self,
        invocation: &ResolvedInvocation,
        mode: IoMode,
    ) -> Result<ExecOutput, EngineError> {
        let mut inner = self.lock();
        inner.calls.push(RecordedCall {
            args: invocation.args().to_vec(),
            mode,
        });

        let joined = invocation.args().join(" ");
        let (status, stdout) = inner
            .responses
            .iter()
            .find(|r| joined.starts_with(&r.prefix))
            .map(|r| (r.status, r.stdout.clone()))
            .unwrap_or((Some(0), String::new()));

        let mut argv = vec![MOCK_ENGINE.to_string()];
        argv.extend(invocation.args().iter().cloned());

        Ok(ExecOutput {
            argv,
            status,
            stdout,
            stderr: String::new(),
        })
    }
}
