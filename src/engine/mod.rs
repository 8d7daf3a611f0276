//! engine
//!
//! Turns resolved configuration into container engine invocations and runs
//! them.
//!
//! # Architecture
//!
//! - [`host`] - Process state captured once per operation
//! - [`invocation`] - Pure argument-vector assembly
//! - [`runner`] - The [`CommandRunner`] seam and its system implementation
//! - [`mock`] - Recording runner for tests
//! - [`build`] - Image builds and build-all sweeps
//! - [`launch`] - Running a command in a container
//! - [`state`] - Per-image state records
//!
//! # Invariants
//!
//! - Invocation builders never read the environment; [`HostEnv`] is passed in
//! - The engine binary is only ever started through a [`CommandRunner`]
//! - User command arguments are appended last and never rewritten

pub mod build;
pub mod host;
pub mod invocation;
pub mod launch;
pub mod mock;
pub mod runner;
pub mod state;

pub use build::{BuildError, BuildOutcome, ImageBuilder, SweepReport};
pub use host::HostEnv;
pub use invocation::{BuildPlan, InvocationError, ResolvedInvocation};
pub use launch::{launch, LaunchError, LaunchOptions};
pub use runner::{CommandRunner, EngineError, ExecOutput, IoMode, SystemRunner};
pub use state::ImageState;

use std::path::PathBuf;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect command behavior.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Config root override.
    pub config_dir: Option<PathBuf>,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}
