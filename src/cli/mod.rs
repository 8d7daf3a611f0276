//! cli
//!
//! Command-line interface layer for codo.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialise logging
//! - Delegate to command handlers
//!
//! The CLI layer is thin. Configuration and invocation assembly live in
//! [`crate::core`] and [`crate::engine`].

pub mod args;
pub mod commands;

pub use args::{Action, Cli, Shell};

use std::process::ExitCode;

use crate::engine;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    init_logging(cli.debug, cli.quiet);

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        config_dir: cli.config_dir.clone(),
        quiet: cli.quiet,
    };

    commands::dispatch(&cli, &ctx)
}

/// Initialise `env_logger`; `RUST_LOG` overrides the flag-derived level.
fn init_logging(debug: bool, quiet: bool) {
    let level = if debug {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
