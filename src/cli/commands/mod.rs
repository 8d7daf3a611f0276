//! cli::commands
//!
//! Action dispatch and handlers.
//!
//! # Architecture
//!
//! Each handler:
//! 1. Loads configuration through a [`Session`]
//! 2. Calls the engine to resolve, build, or run
//! 3. Formats and displays output
//!
//! Handlers never assemble engine arguments themselves.

mod build;
mod completion;
mod list;
mod run;
mod show;

pub use build::build;
pub use completion::completion;
pub use list::list_images;
pub use run::run;
pub use show::show_config;

use std::process::ExitCode;

use crate::cli::args::{Action, Cli};
use crate::core::config::{ConfigStore, GlobalConfig};
use crate::core::paths::CodoPaths;
use crate::core::types::ImageName;
use crate::engine::{Context, SystemRunner};
use anyhow::{Context as _, Result};

/// Dispatch the parsed command line to its handler.
pub fn dispatch(cli: &Cli, ctx: &Context) -> Result<ExitCode> {
    match cli.action() {
        Action::Completion(shell) => completion::completion(shell).map(|_| ExitCode::SUCCESS),
        Action::ListImages => list::list_images(ctx).map(|_| ExitCode::SUCCESS),
        Action::ShowConfig => {
            show::show_config(ctx, cli.image.as_deref()).map(|_| ExitCode::SUCCESS)
        }
        Action::Build => build::build(ctx, cli.image.as_deref(), &cli.command),
        Action::Run => run::run(ctx, cli.image.as_deref(), &cli.command),
    }
}

/// Configuration loaded once per invocation.
pub(crate) struct Session {
    pub store: ConfigStore,
    pub global: GlobalConfig,
}

impl Session {
    /// Discover paths and load the global config.
    pub fn open(ctx: &Context) -> Result<Self> {
        let store = open_store(ctx)?;
        let global = store
            .load_global_config()
            .context("Failed to load global config")?;
        log::debug!("global config: {:?}", global);
        Ok(Self { store, global })
    }

    /// The image named on the command line, or the configured default.
    pub fn select_image(&self, requested: Option<&str>) -> Result<ImageName> {
        let name = requested.unwrap_or(self.global.default_image.as_str());
        ImageName::new(name).context("Invalid image name")
    }

    /// Runner for the configured engine command.
    pub fn runner(&self) -> SystemRunner {
        SystemRunner::new(self.global.engine.clone())
    }
}

/// Discover paths without loading the global config.
pub(crate) fn open_store(ctx: &Context) -> Result<ConfigStore> {
    let paths = CodoPaths::discover(ctx.config_dir.as_deref())
        .context("Failed to locate config directory")?;
    Ok(ConfigStore::new(paths))
}

/// Map a container exit status to a process exit code.
pub(crate) fn exit_code(status: Option<i32>) -> ExitCode {
    ExitCode::from(exit_status_byte(status))
}

/// Statuses outside `0..=255` and signal deaths become `1`.
fn exit_status_byte(status: Option<i32>) -> u8 {
    status.and_then(|code| u8::try_from(code).ok()).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(exit_status_byte(Some(0)), 0);
        assert_eq!(exit_status_byte(Some(42)), 42);
        assert_eq!(exit_status_byte(Some(-1)), 1);
        assert_eq!(exit_status_byte(Some(300)), 1);
        assert_eq!(exit_status_byte(None), 1);
    }
}
