//! engine::launch
//!
//! Starts a container for an image with the user's command.
//!
//! # Lifecycle
//!
//! ```text
//! Resolve -> [Inspect -> Build if missing] -> Run
//! ```

use thiserror::Error;

use super::build::{BuildError, ImageBuilder};
use super::host::HostEnv;
use super::invocation::{build_run_invocation, inspect_invocation, InvocationError};
use super::runner::{CommandRunner, EngineError, IoMode};
use crate::core::config::{ConfigError, ConfigStore, ImageConfigResolver};
use crate::core::naming::full_image_reference;
use crate::core::types::ImageName;

/// Errors from launching a container.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("image '{image}' is not built and could not be built: {source}")]
    Build { image: String, source: BuildError },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Options for one launch.
#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    /// Build the image first if the engine does not have it.
    pub auto_build: bool,
}

/// Run `command` inside a fresh container of `image`.
///
/// Returns the container's exit status (`None` if it was killed by a
/// signal). A non-zero status is not an error here; it belongs to the
/// user's command.
///
/// # Errors
///
/// - `LaunchError::Config` if the image config has a wrong-typed field
/// - `LaunchError::Invocation` if the working directory must be bound but
///   is unavailable
/// - `LaunchError::Build` if auto-build was needed and failed
/// - `LaunchError::Engine` if the engine cannot be started
pub fn launch(
    store: &ConfigStore,
    runner: &dyn CommandRunner,
    host: &HostEnv,
    image: &ImageName,
    command: &[String],
    options: LaunchOptions,
) -> Result<Option<i32>, LaunchError> {
    let config = ImageConfigResolver::new(store).resolve(image)?;
    let image_ref = full_image_reference(&host.username, image.as_str());

    // Assemble before touching the engine so a bad host state fails fast.
    let invocation = build_run_invocation(&config, host, &image_ref, command)?;

    if options.auto_build && !is_built(runner, &image_ref)? {
        log::info!("{} not found, building it first", image_ref);
        ImageBuilder::new(store, runner, &host.username)
            .build_image(image)
            .map_err(|source| LaunchError::Build {
                image: image.to_string(),
                source,
            })?;
    }

    let output = runner.execute(&invocation, IoMode::Interactive)?;
    Ok(output.status)
}

fn is_built(runner: &dyn CommandRunner, image_ref: &str) -> Result<bool, EngineError> {
    let output = runner.execute(&inspect_invocation(image_ref), IoMode::Captured)?;
    Ok(output.success())
}
