//! engine::build
//!
//! Builds images from their resolved configuration.
//!
//! # Lifecycle
//!
//! ```text
//! Resolve -> Plan -> Write context -> Build -> Probe -> Record state
//! ```
//!
//! Planning is pure and happens before anything touches the filesystem, so
//! an image without a `base-image` fails without writing a build context.
//! Probing and recording are best effort: once the engine has built the
//! image, the build counts as successful even if they fail.
//!
//! A sweep ([`ImageBuilder::build_all`]) builds every image folder and keeps
//! going past failures.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::invocation::{build_build_invocation, probe_working_dir_invocation, InvocationError};
use super::runner::{CommandRunner, EngineError, IoMode};
use super::state::ImageState;
use crate::core::config::{ConfigError, ConfigStore, ImageConfigResolver};
use crate::core::naming::full_image_reference;
use crate::core::paths::CodoPaths;
use crate::core::types::{ImageName, TypeError};

/// Errors from building a single image.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Name(#[from] TypeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("failed to write build context '{path}': {source}")]
    Context { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// Reference the image was tagged with.
    pub image_ref: String,
    /// Recorded state, `None` if the probe or the write failed.
    pub state: Option<ImageState>,
}

/// Result of a build-all sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Images that built, with their references.
    pub built: Vec<(String, String)>,
    /// Images that failed, with the reason.
    pub failed: Vec<(String, BuildError)>,
}

impl SweepReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Builds images for one user.
pub struct ImageBuilder<'a> {
    store: &'a ConfigStore,
    runner: &'a dyn CommandRunner,
    username: &'a str,
}

impl<'a> ImageBuilder<'a> {
    pub fn new(store: &'a ConfigStore, runner: &'a dyn CommandRunner, username: &'a str) -> Self {
        Self {
            store,
            runner,
            username,
        }
    }

    fn paths(&self) -> &CodoPaths {
        self.store.paths()
    }

    /// Build one image.
    ///
    /// # Errors
    ///
    /// - `BuildError::Config` if the image config has a wrong-typed field
    /// - `BuildError::Invocation` if no `base-image` is configured
    /// - `BuildError::Context` if the build context cannot be written
    /// - `BuildError::Engine` if the engine cannot start or the build fails
    pub fn build_image(&self, image: &ImageName) -> Result<BuildOutcome, BuildError> {
        let config = ImageConfigResolver::new(self.store).resolve(image)?;
        let image_ref = full_image_reference(self.username, image.as_str());
        let context = self.paths().build_context_dir(self.username, image.as_str());

        let plan = build_build_invocation(image.as_str(), &config, &context, &image_ref)?;

        fs::create_dir_all(&context).map_err(|source| BuildError::Context {
            path: context.clone(),
            source,
        })?;
        let dockerfile = CodoPaths::dockerfile_path(&context);
        fs::write(&dockerfile, &plan.dockerfile).map_err(|source| BuildError::Context {
            path: dockerfile.clone(),
            source,
        })?;

        log::info!("building {} as {}", image, image_ref);
        self.runner
            .execute(&plan.invocation, IoMode::Interactive)?
            .check()?;

        let state = self.record_state(image, &image_ref);
        Ok(BuildOutcome { image_ref, state })
    }

    /// Probe the built image's working directory and persist it.
    fn record_state(&self, image: &ImageName, image_ref: &str) -> Option<ImageState> {
        let probe = probe_working_dir_invocation(image_ref);
        let output = match self.runner.execute(&probe, IoMode::Captured) {
            Ok(output) if output.success() => output,
            Ok(output) => {
                log::warn!(
                    "failed to get {} working directory: {}",
                    image,
                    output.stderr.trim()
                );
                return None;
            }
            Err(e) => {
                log::warn!("failed to get {} working directory: {}", image, e);
                return None;
            }
        };

        let state = ImageState {
            working_dir: output.stdout.trim().to_string(),
        };
        match state.save(self.paths(), image.as_str()) {
            Ok(path) => {
                log::debug!("recorded {} state at {}", image, path.display());
                Some(state)
            }
            Err(e) => {
                log::warn!("failed to record {} state: {}", image, e);
                None
            }
        }
    }

    /// Build every image folder under the images root.
    ///
    /// Per-image failures are logged and collected; the sweep continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ImagesRootUnreadable` if the images root cannot
    /// be listed. Nothing is built in that case.
    pub fn build_all(&self) -> Result<SweepReport, ConfigError> {
        let mut report = SweepReport::default();

        for name in self.store.list_image_names()? {
            let result = ImageName::new(name.as_str())
                .map_err(BuildError::from)
                .and_then(|image| self.build_image(&image));

            match result {
                Ok(outcome) => report.built.push((name, outcome.image_ref)),
                Err(e) => {
                    log::error!("failed to build image {}: {}", name, e);
                    report.failed.push((name, e));
                }
            }
        }

        Ok(report)
    }
}
