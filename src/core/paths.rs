//! core::paths
//!
//! Centralized path routing for codo storage locations.
//!
//! **Hard rule:** no code outside this module joins `images`, `config.yaml`
//! or `state.yaml` onto a directory. All paths go through [`CodoPaths`].
//!
//! # Layout
//!
//! Configuration lives under the config root (`~/.config/codo` by default):
//! - `config.yaml` - Global configuration
//! - `images/<name>/config.yaml` - Per-image configuration
//!
//! Per-image state lives under the storage root (`~/codo` by default):
//! - `<name>/state.yaml` - Recorded after a successful build
//!
//! Build contexts are generated under the system temp directory:
//! - `codo/<user>/<name>/Dockerfile`
//!
//! # Example
//!
//! ```
//! use codo::core::paths::CodoPaths;
//! use std::path::PathBuf;
//!
//! let paths = CodoPaths::new(
//!     PathBuf::from("/home/alice/.config/codo"),
//!     PathBuf::from("/home/alice/codo"),
//!     PathBuf::from("/tmp"),
//! );
//!
//! assert_eq!(
//!     paths.image_config_path("dev"),
//!     PathBuf::from("/home/alice/.config/codo/images/dev/config.yaml")
//! );
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Environment variable overriding the config root.
pub const CONFIG_DIR_VAR: &str = "CODO_CONFIG_DIR";

/// Environment variable overriding the storage root.
pub const STORAGE_DIR_VAR: &str = "CODO_STORAGE_DIR";

const CONFIG_FILE: &str = "config.yaml";
const STATE_FILE: &str = "state.yaml";
const IMAGES_DIR: &str = "images";
const DOCKERFILE: &str = "Dockerfile";

/// Errors from locating codo directories.
#[derive(Debug, Error)]
pub enum PathsError {
    #[error("home directory not found")]
    NoHomeDir,
}

/// Centralized path routing for codo storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodoPaths {
    /// Root of all user-authored configuration.
    pub config_dir: PathBuf,

    /// Root of per-image state records.
    pub storage_dir: PathBuf,

    /// Directory under which build contexts are generated.
    pub temp_dir: PathBuf,
}

impl CodoPaths {
    /// Create paths from explicit roots.
    pub fn new(config_dir: PathBuf, storage_dir: PathBuf, temp_dir: PathBuf) -> Self {
        Self {
            config_dir,
            storage_dir,
            temp_dir,
        }
    }

    /// Locate the roots from the environment.
    ///
    /// The config root is, in order: `config_override`, `$CODO_CONFIG_DIR`,
    /// `~/.config/codo`. The storage root is `$CODO_STORAGE_DIR` or `~/codo`.
    ///
    /// # Errors
    ///
    /// Returns `PathsError::NoHomeDir` if a default is needed and the home
    /// directory cannot be determined.
    pub fn discover(config_override: Option<&Path>) -> Result<Self, PathsError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => match std::env::var_os(CONFIG_DIR_VAR) {
                Some(dir) => PathBuf::from(dir),
                None => home_dir()?.join(".config").join("codo"),
            },
        };

        let storage_dir = match std::env::var_os(STORAGE_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => home_dir()?.join("codo"),
        };

        Ok(Self::new(config_dir, storage_dir, std::env::temp_dir()))
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// `<config>/config.yaml`
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// `<config>/images`
    pub fn images_dir(&self) -> PathBuf {
        self.config_dir.join(IMAGES_DIR)
    }

    /// `<config>/images/<name>`
    pub fn image_dir(&self, image_name: &str) -> PathBuf {
        self.images_dir().join(image_name)
    }

    /// `<config>/images/<name>/config.yaml`
    pub fn image_config_path(&self, image_name: &str) -> PathBuf {
        self.image_dir(image_name).join(CONFIG_FILE)
    }

    // =========================================================================
    // State and build contexts
    // =========================================================================

    /// `<storage>/<name>`
    pub fn image_storage_dir(&self, image_name: &str) -> PathBuf {
        self.storage_dir.join(image_name)
    }

    /// `<storage>/<name>/state.yaml`
    pub fn image_state_path(&self, image_name: &str) -> PathBuf {
        self.image_storage_dir(image_name).join(STATE_FILE)
    }

    /// `<tmp>/codo/<user>/<name>`
    ///
    /// Namespaced by user so that users sharing `/tmp` do not write into
    /// each other's contexts.
    pub fn build_context_dir(&self, username: &str, image_name: &str) -> PathBuf {
        self.temp_dir.join("codo").join(username).join(image_name)
    }

    /// `<build context>/Dockerfile`
    pub fn dockerfile_path(build_context: &Path) -> PathBuf {
        build_context.join(DOCKERFILE)
    }
}

fn home_dir() -> Result<PathBuf, PathsError> {
    dirs::home_dir().ok_or(PathsError::NoHomeDir)
}
