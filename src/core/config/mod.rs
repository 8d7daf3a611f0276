//! core::config
//!
//! Configuration schema, loading and resolution.
//!
//! # Overview
//!
//! codo has two configuration scopes:
//! - **Global**: `<config>/config.yaml`, names the default image and the
//!   engine command. Required.
//! - **Image**: `<config>/images/<name>/config.yaml`, per-image options.
//!   Optional.
//!
//! # Failure policy
//!
//! A missing or broken global config is fatal: without it there is no
//! sensible answer to "which image should run". A missing or broken image
//! config is not: [`ConfigStore::load_image_config`] returns an empty mapping
//! and the image runs with defaults. Only a *parseable* image config with a
//! wrong-typed value is an error, raised by [`ImageConfigResolver`].
//!
//! # Example
//!
//! ```no_run
//! use codo::core::config::{ConfigStore, ImageConfigResolver};
//! use codo::core::paths::CodoPaths;
//! use codo::core::types::ImageName;
//!
//! let store = ConfigStore::new(CodoPaths::discover(None).unwrap());
//! let global = store.load_global_config().unwrap();
//! let name = ImageName::new(global.default_image).unwrap();
//! let config = ImageConfigResolver::new(&store).resolve(&name).unwrap();
//! println!("bind working dir: {}", config.bind_working_dir);
//! ```

mod resolver;
pub mod schema;

pub use resolver::ImageConfigResolver;
pub use schema::{GlobalConfig, ImageConfig};

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::core::paths::CodoPaths;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("failed to read config file '{path}': {source}")]
    ReadError { path: PathBuf, source: io::Error },

    #[error("failed to parse config file '{path}': {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("config file '{path}' is missing required field '{field}'")]
    MissingRequiredField { path: PathBuf, field: &'static str },

    #[error("field '{field}' of image '{image}' must be {expected}, found {found}")]
    InvalidFieldType {
        image: String,
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("failed to list images in '{path}': {source}")]
    ImagesRootUnreadable { path: PathBuf, source: io::Error },
}

/// Reads global and per-image configuration from the config root.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    paths: CodoPaths,
}

impl ConfigStore {
    pub fn new(paths: CodoPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &CodoPaths {
        &self.paths
    }

    /// Load the global configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::NotFound` if the file does not exist
    /// - `ConfigError::ReadError` if it exists but cannot be read
    /// - `ConfigError::Malformed` / `ConfigError::MissingRequiredField` from
    ///   [`GlobalConfig::parse`]
    pub fn load_global_config(&self) -> Result<GlobalConfig, ConfigError> {
        let path = self.paths.global_config_path();
        let contents = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ConfigError::NotFound { path: path.clone() },
            _ => ConfigError::ReadError {
                path: path.clone(),
                source: e,
            },
        })?;

        let config = GlobalConfig::parse(&path, &contents)?;
        log::debug!("loaded global config from {}", path.display());
        Ok(config)
    }

    /// Load the raw configuration document of one image.
    ///
    /// Never fails: a missing, unreadable or unparseable document, or one
    /// that is not a mapping, yields an empty mapping.
    pub fn load_image_config(&self, image_name: &str) -> Mapping {
        let path = self.paths.image_config_path(image_name);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config for image '{}' at {}", image_name, path.display());
                return Mapping::new();
            }
            Err(e) => {
                log::warn!("failed to read {} config: {}", image_name, e);
                return Mapping::new();
            }
        };

        match serde_yaml::from_str::<Value>(&contents) {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => {
                log::warn!(
                    "{} config at {} is not a mapping, using defaults",
                    image_name,
                    path.display()
                );
                Mapping::new()
            }
            Err(e) => {
                log::warn!("failed to parse {} config: {}", image_name, e);
                Mapping::new()
            }
        }
    }

    /// List the names of all image folders under the images root, sorted.
    ///
    /// Entries that are not directories are skipped. Names are returned as
    /// found on disk; callers validate them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ImagesRootUnreadable` if the images root cannot
    /// be listed.
    pub fn list_image_names(&self) -> Result<Vec<String>, ConfigError> {
        let root = self.paths.images_dir();
        let unreadable = |source| ConfigError::ImagesRootUnreadable {
            path: root.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in fs::read_dir(&root).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            if !entry.path().is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::warn!("skipping non UTF-8 image folder {:?}", name),
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> ConfigStore {
        ConfigStore::new(CodoPaths::new(
            temp.path().join("config"),
            temp.path().join("storage"),
            temp.path().join("tmp"),
        ))
    }

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn global_config_not_found() {
        let temp = TempDir::new().unwrap();
        let err = store(&temp).load_global_config().unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn global_config_loads() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(store.paths().global_config_path(), "default-image: dev\n");

        let config = store.load_global_config().unwrap();
        assert_eq!(config.default_image, "dev");
    }

    #[test]
    fn global_config_unparseable() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(store.paths().global_config_path(), "default-image: [unclosed\n");

        let err = store.load_global_config().unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn global_config_empty_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(store.paths().global_config_path(), "");

        let err = store.load_global_config().unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn global_config_missing_default_image() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(store.paths().global_config_path(), "auto-build: false\n");

        let err = store.load_global_config().unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredField { .. }));
        assert!(err.to_string().contains("default-image"));
    }

    #[test]
    fn image_config_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(store(&temp).load_image_config("dev").is_empty());
    }

    #[test]
    fn image_config_unparseable_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(store.paths().image_config_path("dev"), "base-image: [oops\n");

        assert!(store.load_image_config("dev").is_empty());
    }

    #[test]
    fn image_config_not_mapping_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(store.paths().image_config_path("dev"), "- a\n- b\n");

        assert!(store.load_image_config("dev").is_empty());
    }

    #[test]
    fn image_config_empty_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(store.paths().image_config_path("dev"), "");

        assert!(store.load_image_config("dev").is_empty());
    }

    #[test]
    fn image_config_loads_mapping() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        write(
            store.paths().image_config_path("dev"),
            "base-image: fedora\npass-gui: false\n",
        );

        let doc = store.load_image_config("dev");
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("base-image").and_then(Value::as_str), Some("fedora"));
    }

    #[test]
    fn list_images_sorted_dirs_only() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let images = store.paths().images_dir();
        fs::create_dir_all(images.join("zsh")).unwrap();
        fs::create_dir_all(images.join("alpine")).unwrap();
        fs::write(images.join("README"), "not an image").unwrap();

        assert_eq!(store.list_image_names().unwrap(), vec!["alpine", "zsh"]);
    }

    #[test]
    fn list_images_root_missing() {
        let temp = TempDir::new().unwrap();
        let err = store(&temp).list_image_names().unwrap_err();
        assert!(matches!(err, ConfigError::ImagesRootUnreadable { .. }));
    }
}
