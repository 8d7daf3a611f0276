//! engine::state
//!
//! Per-image state recorded after a successful build.
//!
//! Stored as `<storage>/<name>/state.yaml`:
//!
//! ```yaml
//! working-dir: /root
//! ```

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::paths::CodoPaths;

/// Errors from reading or writing state records.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to parse state file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("failed to write state file '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to serialize state: {0}")]
    Serialize(String),
}

/// What codo remembers about a built image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageState {
    /// The image's default working directory, as reported by `pwd`.
    pub working_dir: String,
}

impl ImageState {
    /// Load the state record of an image, `None` if there is none yet.
    pub fn load(paths: &CodoPaths, image_name: &str) -> Result<Option<Self>, StateError> {
        let path = paths.image_state_path(image_name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StateError::Read { path, source }),
        };

        serde_yaml::from_str(&contents)
            .map(Some)
            .map_err(|e| StateError::Parse {
                path,
                message: e.to_string(),
            })
    }

    /// Write the state record, creating the storage directory if needed.
    pub fn save(&self, paths: &CodoPaths, image_name: &str) -> Result<PathBuf, StateError> {
        let dir = paths.image_storage_dir(image_name);
        fs::create_dir_all(&dir).map_err(|source| StateError::Write {
            path: dir.clone(),
            source,
        })?;

        let path = paths.image_state_path(image_name);
        let contents =
            serde_yaml::to_string(self).map_err(|e| StateError::Serialize(e.to_string()))?;
        fs::write(&path, contents).map_err(|source| StateError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }
}
