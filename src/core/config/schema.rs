//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at `<config>/config.yaml`:
//!
//! ```yaml
//! default-image: dev
//! engine: [sudo, docker]
//! auto-build: true
//! ```
//!
//! # Image Config
//!
//! Located at `<config>/images/<name>/config.yaml`:
//!
//! ```yaml
//! base-image: ubuntu:22.04
//! bind-working-dir: true
//! pass-gui: false
//! ```
//!
//! Unknown keys are ignored in both documents. Image documents are parsed
//! into a generic mapping and then overlaid field by field onto
//! [`ImageConfig::default`], so that a wrong-typed value is reported against
//! the field and image it belongs to.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use super::ConfigError;

/// Key holding the default image name in the global config.
pub const DEFAULT_IMAGE_KEY: &str = "default-image";

/// Image config keys.
pub const BASE_IMAGE_KEY: &str = "base-image";
pub const BIND_WORKING_DIR_KEY: &str = "bind-working-dir";
pub const PASS_GUI_KEY: &str = "pass-gui";

/// Older name for `bind-working-dir`, still accepted.
pub const LEGACY_BIND_WORKING_DIR_KEY: &str = "attach-pwd";

/// Engine command used when the global config does not name one.
pub const DEFAULT_ENGINE: &[&str] = &["sudo", "docker"];

/// Global configuration (user scope).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Image used when none is selected on the command line.
    pub default_image: String,

    /// Program and leading arguments that invoke the container engine.
    pub engine: Vec<String>,

    /// Build a missing image before running it.
    pub auto_build: bool,
}

/// On-disk shape of the global config, before required fields are checked.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct GlobalConfigDocument {
    default_image: Option<String>,
    engine: Option<Vec<String>>,
    auto_build: Option<bool>,
}

impl GlobalConfig {
    /// Parse the global config document.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Malformed` if the text is not a mapping with
    ///   correctly typed fields (an empty document included), or `engine`
    ///   is empty
    /// - `ConfigError::MissingRequiredField` if `default-image` is absent
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let malformed = |message: String| ConfigError::Malformed {
            path: path.to_path_buf(),
            message,
        };

        let value: Value = serde_yaml::from_str(contents).map_err(|e| malformed(e.to_string()))?;
        if !value.is_mapping() {
            return Err(malformed(format!(
                "expected a mapping, found {}",
                value_kind(&value)
            )));
        }
        let doc: GlobalConfigDocument =
            serde_yaml::from_value(value).map_err(|e| malformed(e.to_string()))?;

        let default_image = doc
            .default_image
            .ok_or_else(|| ConfigError::MissingRequiredField {
                path: path.to_path_buf(),
                field: DEFAULT_IMAGE_KEY,
            })?;

        let engine = match doc.engine {
            Some(engine) if engine.is_empty() => {
                return Err(malformed("'engine' cannot be empty".to_string()));
            }
            Some(engine) => engine,
            None => DEFAULT_ENGINE.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self {
            default_image,
            engine,
            auto_build: doc.auto_build.unwrap_or(true),
        })
    }
}

/// Fully-resolved configuration for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImageConfig {
    /// Base image written into the generated build definition.
    pub base_image: Option<String>,

    /// Mount the host working directory and start the container in it.
    pub bind_working_dir: bool,

    /// Forward the host display into the container.
    pub pass_gui: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_image: None,
            bind_working_dir: true,
            pass_gui: true,
        }
    }
}

impl ImageConfig {
    /// Overlay every recognized key of `doc` onto `self`.
    ///
    /// Each present key replaces the current value; absent keys and keys
    /// with a null value leave it untouched. `bind-working-dir` takes
    /// precedence over its legacy name `attach-pwd`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFieldType` naming the field and image if
    /// a present value has the wrong type.
    pub fn overlay(mut self, image: &str, doc: &Mapping) -> Result<Self, ConfigError> {
        if let Some(base) = field(doc, BASE_IMAGE_KEY) {
            self.base_image = Some(expect_image_ref(image, BASE_IMAGE_KEY, base)?.to_string());
        }

        if let Some(bind) = field(doc, BIND_WORKING_DIR_KEY) {
            self.bind_working_dir = expect_bool(image, BIND_WORKING_DIR_KEY, bind)?;
        } else if let Some(bind) = field(doc, LEGACY_BIND_WORKING_DIR_KEY) {
            log::warn!(
                "image '{}': '{}' is deprecated, use '{}'",
                image,
                LEGACY_BIND_WORKING_DIR_KEY,
                BIND_WORKING_DIR_KEY
            );
            self.bind_working_dir = expect_bool(image, LEGACY_BIND_WORKING_DIR_KEY, bind)?;
        }

        if let Some(gui) = field(doc, PASS_GUI_KEY) {
            self.pass_gui = expect_bool(image, PASS_GUI_KEY, gui)?;
        }

        Ok(self)
    }
}

fn field<'a>(doc: &'a Mapping, key: &str) -> Option<&'a Value> {
    doc.get(key).filter(|value| !value.is_null())
}

/// A string usable as a single image reference token.
fn expect_image_ref<'a>(
    image: &str,
    field: &'static str,
    value: &'a Value,
) -> Result<&'a str, ConfigError> {
    const EXPECTED: &str = "an image reference";

    let text = value
        .as_str()
        .ok_or_else(|| invalid_type(image, field, EXPECTED, value_kind(value)))?;
    if text.is_empty() {
        return Err(invalid_type(image, field, EXPECTED, "an empty string"));
    }
    if !is_plain_token(text) {
        return Err(invalid_type(
            image,
            field,
            EXPECTED,
            "a string with whitespace or control characters",
        ));
    }
    Ok(text)
}

/// Non-empty, with no whitespace or control characters.
pub fn is_plain_token(text: &str) -> bool {
    !text.is_empty() && !text.chars().any(|c| c.is_whitespace() || c.is_control())
}

fn expect_bool(image: &str, field: &'static str, value: &Value) -> Result<bool, ConfigError> {
    value
        .as_bool()
        .ok_or_else(|| invalid_type(image, field, "a boolean", value_kind(value)))
}

fn invalid_type(
    image: &str,
    field: &'static str,
    expected: &'static str,
    found: &'static str,
) -> ConfigError {
    ConfigError::InvalidFieldType {
        image: image.to_string(),
        field,
        expected,
        found,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
