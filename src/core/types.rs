//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`ImageName`] - Validated logical image name
//!
//! # Validation
//!
//! Image names become both a directory name under the images root and part
//! of a container image reference, so they must be safe for both. Invalid
//! names cannot be represented.
//!
//! # Examples
//!
//! ```
//! use codo::core::types::ImageName;
//!
//! let name = ImageName::new("rust-dev").unwrap();
//! assert_eq!(name.as_str(), "rust-dev");
//!
//! assert!(ImageName::new("../etc").is_err());
//! assert!(ImageName::new("Fedora").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid image name '{name}': {reason}")]
    InvalidImageName { name: String, reason: String },
}

/// A validated image name.
///
/// Image names must:
/// - Not be empty
/// - Start with a lowercase ASCII letter or digit
/// - Contain only lowercase ASCII letters, digits, `.`, `_` and `-`
/// - Not contain `..`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageName(String);

impl ImageName {
    /// Create a new validated image name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidImageName` if the name breaks any rule.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let invalid = |reason: &str| TypeError::InvalidImageName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let first = name
            .chars()
            .next()
            .ok_or_else(|| invalid("image name cannot be empty"))?;
        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return Err(invalid("must start with a lowercase letter or digit"));
        }

        if let Some(c) = name.chars().find(|c| {
            !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-'))
        }) {
            return Err(invalid(&format!("character '{}' is not allowed", c)));
        }

        if name.contains("..") {
            return Err(invalid("cannot contain '..'"));
        }

        Ok(())
    }

    /// Get the image name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImageName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ImageName> for String {
    fn from(name: ImageName) -> Self {
        name.0
    }
}

impl std::fmt::Display for ImageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
