//! core::config::resolver
//!
//! Resolves the effective [`ImageConfig`] of an image: documented defaults
//! with the image's own config document overlaid on top.

use super::{ConfigError, ConfigStore, ImageConfig};
use crate::core::types::ImageName;

/// Produces fully-resolved image configurations.
///
/// Resolution reads the filesystem and nothing else, so resolving the same
/// image twice against unchanged files yields identical results.
#[derive(Debug, Clone, Copy)]
pub struct ImageConfigResolver<'a> {
    store: &'a ConfigStore,
}

impl<'a> ImageConfigResolver<'a> {
    pub fn new(store: &'a ConfigStore) -> Self {
        Self { store }
    }

    /// Resolve the configuration of `image`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidFieldType` if the image's document sets a
    /// recognized key to a value of the wrong type. A missing or unparseable
    /// document is not an error.
    pub fn resolve(&self, image: &ImageName) -> Result<ImageConfig, ConfigError> {
        let doc = self.store.load_image_config(image.as_str());
        let config = ImageConfig::default().overlay(image.as_str(), &doc)?;
        log::debug!("resolved image '{}': {:?}", image, config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::CodoPaths;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        store: ConfigStore,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let store = ConfigStore::new(CodoPaths::new(
                temp.path().join("config"),
                temp.path().join("storage"),
                temp.path().join("tmp"),
            ));
            Self { _temp: temp, store }
        }

        fn image_config(&self, image: &str, contents: &str) {
            let path = self.store.paths().image_config_path(image);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn resolve(&self, image: &str) -> Result<ImageConfig, ConfigError> {
            ImageConfigResolver::new(&self.store).resolve(&ImageName::new(image).unwrap())
        }
    }

    #[test]
    fn absent_image_gets_defaults() {
        let fixture = Fixture::new();
        assert_eq!(fixture.resolve("ghost").unwrap(), ImageConfig::default());
    }

    #[test]
    fn broken_document_gets_defaults() {
        let fixture = Fixture::new();
        fixture.image_config("dev", "{{{{");
        assert_eq!(fixture.resolve("dev").unwrap(), ImageConfig::default());
    }

    #[test]
    fn overlay_applied() {
        let fixture = Fixture::new();
        fixture.image_config("dev", "base-image: ubuntu:22.04\nbind-working-dir: false\n");

        let config = fixture.resolve("dev").unwrap();
        assert_eq!(config.base_image.as_deref(), Some("ubuntu:22.04"));
        assert!(!config.bind_working_dir);
        assert!(config.pass_gui);
    }

    #[test]
    fn invalid_field_type_surfaces() {
        let fixture = Fixture::new();
        fixture.image_config("dev", "pass-gui: 3\n");

        let err = fixture.resolve("dev").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFieldType { .. }));
    }

    #[test]
    fn resolution_is_idempotent() {
        let fixture = Fixture::new();
        fixture.image_config("dev", "base-image: alpine\npass-gui: false\n");

        let first = fixture.resolve("dev").unwrap();
        let second = fixture.resolve("dev").unwrap();
        assert_eq!(first, second);
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn images_resolve_independently() {
        let fixture = Fixture::new();
        fixture.image_config("dev", "bind-working-dir: false\n");

        assert!(!fixture.resolve("dev").unwrap().bind_working_dir);
        assert!(fixture.resolve("other").unwrap().bind_working_dir);
    }
}
