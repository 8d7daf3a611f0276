//! show - Print the resolved configuration of an image as JSON

use serde::Serialize;

use super::Session;
use crate::core::config::{ImageConfig, ImageConfigResolver};
use crate::core::naming::full_image_reference;
use crate::engine::host::current_username;
use crate::engine::{Context, ImageState};
use anyhow::{Context as _, Result};

/// JSON document printed by `--show-config`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ShowConfig<'a> {
    image: &'a str,
    image_ref: String,
    engine: &'a [String],
    config: ImageConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<ImageState>,
}

/// Resolve the selected image and print the result.
pub fn show_config(ctx: &Context, image: Option<&str>) -> Result<()> {
    let session = Session::open(ctx)?;
    let image = session.select_image(image)?;

    let config = ImageConfigResolver::new(&session.store)
        .resolve(&image)
        .with_context(|| format!("Failed to resolve config for image '{}'", image))?;

    let state = match ImageState::load(session.store.paths(), image.as_str()) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("ignoring unreadable state for {}: {}", image, e);
            None
        }
    };

    let doc = ShowConfig {
        image: image.as_str(),
        image_ref: full_image_reference(&current_username(), image.as_str()),
        engine: &session.global.engine,
        config,
        state,
    };

    let json = serde_json::to_string_pretty(&doc).context("Failed to serialize config")?;
    println!("{}", json);

    Ok(())
}
