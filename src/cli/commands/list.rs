//! list - Print the configured image names

use super::open_store;
use crate::engine::Context;
use anyhow::{Context as _, Result};

/// Print every image folder name, one per line, sorted.
///
/// Only needs the images root; the global config is not loaded.
pub fn list_images(ctx: &Context) -> Result<()> {
    let store = open_store(ctx)?;
    let names = store
        .list_image_names()
        .context("Failed to list images")?;

    if names.is_empty() && !ctx.quiet {
        eprintln!(
            "No images configured under {}",
            store.paths().images_dir().display()
        );
    }
    for name in names {
        println!("{}", name);
    }

    Ok(())
}
