//! build - Build images, then optionally run a command

use std::process::ExitCode;

use super::{run, Session};
use crate::engine::host::current_username;
use crate::engine::{Context, ImageBuilder};
use anyhow::{bail, Context as _, Result};

/// Build every image, or only `image` if one was named.
///
/// A sweep keeps going past failing images and reports them at the end.
/// If anything failed, codo exits non-zero and `command` is not run.
pub fn build(ctx: &Context, image: Option<&str>, command: &[String]) -> Result<ExitCode> {
    let session = Session::open(ctx)?;
    let runner = session.runner();
    let username = current_username();
    let builder = ImageBuilder::new(&session.store, &runner, &username);

    match image {
        Some(name) => {
            let image = session.select_image(Some(name))?;
            let outcome = builder
                .build_image(&image)
                .with_context(|| format!("Failed to build image '{}'", image))?;
            if !ctx.quiet {
                println!("Built {} as {}", image, outcome.image_ref);
            }
        }
        None => {
            let report = builder.build_all().context("Failed to build images")?;
            if !ctx.quiet {
                for (name, image_ref) in &report.built {
                    println!("Built {} as {}", name, image_ref);
                }
            }
            if !report.is_success() {
                let failed: Vec<&str> = report.failed.iter().map(|(n, _)| n.as_str()).collect();
                bail!(
                    "{} of {} images failed to build: {}",
                    failed.len(),
                    failed.len() + report.built.len(),
                    failed.join(", ")
                );
            }
        }
    }

    if command.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    run::run(ctx, image, command)
}
