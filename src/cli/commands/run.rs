//! run - Run a command inside the selected image

use std::process::ExitCode;

use super::{exit_code, Session};
use crate::engine::{launch, Context, HostEnv, LaunchOptions};
use anyhow::{Context as _, Result};

/// Run `command` in a container of the selected image.
///
/// An empty command starts the image's default entrypoint. The container's
/// exit status becomes codo's exit status.
pub fn run(ctx: &Context, image: Option<&str>, command: &[String]) -> Result<ExitCode> {
    let session = Session::open(ctx)?;
    let image = session.select_image(image)?;
    let host = HostEnv::capture(ctx.cwd.clone());
    let runner = session.runner();

    let options = LaunchOptions {
        auto_build: session.global.auto_build,
    };
    let status = launch(&session.store, &runner, &host, &image, command, options)
        .with_context(|| format!("Failed to run image '{}'", image))?;

    log::debug!("container exited with {:?}", status);
    Ok(exit_code(status))
}
