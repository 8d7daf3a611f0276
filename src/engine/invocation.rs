//! engine::invocation
//!
//! Assembles the argument vectors handed to the container engine.
//!
//! Every builder here is a pure function of its inputs. Argument order is
//! fixed per action: flags, then the image reference, then (for `run`) the
//! user's command, verbatim.
//!
//! # Example
//!
//! ```
//! use codo::core::config::ImageConfig;
//! use codo::engine::host::HostEnv;
//! use codo::engine::invocation::build_run_invocation;
//! use std::path::PathBuf;
//!
//! let host = HostEnv {
//!     working_dir: Some(PathBuf::from("/home/alice/src")),
//!     display: None,
//!     username: "alice".to_string(),
//! };
//! let args = vec!["make".to_string(), "test".to_string()];
//! let invocation =
//!     build_run_invocation(&ImageConfig::default(), &host, "codo-alice-dev", &args).unwrap();
//!
//! assert_eq!(
//!     invocation.args(),
//!     ["run", "-ti", "--rm", "-v", "/home/alice/src:/codo", "-w", "/codo",
//!      "codo-alice-dev", "make", "test"]
//! );
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::host::HostEnv;
use crate::core::config::schema::is_plain_token;
use crate::core::config::ImageConfig;

/// Where the host working directory is mounted inside the container.
pub const CONTAINER_WORKDIR: &str = "/codo";

/// Host directory holding the X11 sockets.
pub const X11_SOCKET_DIR: &str = "/tmp/.X11-unix";

/// Errors from invocation assembly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("image '{image}' has no base-image configured")]
    MissingBaseImage { image: String },

    #[error("image '{image}' has an unusable base-image {base_image:?}")]
    InvalidBaseImage { image: String, base_image: String },

    #[error("working directory unavailable: {0}")]
    WorkingDirUnavailable(String),

    #[error("build context '{}' is not valid UTF-8", .0.display())]
    BuildContextNotUtf8(PathBuf),
}

/// An ordered argument vector for the container engine.
///
/// Does not include the engine program itself; the runner prepends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInvocation {
    args: Vec<String>,
}

impl ResolvedInvocation {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

/// A build definition plus the invocation that builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Contents of the `Dockerfile` to write into the build context.
    pub dockerfile: String,

    /// `build -t <ref> <context>`
    pub invocation: ResolvedInvocation,
}

/// Build the `run` invocation for an image.
///
/// # Errors
///
/// Returns `InvocationError::WorkingDirUnavailable` if the working directory
/// must be bound but is unknown or not valid UTF-8.
pub fn build_run_invocation(
    config: &ImageConfig,
    host: &HostEnv,
    full_image_ref: &str,
    trailing_args: &[String],
) -> Result<ResolvedInvocation, InvocationError> {
    let mut args: Vec<String> = ["run", "-ti", "--rm"].map(String::from).to_vec();

    if config.bind_working_dir {
        let cwd = host.working_dir.as_deref().ok_or_else(|| {
            InvocationError::WorkingDirUnavailable("current directory could not be read".into())
        })?;
        let cwd = cwd.to_str().ok_or_else(|| {
            InvocationError::WorkingDirUnavailable(format!("{} is not valid UTF-8", cwd.display()))
        })?;
        args.push("-v".into());
        args.push(format!("{}:{}", cwd, CONTAINER_WORKDIR));
        args.push("-w".into());
        args.push(CONTAINER_WORKDIR.into());
    }

    if config.pass_gui {
        if let Some(display) = &host.display {
            args.push("-e".into());
            args.push(format!("DISPLAY={}", display));
            args.push("-v".into());
            args.push(format!("{}:{}", X11_SOCKET_DIR, X11_SOCKET_DIR));
        }
    }

    args.push(full_image_ref.to_string());
    args.extend(trailing_args.iter().cloned());

    Ok(ResolvedInvocation::new(args))
}

/// Plan the build of an image from its configured base image.
///
/// Pure: nothing is written. The caller writes [`BuildPlan::dockerfile`]
/// into `build_context` before executing the invocation.
///
/// # Errors
///
/// - `InvocationError::MissingBaseImage` if `config.base_image` is unset or
///   empty
/// - `InvocationError::InvalidBaseImage` if it would not fit on the single
///   `FROM` line
/// - `InvocationError::BuildContextNotUtf8` if `build_context` cannot be
///   passed as an argument unchanged
pub fn build_build_invocation(
    image: &str,
    config: &ImageConfig,
    build_context: &Path,
    full_image_ref: &str,
) -> Result<BuildPlan, InvocationError> {
    let base_image = match config.base_image.as_deref() {
        None | Some("") => {
            return Err(InvocationError::MissingBaseImage {
                image: image.to_string(),
            })
        }
        Some(base) if !is_plain_token(base) => {
            return Err(InvocationError::InvalidBaseImage {
                image: image.to_string(),
                base_image: base.to_string(),
            })
        }
        Some(base) => base,
    };

    let context = build_context
        .to_str()
        .ok_or_else(|| InvocationError::BuildContextNotUtf8(build_context.to_path_buf()))?;

    let args = vec![
        "build".to_string(),
        "-t".to_string(),
        full_image_ref.to_string(),
        context.to_string(),
    ];

    Ok(BuildPlan {
        dockerfile: dockerfile_for(base_image),
        invocation: ResolvedInvocation::new(args),
    })
}

/// The generated build definition: a single `FROM` line.
pub fn dockerfile_for(base_image: &str) -> String {
    format!("FROM {}\n", base_image)
}

/// `run --rm <ref> pwd`, used to learn the image's default working directory.
pub fn probe_working_dir_invocation(full_image_ref: &str) -> ResolvedInvocation {
    ResolvedInvocation::new(vec![
        "run".into(),
        "--rm".into(),
        full_image_ref.into(),
        "pwd".into(),
    ])
}

/// `image inspect <ref>`, which succeeds only if the engine has the image.
pub fn inspect_invocation(full_image_ref: &str) -> ResolvedInvocation {
    ResolvedInvocation::new(vec![
        "image".into(),
        "inspect".into(),
        full_image_ref.into(),
    ])
}
