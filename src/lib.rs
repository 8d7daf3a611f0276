//! codo - run commands inside per-tool container images
//!
//! codo keeps one directory per image under `~/.config/codo/images`. Each
//! holds a small YAML config naming the base image and how the container
//! should see the host. codo resolves that config, builds the image on
//! demand, and runs the user's command in a throwaway container with the
//! current directory mounted.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Invocation assembly, image builds, and container launches
//! - [`core`] - Paths, naming, validated types, and configuration loading
//!
//! # Invariants
//!
//! 1. A missing or unreadable image config resolves to the defaults
//! 2. A config field of the wrong type is an error, never a silent default
//! 3. The user's command is passed to the container verbatim
//! 4. The engine is only ever started through [`engine::CommandRunner`]

pub mod cli;
pub mod core;
pub mod engine;
