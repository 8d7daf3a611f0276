//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! codo has no subcommands: everything from the first positional argument
//! onward is the command to run in the container, passed through untouched.
//! Options are only recognized before it.
//!
//! # Global Flags
//!
//! - `--image` / `-i`: Image to use instead of the configured default
//! - `--config-dir <path>`: Use another config root
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::Parser;
use std::path::PathBuf;

/// codo - run commands inside per-tool container images
#[derive(Parser, Debug)]
#[command(name = "codo")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "\
EXAMPLES:
    # Run a command in the default image, in the current directory
    codo make test

    # Use another image
    codo -i rust cargo build

    # Everything after the command is passed through, flags included
    codo ls -la --color=always

    # (Re)build every image under ~/.config/codo/images
    codo --build

    # Rebuild one image, then open a shell in it
    codo -b -i rust bash"
)]
pub struct Cli {
    /// Image to use instead of `default-image`
    #[arg(short, long, value_name = "NAME")]
    pub image: Option<String>,

    /// Build all images (or only --image), then run COMMAND if given
    #[arg(short, long)]
    pub build: bool,

    /// List the configured images
    #[arg(long, conflicts_with_all = ["build", "show_config", "completion", "command"])]
    pub list_images: bool,

    /// Print the resolved configuration of the selected image as JSON
    #[arg(long, conflicts_with_all = ["build", "completion", "command"])]
    pub show_config: bool,

    /// Print a shell completion script
    #[arg(long, value_enum, value_name = "SHELL", conflicts_with_all = ["build", "command"])]
    pub completion: Option<Shell>,

    /// Use this config directory instead of ~/.config/codo
    #[arg(long, value_name = "PATH")]
    pub config_dir: Option<PathBuf>,

    /// Run as if codo was started in this directory
    #[arg(long, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Command to run in the container, passed through verbatim
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// What a parsed command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print a completion script.
    Completion(Shell),
    /// List image folders.
    ListImages,
    /// Print the resolved config of an image.
    ShowConfig,
    /// Build images, then run the command if one was given.
    Build,
    /// Run the command (or the image's default entrypoint).
    Run,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The action selected by the flags.
    pub fn action(&self) -> Action {
        if let Some(shell) = self.completion {
            Action::Completion(shell)
        } else if self.list_images {
            Action::ListImages
        } else if self.show_config {
            Action::ShowConfig
        } else if self.build {
            Action::Build
        } else {
            Action::Run
        }
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
