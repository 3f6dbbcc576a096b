//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - build: Build command arguments
//! - validate: Validate command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod build;
pub mod completions;
pub mod validate;

pub use build::BuildArgs;
pub use completions::CompletionsArgs;
pub use validate::ValidateArgs;

/// rscharm - build Juju charms from Rust packages
///
/// Turns a library crate that registers hooks with charm-hook into a
/// deployable charm directory.
#[derive(Parser, Debug)]
#[command(
    name = "rscharm",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Build Juju charms from Rust packages",
    long_about = "rscharm compiles a Rust package that registers its hooks, relations and config \
                  with charm-hook into a Juju charm: a runhook executable, one stub script per hook, \
                  metadata.yaml and config.yaml.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  rscharm build                          \x1b[90m# Build the package in the current directory\x1b[0m\n   \
                  rscharm build ./mycharm --source       \x1b[90m# Ship sources, compile on the unit\x1b[0m\n   \
                  rscharm build --dest /tmp/mycharm      \x1b[90m# Write the charm to an explicit directory\x1b[0m\n   \
                  rscharm validate $JUJU_REPOSITORY/trusty/mycharm \x1b[90m# Check a built charm\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a charm from a Rust package
    Build(BuildArgs),

    /// Check that a charm directory reads back correctly
    Validate(ValidateArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
