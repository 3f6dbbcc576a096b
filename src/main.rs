//! rscharm - build Juju charms from Rust packages
//!
//! A charm package is a Rust library that registers its hooks, relations and
//! config options with charm-hook. rscharm generates a dispatcher executable
//! for it, asks the compiled charm what it registered, and writes a charm
//! directory the Juju agent can deploy.

use clap::Parser;
use miette::Diagnostic;

mod builder;
mod charm;
mod cli;
mod commands;
mod common;
mod error;
mod package;
mod temp;
#[cfg(test)]
mod test_fixtures;
mod toolchain;
mod ui;

use cli::{Cli, Commands};
use error::CharmError;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => commands::build::run(args, cli.verbose),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

fn report(error: &CharmError) {
    eprintln!("Error: {}", error);
    if let Some(help) = error.root_cause().help() {
        eprintln!("  help: {}", help);
    }
}
