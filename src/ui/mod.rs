//! Build progress presentation layer
//!
//! This module handles:
//! - Reporting pipeline stages while a charm is built
//! - An interactive spinner using indicatif
//! - Verbose logging of every stage, detail and external command
//! - Silent reporting for tests
//!
//! All reporting goes through the [`BuildReporter`] trait, which is passed
//! explicitly into every pipeline stage instead of living in global state.

use console::{Term, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::builder::BuildStage;

/// Reporter for the charm build pipeline
pub trait BuildReporter {
    /// A pipeline stage is starting
    fn stage(&self, stage: BuildStage);

    /// Detail about the current stage
    fn info(&self, message: &str);

    /// An external command is about to run
    fn command(&self, command: &str);

    /// The build succeeded
    fn finish(&self, message: &str);

    /// Abandon on error
    fn abandon(&self);
}

/// Console reporter writing to stderr
///
/// Shows a spinner with the current stage, or a line per event in verbose mode.
pub struct ConsoleReporter {
    verbose: bool,
    spinner: Option<ProgressBar>,
}

impl ConsoleReporter {
    /// Create a console reporter; the spinner is only used on a terminal
    pub fn new(verbose: bool) -> Self {
        let spinner = if !verbose && Term::stderr().is_term() {
            let pb = ProgressBar::new_spinner();
            if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")
            {
                pb.set_style(spinner_style);
            }
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        Self { verbose, spinner }
    }
}

impl BuildReporter for ConsoleReporter {
    fn stage(&self, stage: BuildStage) {
        if let Some(ref pb) = self.spinner {
            pb.set_message(stage.description());
        } else if self.verbose {
            eprintln!("{} {}", style("==>").cyan().bold(), stage.description());
        }
    }

    fn info(&self, message: &str) {
        if self.verbose {
            eprintln!("    {message}");
        }
    }

    fn command(&self, command: &str) {
        if self.verbose {
            eprintln!("    {} {}", style("run").dim(), style(command).dim());
        }
    }

    fn finish(&self, message: &str) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
        eprintln!("{} {message}", style("✓").green().bold());
    }

    fn abandon(&self) {
        if let Some(ref pb) = self.spinner {
            pb.abandon();
        }
    }
}

/// Silent reporter
///
/// No-op implementation that does not display anything.
#[derive(Default)]
pub struct SilentReporter;

impl BuildReporter for SilentReporter {
    fn stage(&self, _stage: BuildStage) {}

    fn info(&self, _message: &str) {}

    fn command(&self, _command: &str) {}

    fn finish(&self, _message: &str) {}

    fn abandon(&self) {}
}
