//! External toolchain invocation
//!
//! Every external process rscharm runs goes through the [`Toolchain`] trait:
//! cargo for package metadata, builds and vendoring, plus the freshly built
//! introspection probe. Processes run synchronously and their output is
//! captured so failures can carry the tool's own diagnostics.

pub mod cargo;
pub mod env;

use std::path::{Path, PathBuf};

pub use cargo::CargoToolchain;
pub use env::{EnvOverlay, TargetPlatform};

use crate::error::Result;
use crate::ui::BuildReporter;

/// One `cargo build` of a generated crate
#[derive(Debug, Clone, Copy)]
pub struct BuildSpec<'a> {
    /// Manifest of the crate to build
    pub manifest: &'a Path,
    /// Cargo target directory, kept outside the charm
    pub target_dir: &'a Path,
    /// Name of the binary target
    pub bin: &'a str,
    pub env: &'a EnvOverlay,
}

/// Runs the external tools the build pipeline depends on
pub trait Toolchain {
    /// `cargo metadata` JSON for the package at `manifest`
    fn metadata(&self, manifest: &Path, reporter: &dyn BuildReporter) -> Result<Vec<u8>>;

    /// Build a binary and return the path cargo should have written it to
    fn build(&self, spec: &BuildSpec<'_>, reporter: &dyn BuildReporter) -> Result<PathBuf>;

    /// Run an executable without arguments and return its stdout
    fn run(&self, exe: &Path, reporter: &dyn BuildReporter) -> Result<Vec<u8>>;

    /// Vendor all dependencies of the crate in `crate_dir` into
    /// `crate_dir/<vendor_dir>`, returning the cargo source replacement
    /// config that points at them
    fn vendor(
        &self,
        crate_dir: &Path,
        vendor_dir: &str,
        reporter: &dyn BuildReporter,
    ) -> Result<String>;
}
