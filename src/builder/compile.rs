//! Building generated crates

use std::path::Path;

use super::codegen::GeneratedCrate;
use crate::common::fs::{ensure_dir, make_executable, write_file};
use crate::error::Result;
use crate::error::fs::write_failed;
use crate::error::invariant::executable_missing;
use crate::toolchain::{BuildSpec, EnvOverlay, Toolchain};
use crate::ui::BuildReporter;

/// One build of a generated crate
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    pub generated: &'a GeneratedCrate,
    /// Where the crate's sources are written
    pub crate_dir: &'a Path,
    /// Where the executable ends up
    pub exe: &'a Path,
    /// Cargo's target directory
    pub target_dir: &'a Path,
    pub env: &'a EnvOverlay,
}

/// Write the crate to disk
pub fn write_crate(generated: &GeneratedCrate, crate_dir: &Path) -> Result<()> {
    write_file(&crate_dir.join("Cargo.toml"), &generated.manifest)?;
    write_file(&crate_dir.join("src").join("main.rs"), &generated.main)
}

/// Write the crate, build it and install the executable at `request.exe`
pub fn compile(
    request: &CompileRequest<'_>,
    toolchain: &dyn Toolchain,
    reporter: &dyn BuildReporter,
) -> Result<()> {
    write_crate(request.generated, request.crate_dir)?;
    if let Some(parent) = request.exe.parent() {
        ensure_dir(parent)?;
    }

    let manifest = request.crate_dir.join("Cargo.toml");
    let spec = BuildSpec {
        manifest: &manifest,
        target_dir: request.target_dir,
        bin: request.generated.program.name(),
        env: request.env,
    };
    let artifact = toolchain.build(&spec, reporter)?;
    if !artifact.is_file() {
        return Err(executable_missing(&artifact));
    }

    std::fs::copy(&artifact, request.exe).map_err(|e| write_failed(request.exe, e))?;
    make_executable(request.exe)?;
    if !request.exe.is_file() {
        return Err(executable_missing(request.exe));
    }
    reporter.info(&format!("installed {}", request.exe.display()));
    Ok(())
}
