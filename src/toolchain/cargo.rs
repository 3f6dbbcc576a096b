//! Toolchain backed by the cargo on PATH

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use super::env::CARGO_BUILD_TARGET;
use super::{BuildSpec, Toolchain};
use crate::error::{CharmError, Result, toolchain};
use crate::ui::BuildReporter;

const CARGO_REMEDY: &str =
    "Install a Rust toolchain with rustup (https://rustup.rs) and make sure cargo is on PATH";

const VENDOR_REMEDY: &str =
    "cargo vendor ships with cargo since Rust 1.37; upgrade with `rustup update` or run `cargo install cargo-vendor`";

/// The real toolchain
#[derive(Debug, Default, Clone)]
pub struct CargoToolchain;

impl CargoToolchain {
    pub fn new() -> Self {
        Self
    }

    fn cargo(&self) -> Result<Command> {
        let cargo = which::which("cargo").map_err(|_| toolchain::not_found("cargo", CARGO_REMEDY))?;
        let mut cmd = Command::new(cargo);
        cmd.arg("--color").arg("never");
        Ok(cmd)
    }
}

impl Toolchain for CargoToolchain {
    fn metadata(&self, manifest: &Path, reporter: &dyn BuildReporter) -> Result<Vec<u8>> {
        let mut cmd = self.cargo()?;
        cmd.args(["metadata", "--format-version", "1", "--no-deps", "--manifest-path"])
            .arg(manifest);
        let output = run_captured(&mut cmd, "cargo", CARGO_REMEDY, reporter)?;
        Ok(output.stdout)
    }

    fn build(&self, spec: &BuildSpec<'_>, reporter: &dyn BuildReporter) -> Result<PathBuf> {
        let mut cmd = self.cargo()?;
        cmd.args(["build", "--release", "--manifest-path"])
            .arg(spec.manifest)
            .arg("--target-dir")
            .arg(spec.target_dir)
            .args(["--bin", spec.bin]);
        spec.env.apply(&mut cmd);
        for (key, value) in spec.env.iter() {
            match value {
                Some(value) => reporter.info(&format!("{key}={value}")),
                None => reporter.info(&format!("unset {key}")),
            }
        }
        run_captured(&mut cmd, "cargo", CARGO_REMEDY, reporter)?;

        let mut artifact = spec.target_dir.to_path_buf();
        if let Some(triple) = spec.env.resolve(CARGO_BUILD_TARGET) {
            artifact.push(triple);
        }
        artifact.push("release");
        artifact.push(format!("{}{}", spec.bin, std::env::consts::EXE_SUFFIX));
        Ok(artifact)
    }

    fn run(&self, exe: &Path, reporter: &dyn BuildReporter) -> Result<Vec<u8>> {
        let mut cmd = Command::new(exe);
        let output = run_captured(
            &mut cmd,
            &exe.display().to_string(),
            "Check that the build produced it",
            reporter,
        )?;
        Ok(output.stdout)
    }

    fn vendor(
        &self,
        crate_dir: &Path,
        vendor_dir: &str,
        reporter: &dyn BuildReporter,
    ) -> Result<String> {
        let mut cmd = self.cargo()?;
        // the printed config must name a path relative to crate_dir
        cmd.current_dir(crate_dir)
            .args(["vendor", "--manifest-path", "Cargo.toml", vendor_dir]);
        let output = run_captured(&mut cmd, "cargo", CARGO_REMEDY, reporter).map_err(|err| match err {
            CharmError::ToolFailed { ref stderr, .. } if is_missing_subcommand(stderr) => {
                toolchain::not_found("cargo-vendor", VENDOR_REMEDY)
            }
            other => other,
        })?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Older cargo says "no such subcommand", newer "no such command"
fn is_missing_subcommand(stderr: &str) -> bool {
    stderr.contains("no such subcommand") || stderr.contains("no such command")
}

/// Render a command line for logs and error messages
fn display_command(cmd: &Command) -> String {
    let program = Path::new(cmd.get_program())
        .file_name()
        .unwrap_or_else(|| cmd.get_program())
        .to_string_lossy()
        .into_owned();
    std::iter::once(program)
        .chain(cmd.get_args().map(|arg| arg.to_string_lossy().into_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `cmd` to completion, capturing its output
///
/// A spawn failure with `NotFound` means `tool` is missing; a non-zero exit
/// keeps the tool's stderr in the error.
fn run_captured(
    cmd: &mut Command,
    tool: &str,
    remedy: &str,
    reporter: &dyn BuildReporter,
) -> Result<Output> {
    let line = display_command(cmd);
    reporter.command(&line);

    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            toolchain::not_found(tool, remedy)
        } else {
            crate::error::fs::io_error(format!("cannot run {line}: {e}"))
        }
    })?;

    if !output.status.success() {
        return Err(toolchain::failed(line, output.status, &output.stderr));
    }
    Ok(output)
}
