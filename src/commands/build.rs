//! Build command implementation
//!
//! The build process:
//! 1. Resolve the package directory and the charm destination
//! 2. Validate the target platform
//! 3. Read the package with `cargo metadata`
//! 4. Run the build pipeline in a scratch directory
//! 5. Report the charm directory (or abandon the progress display on error)

use std::path::{Path, PathBuf};

use console::style;

use crate::builder::{BuildOutcome, BuildRequest, CharmBuilder};
use crate::cli::BuildArgs;
use crate::common::fs::ensure_dir;
use crate::error::{CharmError, Result};
use crate::error::charm::package_not_found;
use crate::error::fs::io_error;
use crate::package::Package;
use crate::temp::create_scratch_dir;
use crate::toolchain::{CargoToolchain, TargetPlatform};
use crate::ui::{BuildReporter, ConsoleReporter};

/// Run build command
pub fn run(args: BuildArgs, verbose: bool) -> Result<()> {
    let package_dir = package_dir(args.package.as_deref())?;
    let charm_dir = destination(
        &package_dir,
        args.dest.as_deref(),
        args.repo.as_deref(),
        &args.series,
    )?;
    let platform = TargetPlatform::new(&args.target)?;

    ensure_dir(&charm_dir)?;
    let scratch = create_scratch_dir()?;

    let toolchain = CargoToolchain::new();
    let reporter = ConsoleReporter::new(verbose);

    let result = Package::resolve(&package_dir, &toolchain, &reporter).and_then(|package| {
        let request = BuildRequest {
            package,
            charm_dir: charm_dir.clone(),
            temp_dir: scratch.path().to_path_buf(),
            source: args.source,
            platform,
        };
        let builder = CharmBuilder::new(&request, &toolchain, &reporter)?;
        builder.build()
    });

    if args.keep_temp {
        let kept = scratch.keep();
        eprintln!("Scratch directory kept at {}", kept.display());
    }

    match result {
        Ok(outcome) => {
            reporter.finish(&summary(&outcome));
            println!("{}", outcome.charm_dir.display());
            Ok(())
        }
        Err(e) => {
            reporter.abandon();
            Err(e)
        }
    }
}

/// The package directory, made absolute
fn package_dir(package: Option<&Path>) -> Result<PathBuf> {
    let dir = match package {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()
            .map_err(|e| io_error(format!("Failed to get current directory: {e}")))?,
    };
    dunce::canonicalize(&dir).map_err(|_| package_not_found(dir.display().to_string()))
}

/// Where the charm is written
///
/// An explicit `dest` wins; otherwise the charm goes to
/// `<repo>/<series>/<package dir name>`.
fn destination(
    package_dir: &Path,
    dest: Option<&Path>,
    repo: Option<&Path>,
    series: &str,
) -> Result<PathBuf> {
    let dir = match (dest, repo) {
        (Some(dest), _) => dest.to_path_buf(),
        (None, Some(repo)) if !repo.as_os_str().is_empty() => {
            let name = package_dir
                .file_name()
                .ok_or_else(|| package_not_found(package_dir.display().to_string()))?;
            repo.join(series).join(name)
        }
        _ => return Err(CharmError::RepositoryNotSet),
    };
    std::path::absolute(&dir)
        .map_err(|e| io_error(format!("Failed to resolve {}: {e}", dir.display())))
}

fn summary(outcome: &BuildOutcome) -> String {
    let mut message = format!(
        "Built {} ({} hooks written",
        style(outcome.charm_dir.display()).bold(),
        outcome.hooks_written.len()
    );
    if !outcome.hooks_preserved.is_empty() {
        message.push_str(&format!(", {} kept", outcome.hooks_preserved.len()));
    }
    message.push(')');
    if outcome.source {
        message.push_str(", compiled on install");
    }
    message
}
