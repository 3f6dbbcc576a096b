//! Source mode: shipping the charm's sources so it compiles on the unit
//!
//! The charm package is copied into the runhook crate, every dependency is
//! vendored next to it with `cargo vendor`, and a `compile` script is
//! written that rebuilds `bin/runhook` offline.

use std::path::{Path, PathBuf};

use super::codegen::Templates;
use crate::charm::layout::{STAGED_PACKAGE_DIR, VENDOR_DIR};
use crate::charm::{AUTOGEN_MESSAGE, CharmLayout};
use crate::common::fs::{CopyOptions, copy_dir_recursive, write_executable, write_file};
use crate::error::Result;
use crate::error::fs::write_failed;
use crate::package::Package;
use crate::toolchain::Toolchain;
use crate::ui::BuildReporter;

/// Relative path the generated manifest uses for the staged charm package
pub fn staged_package_path() -> PathBuf {
    PathBuf::from(STAGED_PACKAGE_DIR)
}

/// Copy the charm package into the runhook crate
///
/// Build output and `.git` are skipped, as is the charm directory itself
/// when it lives inside the package.
pub fn stage_package(
    package: &Package,
    layout: &CharmLayout,
    reporter: &dyn BuildReporter,
) -> Result<()> {
    let dest = layout.staged_package();
    if dest.exists() {
        std::fs::remove_dir_all(&dest).map_err(|e| write_failed(&dest, e))?;
    }

    let charm_root = dunce::canonicalize(layout.root()).unwrap_or_else(|_| layout.root().to_path_buf());
    let options = CopyOptions::source_tree().excluding_path(charm_root);
    copy_dir_recursive(&package.dir, &dest, &options)?;
    reporter.info(&format!("copied {} to {}", package.dir.display(), dest.display()));

    if let Some(lockfile) = &package.lockfile {
        let target = layout.runhook_crate().join("Cargo.lock");
        std::fs::copy(lockfile, &target).map_err(|e| write_failed(&target, e))?;
    }
    Ok(())
}

/// A git repository that only exists while it is held
///
/// [`TransientRepo::finish`] removes the `.git` directory and reports a
/// failure to do so. Dropping an unfinished repo removes it as well, so it
/// never ends up in the charm when vendoring fails.
struct TransientRepo {
    git_dir: PathBuf,
    removed: bool,
}

impl TransientRepo {
    fn init(dir: &Path) -> Result<Self> {
        let repo = git2::Repository::init(dir)?;
        Ok(Self {
            git_dir: repo.path().to_path_buf(),
            removed: false,
        })
    }

    fn finish(mut self) -> Result<()> {
        self.removed = true;
        std::fs::remove_dir_all(&self.git_dir).map_err(|e| write_failed(&self.git_dir, e))
    }
}

impl Drop for TransientRepo {
    fn drop(&mut self) {
        if !self.removed {
            let _ = std::fs::remove_dir_all(&self.git_dir);
        }
    }
}

/// Vendor every dependency of the runhook crate into the charm
pub fn vendor_deps(
    layout: &CharmLayout,
    toolchain: &dyn Toolchain,
    reporter: &dyn BuildReporter,
) -> Result<()> {
    let crate_dir = layout.runhook_crate();
    let repo = TransientRepo::init(&crate_dir)?;

    let source_config = toolchain.vendor(&crate_dir, VENDOR_DIR, reporter)?;
    repo.finish()?;

    let config_path = crate_dir.join(".cargo").join("config.toml");
    write_file(
        &config_path,
        format!("# {AUTOGEN_MESSAGE}\n{source_config}"),
    )?;
    reporter.info(&format!("wrote {}", config_path.display()));
    Ok(())
}

/// Write the `compile` script at the charm root
pub fn write_compile_script(layout: &CharmLayout, templates: &Templates) -> Result<()> {
    write_executable(&layout.compile_script(), templates.compile_script()?)
}
