//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides helper functions to create common test environments
//! (temp directories, charm packages) and a [`FakeToolchain`] that stands in
//! for cargo, so the build pipeline can be exercised without compiling
//! anything.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, write_package, FakeToolchain};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let package_dir = write_package(temp.path(), "my-charm");
//!     let toolchain = FakeToolchain::new().with_probe_output(SCENARIO_PROBE_OUTPUT);
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{CharmError, Result, toolchain};
use crate::package::{DependencySource, HOOK_CRATE, HookDependency, Package};
use crate::toolchain::{BuildSpec, EnvOverlay, Toolchain};
use crate::ui::{BuildReporter, SilentReporter};

/// Probe output for a charm with three hooks, a `db` provider relation and
/// a boolean `debug` option
pub const SCENARIO_PROBE_OUTPUT: &str = r#"{
    "hooks": ["install", "start", "config-changed"],
    "relations": {
        "db": {"name": "db", "role": "provider", "interface": "mysql"}
    },
    "config": {
        "debug": {"type": "boolean", "description": "Enable debug logging", "default": false}
    }
}"#;

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` to ensure temp dirs are never
/// created under the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// Create test files in a directory.
///
/// Takes a list of (path, content) tuples and creates those files.
/// Paths are relative to the provided base directory.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(temp: &TempDir, files: &[(&str, &str)]) {
    for (path, content) in files {
        let full_path = temp.path().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }
}

/// Write an executable file, creating parent directories.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_executable(path: &Path, content: &str) {
    crate::common::fs::write_executable(path, content).expect("Failed to write executable");
}

/// Write a charm package named `name` under `parent`.
///
/// The package has a `Cargo.toml` depending on charm-hook, a `src/lib.rs`
/// with `register_hooks` and a base `metadata.yaml`.
///
/// # Panics
///
/// Panics if any file cannot be written.
#[must_use]
pub fn write_package(parent: &Path, name: &str) -> PathBuf {
    let dir = parent.join(name);
    std::fs::create_dir_all(dir.join("src")).expect("Failed to create package");
    std::fs::write(
        dir.join("Cargo.toml"),
        format!(
            "[package]\nname = \"{name}\"\nversion = \"0.1.0\"\nedition = \"2021\"\n\n[dependencies]\ncharm-hook = \"0.2\"\n"
        ),
    )
    .expect("Failed to write Cargo.toml");
    std::fs::write(
        dir.join("src/lib.rs"),
        "pub fn register_hooks(r: &mut charm_hook::Registry) {\n    r.register_hook(\"start\", |_| Ok(()));\n}\n",
    )
    .expect("Failed to write lib.rs");
    std::fs::write(
        dir.join("metadata.yaml"),
        format!("name: {name}\nsummary: Test charm\ndescription: A charm used in tests.\n"),
    )
    .expect("Failed to write metadata.yaml");
    dir
}

/// Resolve a package written by [`write_package`] through the fake toolchain.
///
/// # Panics
///
/// Panics if the package does not resolve.
#[must_use]
pub fn resolve_package(dir: &Path) -> Package {
    Package::resolve(dir, &FakeToolchain::new(), &SilentReporter).expect("Failed to resolve package")
}

/// A package value that is not backed by any files
#[must_use]
pub fn sample_package() -> Package {
    Package {
        name: "my-charm".to_string(),
        lib_name: "my_charm".to_string(),
        dir: PathBuf::from("/work/my-charm"),
        lockfile: None,
        hook_dependency: HookDependency {
            name: HOOK_CRATE.to_string(),
            rename: None,
            req: "^0.2".to_string(),
            source: DependencySource::Registry,
            features: Vec::new(),
            default_features: true,
        },
    }
}

/// `cargo metadata --no-deps` output for a single package
#[must_use]
pub fn cargo_metadata_json(name: &str, manifest: &Path, kinds: &[&str], with_hook: bool) -> String {
    let dependencies = if with_hook {
        serde_json::json!([{
            "name": HOOK_CRATE,
            "source": "registry+https://github.com/rust-lang/crates.io-index",
            "req": "^0.2",
            "kind": null,
            "rename": null,
            "optional": false,
            "uses_default_features": true,
            "features": [],
            "target": null
        }])
    } else {
        serde_json::json!([])
    };
    let workspace_root = manifest.parent().unwrap_or(manifest);
    serde_json::json!({
        "packages": [{
            "name": name,
            "version": "0.1.0",
            "manifest_path": manifest,
            "targets": [{"name": name, "kind": kinds, "src_path": "src/lib.rs"}],
            "dependencies": dependencies
        }],
        "workspace_root": workspace_root,
        "version": 1
    })
    .to_string()
}

/// A `cargo build` the fake toolchain was asked for
#[derive(Debug, Clone)]
pub struct RecordedBuild {
    pub manifest: PathBuf,
    pub bin: String,
    pub env: EnvOverlay,
}

/// Toolchain that never runs a process
///
/// Builds drop a placeholder executable where cargo would put one, the
/// probe "prints" canned JSON and vendoring writes a stub vendor tree.
pub struct FakeToolchain {
    probe_output: String,
    artifact: bool,
    build_error: Option<String>,
    vendor_available: bool,
    builds: RefCell<Vec<RecordedBuild>>,
    vendor_saw_git: Cell<Option<bool>>,
}

impl FakeToolchain {
    #[must_use]
    pub fn new() -> Self {
        Self {
            probe_output: r#"{"hooks": []}"#.to_string(),
            artifact: true,
            build_error: None,
            vendor_available: true,
            builds: RefCell::new(Vec::new()),
            vendor_saw_git: Cell::new(None),
        }
    }

    #[must_use]
    pub fn with_probe_output(mut self, json: &str) -> Self {
        self.probe_output = json.to_string();
        self
    }

    /// Report success without producing an executable
    #[must_use]
    pub fn without_artifact(mut self) -> Self {
        self.artifact = false;
        self
    }

    /// Fail every build with `stderr`
    #[must_use]
    pub fn with_build_error(mut self, stderr: &str) -> Self {
        self.build_error = Some(stderr.to_string());
        self
    }

    /// Behave as if `cargo vendor` is not installed
    #[must_use]
    pub fn without_vendor(mut self) -> Self {
        self.vendor_available = false;
        self
    }

    pub fn builds(&self) -> Vec<RecordedBuild> {
        self.builds.borrow().clone()
    }

    /// Whether a git repository existed while vendoring ran
    pub fn vendor_saw_git(&self) -> Option<bool> {
        self.vendor_saw_git.get()
    }
}

impl Default for FakeToolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain for FakeToolchain {
    fn metadata(&self, manifest: &Path, _reporter: &dyn BuildReporter) -> Result<Vec<u8>> {
        let name = manifest
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(cargo_metadata_json(&name, manifest, &["lib"], true).into_bytes())
    }

    fn build(&self, spec: &BuildSpec<'_>, reporter: &dyn BuildReporter) -> Result<PathBuf> {
        reporter.command(&format!("cargo build --bin {}", spec.bin));
        self.builds.borrow_mut().push(RecordedBuild {
            manifest: spec.manifest.to_path_buf(),
            bin: spec.bin.to_string(),
            env: spec.env.clone(),
        });
        if let Some(stderr) = &self.build_error {
            return Err(CharmError::ToolFailed {
                command: format!("cargo build --bin {}", spec.bin),
                status: "exit status: 101".to_string(),
                stderr: stderr.clone(),
            });
        }

        let artifact = spec.target_dir.join("release").join(spec.bin);
        if self.artifact {
            crate::common::fs::write_executable(&artifact, "#!/bin/sh\n")?;
        }
        Ok(artifact)
    }

    fn run(&self, exe: &Path, _reporter: &dyn BuildReporter) -> Result<Vec<u8>> {
        if !exe.is_file() {
            return Err(toolchain::not_found(exe.display().to_string(), "build it first"));
        }
        Ok(self.probe_output.clone().into_bytes())
    }

    fn vendor(
        &self,
        crate_dir: &Path,
        vendor_dir: &str,
        _reporter: &dyn BuildReporter,
    ) -> Result<String> {
        self.vendor_saw_git
            .set(Some(crate_dir.join(".git").is_dir()));
        if !self.vendor_available {
            return Err(toolchain::not_found("cargo-vendor", "cargo install cargo-vendor"));
        }
        crate::common::fs::write_file(
            &crate_dir.join(vendor_dir).join("charm-hook-0.2.0").join("Cargo.toml"),
            "[package]\nname = \"charm-hook\"\n",
        )?;
        Ok(format!(
            "[source.crates-io]\nreplace-with = \"vendored-sources\"\n\n[source.vendored-sources]\ndirectory = \"{vendor_dir}\"\n"
        ))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_write_package() {
        let temp = create_temp_dir();
        let dir = write_package(temp.path(), "my-charm");
        assert!(dir.join("Cargo.toml").is_file());
        assert!(dir.join("src/lib.rs").is_file());
        assert!(dir.join("metadata.yaml").is_file());
    }

    #[test]
    fn test_fake_build_records_and_writes_artifact() {
        let temp = create_temp_dir();
        let toolchain = FakeToolchain::new();
        let env = EnvOverlay::host();
        let artifact = toolchain
            .build(
                &BuildSpec {
                    manifest: &temp.path().join("Cargo.toml"),
                    target_dir: &temp.path().join("target"),
                    bin: "runhook",
                    env: &env,
                },
                &SilentReporter,
            )
            .expect("builds");

        assert!(artifact.is_file());
        assert_eq!(toolchain.builds().len(), 1);
    }
}
