//! Charm directory layout
//!
//! The Juju agent only accepts a charm whose files sit at these exact paths.

use std::path::{Path, PathBuf};

/// Directory holding the hook dispatcher executable
pub const BIN_DIR: &str = "bin";

/// Name of the hook dispatcher executable and of its generated crate
pub const EXE_NAME: &str = "runhook";

/// Directory holding one stub script per hook
pub const HOOKS_DIR: &str = "hooks";

/// Metadata descriptor at the charm root
pub const METADATA_FILE: &str = "metadata.yaml";

/// Config descriptor at the charm root
pub const CONFIG_FILE: &str = "config.yaml";

/// The runhook crate relative to the charm root
pub const RUNHOOK_CRATE_DIR: &str = "src/runhook";

/// Name the charm package is staged under inside the runhook crate
pub const STAGED_PACKAGE_DIR: &str = "charm";

/// Directory `cargo vendor` copies dependency sources into
pub const VENDOR_DIR: &str = "vendor";

/// Recompilation script at the charm root
pub const COMPILE_SCRIPT: &str = "compile";

/// Sentinel that makes every hook recompile before running
pub const COMPILE_ALWAYS: &str = "compile-always";

/// Paths inside one charm directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharmLayout {
    root: PathBuf,
}

impl CharmLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the charm as Juju sees it: the directory's base name
    pub fn charm_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn exe(&self) -> PathBuf {
        self.root.join(BIN_DIR).join(EXE_NAME)
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.root.join(HOOKS_DIR)
    }

    pub fn hook(&self, name: &str) -> PathBuf {
        self.hooks_dir().join(name)
    }

    pub fn metadata(&self) -> PathBuf {
        self.root.join(METADATA_FILE)
    }

    pub fn config(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// The generated runhook crate, `src/runhook`
    pub fn runhook_crate(&self) -> PathBuf {
        self.root.join(RUNHOOK_CRATE_DIR)
    }

    /// Where source mode stages a copy of the charm package
    pub fn staged_package(&self) -> PathBuf {
        self.runhook_crate().join(STAGED_PACKAGE_DIR)
    }

    pub fn compile_script(&self) -> PathBuf {
        self.root.join(COMPILE_SCRIPT)
    }
}
