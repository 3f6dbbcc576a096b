//! Resolving the charm package with `cargo metadata`
//!
//! A charm package is a library crate that exports
//! `pub fn register_hooks(r: &mut charm_hook::Registry)` and ships a
//! hand-written `metadata.yaml` next to its `Cargo.toml`. The dependency on
//! `charm-hook` is carried over into the generated crates unchanged so they
//! link the same dispatch library as the package.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::charm::layout::METADATA_FILE;
use crate::error::charm::{metadata_missing, package_not_found};
use crate::error::{CharmError, Result};
use crate::toolchain::Toolchain;
use crate::ui::BuildReporter;

/// The dispatch library every charm depends on
pub const HOOK_CRATE: &str = "charm-hook";

/// A resolved charm package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Cargo package name
    pub name: String,
    /// Rust name of the library target
    pub lib_name: String,
    /// Directory holding Cargo.toml and metadata.yaml
    pub dir: PathBuf,
    /// Lock file of the package's workspace, if it has one
    pub lockfile: Option<PathBuf>,
    pub hook_dependency: HookDependency,
}

/// Where a dependency comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySource {
    Registry,
    Path(PathBuf),
    Git {
        url: String,
        /// `branch`, `tag` or `rev` with its value
        reference: Option<(String, String)>,
    },
}

/// The package's dependency on the dispatch library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDependency {
    pub name: String,
    pub rename: Option<String>,
    pub req: String,
    pub source: DependencySource,
    pub features: Vec<String>,
    pub default_features: bool,
}

impl HookDependency {
    /// Key of the dependency in `[dependencies]`
    pub fn key(&self) -> &str {
        self.rename.as_deref().unwrap_or(&self.name)
    }

    /// Name the dependency has in Rust code
    pub fn crate_name(&self) -> String {
        self.key().replace('-', "_")
    }

    /// The dependency as a TOML inline table
    pub fn to_inline_table(&self) -> String {
        let mut fields = Vec::new();
        if self.rename.is_some() {
            fields.push(format!("package = {}", toml_string(&self.name)));
        }
        if self.req != "*" {
            fields.push(format!("version = {}", toml_string(&self.req)));
        }
        match &self.source {
            DependencySource::Registry => {}
            DependencySource::Path(path) => {
                fields.push(format!("path = {}", toml_string(&path.to_string_lossy())));
            }
            DependencySource::Git { url, reference } => {
                fields.push(format!("git = {}", toml_string(url)));
                if let Some((kind, value)) = reference {
                    fields.push(format!("{kind} = {}", toml_string(value)));
                }
            }
        }
        if !self.features.is_empty() {
            let features: Vec<String> = self.features.iter().map(|f| toml_string(f)).collect();
            fields.push(format!("features = [{}]", features.join(", ")));
        }
        if !self.default_features {
            fields.push("default-features = false".to_string());
        }
        format!("{{ {} }}", fields.join(", "))
    }
}

/// Quote a TOML basic string
///
/// JSON string escapes are a subset of TOML's.
pub fn toml_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[derive(Deserialize)]
struct CargoMetadata {
    packages: Vec<MetadataPackage>,
    workspace_root: PathBuf,
}

#[derive(Deserialize)]
struct MetadataPackage {
    name: String,
    manifest_path: PathBuf,
    #[serde(default)]
    targets: Vec<MetadataTarget>,
    #[serde(default)]
    dependencies: Vec<MetadataDependency>,
}

#[derive(Deserialize)]
struct MetadataTarget {
    name: String,
    kind: Vec<String>,
}

#[derive(Deserialize)]
struct MetadataDependency {
    name: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    req: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    rename: Option<String>,
    #[serde(default = "default_true")]
    uses_default_features: bool,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Package {
    /// Resolve the charm package in `dir`
    pub fn resolve(
        dir: &Path,
        toolchain: &dyn Toolchain,
        reporter: &dyn BuildReporter,
    ) -> Result<Self> {
        let manifest = dir.join("Cargo.toml");
        if !manifest.is_file() {
            return Err(package_not_found(dir.display().to_string()));
        }
        if !dir.join(METADATA_FILE).is_file() {
            return Err(metadata_missing(dir.display().to_string()));
        }
        let manifest = dunce::canonicalize(&manifest)
            .map_err(|e| crate::error::fs::read_failed(&manifest, e))?;

        let json = toolchain.metadata(&manifest, reporter)?;
        Self::from_metadata(&json, &manifest)
    }

    /// Pick the package for `manifest` out of `cargo metadata` output
    pub fn from_metadata(json: &[u8], manifest: &Path) -> Result<Self> {
        let metadata: CargoMetadata =
            serde_json::from_slice(json).map_err(|e| CharmError::PackageMetadataInvalid {
                reason: e.to_string(),
            })?;

        let package = metadata
            .packages
            .into_iter()
            .find(|p| same_path(&p.manifest_path, manifest))
            .ok_or_else(|| CharmError::PackageMetadataInvalid {
                reason: format!("no package with manifest {}", manifest.display()),
            })?;

        let lib_name = package
            .targets
            .iter()
            .find(|t| t.kind.iter().any(|k| k == "lib" || k == "rlib"))
            .map(|t| t.name.replace('-', "_"))
            .ok_or_else(|| CharmError::MissingLibraryTarget {
                package: package.name.clone(),
            })?;

        let dependency = package
            .dependencies
            .into_iter()
            .find(|d| d.name == HOOK_CRATE && d.kind.is_none())
            .ok_or_else(|| CharmError::MissingHookDependency {
                package: package.name.clone(),
                dependency: HOOK_CRATE.to_string(),
            })?;
        let hook_dependency = HookDependency {
            source: dependency_source(dependency.source.as_deref(), dependency.path)?,
            name: dependency.name,
            rename: dependency.rename,
            req: dependency.req,
            features: dependency.features,
            default_features: dependency.uses_default_features,
        };

        let dir = package
            .manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let lockfile = Some(metadata.workspace_root.join("Cargo.lock")).filter(|p| p.is_file());

        Ok(Package {
            name: package.name,
            lib_name,
            dir,
            lockfile,
            hook_dependency,
        })
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Recover the dependency source from cargo's source id
///
/// Path dependencies have no source id; git ones look like
/// `git+https://host/repo?branch=main`.
fn dependency_source(source: Option<&str>, path: Option<PathBuf>) -> Result<DependencySource> {
    match (source, path) {
        (_, Some(path)) => Ok(DependencySource::Path(path)),
        (None, None) => Err(CharmError::PackageMetadataInvalid {
            reason: format!("{HOOK_CRATE} has neither a source nor a path"),
        }),
        (Some(source), None) => {
            if source.starts_with("registry+") || source.starts_with("sparse+") {
                return Ok(DependencySource::Registry);
            }
            let Some(git) = source.strip_prefix("git+") else {
                return Err(CharmError::PackageMetadataInvalid {
                    reason: format!("unsupported source {source:?} for {HOOK_CRATE}"),
                });
            };
            let git = git.split('#').next().unwrap_or(git);
            let (url, query) = git.split_once('?').unwrap_or((git, ""));
            let reference = query.split('&').find_map(|pair| {
                let (key, value) = pair.split_once('=')?;
                matches!(key, "branch" | "tag" | "rev").then(|| (key.to_string(), value.to_string()))
            });
            Ok(DependencySource::Git {
                url: url.to_string(),
                reference,
            })
        }
    }
}
