//! Charm metadata (metadata.yaml)

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::info::Scope;
use crate::error::charm::{metadata_invalid, metadata_missing};
use super::layout::METADATA_FILE;
use crate::error::invariant::serialize_failed;
use crate::error::Result;

/// Charm metadata from metadata.yaml
///
/// Keys rscharm does not know about are carried through unchanged so that
/// hand-written metadata survives a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub subordinate: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub provides: BTreeMap<String, RelationSpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requires: BTreeMap<String, RelationSpec>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub peers: BTreeMap<String, RelationSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// One relation entry under provides, requires or peers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RelationSpecRepr")]
pub struct RelationSpec {
    pub interface: String,

    #[serde(skip_serializing_if = "Scope::is_global")]
    pub scope: Scope,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
}

/// Relations may be written as `db: mysql` or as a full mapping
#[derive(Deserialize)]
#[serde(untagged)]
enum RelationSpecRepr {
    Interface(String),
    Full {
        interface: String,
        #[serde(default)]
        scope: Scope,
        #[serde(default)]
        limit: Option<u32>,
        #[serde(default)]
        optional: bool,
    },
}

impl From<RelationSpecRepr> for RelationSpec {
    fn from(repr: RelationSpecRepr) -> Self {
        match repr {
            RelationSpecRepr::Interface(interface) => RelationSpec {
                interface,
                scope: Scope::Global,
                limit: None,
                optional: false,
            },
            RelationSpecRepr::Full {
                interface,
                scope,
                limit,
                optional,
            } => RelationSpec {
                interface,
                scope,
                limit,
                optional,
            },
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}

impl Meta {
    /// Parse metadata from YAML without validating it
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Read and validate metadata.yaml at `path`
    pub fn read(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                metadata_missing(path.parent().unwrap_or(path).display().to_string())
            } else {
                crate::error::fs::read_failed(path, e)
            }
        })?;
        let meta = Self::from_yaml(&yaml)
            .map_err(|e| metadata_invalid(path.display().to_string(), e.to_string()))?;
        meta.validate()
            .map_err(|reason| metadata_invalid(path.display().to_string(), reason))?;
        Ok(meta)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| serialize_failed(METADATA_FILE, e))
    }

    /// Check the rules Juju applies when it reads a charm
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err("missing charm name".to_string());
        }
        if !super::is_valid_charm_name(&self.name) {
            return Err(format!("invalid charm name {:?}", self.name));
        }
        if self.summary.trim().is_empty() {
            return Err("missing summary".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("missing description".to_string());
        }

        let mut seen = BTreeSet::new();
        for (section, relations) in [
            ("provides", &self.provides),
            ("requires", &self.requires),
            ("peers", &self.peers),
        ] {
            for (name, spec) in relations {
                if name == "juju" || name.starts_with("juju-") {
                    return Err(format!("{section} relation {name:?} uses a reserved name"));
                }
                if spec.interface.trim().is_empty() {
                    return Err(format!("{section} relation {name:?} has no interface"));
                }
                if !seen.insert(name.as_str()) {
                    return Err(format!("relation {name:?} is declared more than once"));
                }
            }
        }

        if self.subordinate
            && !self
                .requires
                .values()
                .any(|spec| spec.scope == Scope::Container)
        {
            return Err(
                "subordinate charm needs at least one container-scoped requires relation"
                    .to_string(),
            );
        }

        Ok(())
    }
}
