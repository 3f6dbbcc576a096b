//! Registration snapshot reported by the introspection probe
//!
//! The probe prints one JSON object on stdout:
//!
//! ```json
//! {"hooks": ["install", "start"],
//!  "relations": {"db": {"role": "provider", "interface": "mysql"}},
//!  "config": {"debug": {"type": "boolean", "description": "", "default": false}}}
//! ```
//!
//! Everything is validated here, before anything is written to the charm.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::ConfigOption;
use super::meta::RelationSpec;
use crate::error::charm::{probe_output, unknown_role};
use crate::error::{CharmError, Result};

/// Side of a relation a charm takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Provider,
    Requirer,
    Peer,
}

impl Role {
    /// Parse a role as registered by the charm, failing on anything unknown
    pub fn parse(relation: &str, role: &str) -> Result<Self> {
        match role {
            "provider" => Ok(Role::Provider),
            "requirer" => Ok(Role::Requirer),
            "peer" => Ok(Role::Peer),
            other => Err(unknown_role(relation, other)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Requirer => "requirer",
            Role::Peer => "peer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relation scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Global,
    Container,
}

impl Scope {
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn is_global(&self) -> bool {
        *self == Scope::Global
    }
}

/// A relation registered by the charm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub name: String,
    pub role: Role,
    pub interface: String,
    pub scope: Scope,
    pub limit: Option<u32>,
    pub optional: bool,
}

impl Relation {
    /// The metadata.yaml entry for this relation; the role picks the section
    pub fn spec(&self) -> RelationSpec {
        RelationSpec {
            interface: self.interface.clone(),
            scope: self.scope,
            limit: self.limit,
            optional: self.optional,
        }
    }
}

/// Hooks, relations and config options the charm registered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharmInfo {
    /// Hook names in registration order, without duplicates
    pub hooks: Vec<String>,
    pub relations: BTreeMap<String, Relation>,
    pub config: BTreeMap<String, ConfigOption>,
}

#[derive(Deserialize)]
struct ProbeInfo {
    #[serde(default)]
    hooks: Vec<String>,
    #[serde(default)]
    relations: Option<BTreeMap<String, ProbeRelation>>,
    #[serde(default)]
    config: Option<BTreeMap<String, ConfigOption>>,
}

#[derive(Deserialize)]
struct ProbeRelation {
    #[serde(default)]
    name: Option<String>,
    role: String,
    interface: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    optional: bool,
}

impl CharmInfo {
    /// Decode and validate the probe's stdout
    pub fn from_probe_output(output: &[u8]) -> Result<Self> {
        let probe: ProbeInfo = serde_json::from_slice(output).map_err(CharmError::from)?;

        let mut seen = HashSet::new();
        let mut hooks = Vec::with_capacity(probe.hooks.len());
        for hook in probe.hooks {
            validate_hook_name(&hook)?;
            if seen.insert(hook.clone()) {
                hooks.push(hook);
            }
        }

        let mut relations = BTreeMap::new();
        for (name, raw) in probe.relations.unwrap_or_default() {
            if let Some(inner) = &raw.name {
                if inner != &name {
                    return Err(probe_output(format!(
                        "relation registered as {name:?} calls itself {inner:?}"
                    )));
                }
            }
            let role = Role::parse(&name, &raw.role)?;
            let scope = match raw.scope.as_deref() {
                None | Some("" | "global") => Scope::Global,
                Some("container") => Scope::Container,
                Some(other) => {
                    return Err(probe_output(format!(
                        "relation {name:?} has unknown scope {other:?}"
                    )));
                }
            };
            if raw.interface.trim().is_empty() {
                return Err(probe_output(format!("relation {name:?} has no interface")));
            }
            relations.insert(
                name.clone(),
                Relation {
                    name,
                    role,
                    interface: raw.interface,
                    scope,
                    limit: raw.limit.filter(|&l| l > 0),
                    optional: raw.optional,
                },
            );
        }

        let config = probe.config.unwrap_or_default();
        super::config::validate_options(&config).map_err(probe_output)?;

        Ok(CharmInfo {
            hooks,
            relations,
            config,
        })
    }

    /// Relations filed under one metadata section
    pub fn relations_with_role(&self, role: Role) -> BTreeMap<String, RelationSpec> {
        self.relations
            .iter()
            .filter(|(_, rel)| rel.role == role)
            .map(|(name, rel)| (name.clone(), rel.spec()))
            .collect()
    }
}

/// Hook names become file names under hooks/, so they must stay inside it
pub fn validate_hook_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(CharmError::InvalidHookName {
            name: name.to_string(),
        })
    }
}
