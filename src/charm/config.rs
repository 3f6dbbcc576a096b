//! Charm configuration (config.yaml)

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::charm::config_invalid;
use super::layout::CONFIG_FILE;
use crate::error::invariant::serialize_failed;
use crate::error::Result;

/// Type of a config option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    #[default]
    String,
    Int,
    Float,
    Boolean,
}

impl OptionType {
    /// Whether `value` is acceptable as a default for this type
    pub fn accepts(self, value: &serde_yaml::Value) -> bool {
        match (self, value) {
            (OptionType::String, serde_yaml::Value::String(_))
            | (OptionType::Boolean, serde_yaml::Value::Bool(_))
            | (OptionType::Float, serde_yaml::Value::Number(_)) => true,
            (OptionType::Int, serde_yaml::Value::Number(n)) => n.is_i64() || n.is_u64(),
            _ => false,
        }
    }
}

/// One user-settable option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigOption {
    #[serde(rename = "type", default)]
    pub kind: OptionType,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,
}

/// Contents of config.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: BTreeMap<String, ConfigOption>,
}

impl Config {
    pub fn new(options: BTreeMap<String, ConfigOption>) -> Self {
        Self { options }
    }

    /// Parse config from YAML without validating it
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file is a config with no options
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    /// Read and validate config.yaml at `path`
    pub fn read(path: &Path) -> Result<Self> {
        let yaml =
            std::fs::read_to_string(path).map_err(|e| crate::error::fs::read_failed(path, e))?;
        let config = Self::from_yaml(&yaml)
            .map_err(|e| config_invalid(path.display().to_string(), e.to_string()))?;
        config
            .validate()
            .map_err(|reason| config_invalid(path.display().to_string(), reason))?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| serialize_failed(CONFIG_FILE, e))
    }

    /// Check that every default matches its option's declared type
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_options(&self.options)
    }
}

/// Check option names and defaults
pub fn validate_options(options: &BTreeMap<String, ConfigOption>) -> std::result::Result<(), String> {
    for (name, option) in options {
        if name.trim().is_empty() {
            return Err("config option with empty name".to_string());
        }
        if let Some(default) = &option.default {
            if !option.kind.accepts(default) {
                return Err(format!(
                    "option {name:?} has default {} which is not a {:?}",
                    serde_yaml::to_string(default)
                        .unwrap_or_default()
                        .trim_end(),
                    option.kind
                ));
            }
        }
    }
    Ok(())
}
