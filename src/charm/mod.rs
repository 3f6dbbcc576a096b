//! Charm data model
//!
//! This module handles:
//! - The fixed layout of a charm directory ([`layout`])
//! - `metadata.yaml` and `config.yaml` descriptors ([`meta`], [`config`])
//! - The registration snapshot reported by the introspection probe ([`info`])
//! - Reading a whole charm directory back the way Juju would ([`dir`])

pub mod config;
pub mod dir;
pub mod info;
pub mod layout;
pub mod meta;

pub use config::{Config, ConfigOption, OptionType};
pub use dir::CharmDir;
pub use info::{CharmInfo, Relation, Role, Scope};
pub use layout::CharmLayout;
pub use meta::{Meta, RelationSpec};

/// Message placed at the top of every generated file
pub const AUTOGEN_MESSAGE: &str = "This file is automatically generated. Do not edit.";

/// Comment line prepended to generated YAML descriptors
pub fn yaml_autogen_comment() -> String {
    format!("# {AUTOGEN_MESSAGE}\n")
}

/// Check a charm name the way Juju does
///
/// A name is one or more hyphen-separated segments of lowercase letters and
/// digits. The first segment starts with a letter and every later segment
/// contains at least one letter.
pub fn is_valid_charm_name(name: &str) -> bool {
    let mut segments = name.split('-');
    let Some(first) = segments.next() else {
        return false;
    };
    if !first.starts_with(|c: char| c.is_ascii_lowercase()) || !is_name_segment(first) {
        return false;
    }
    segments.all(|s| is_name_segment(s) && s.chars().any(|c| c.is_ascii_lowercase()))
}

fn is_name_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}
