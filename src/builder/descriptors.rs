//! Writing metadata.yaml and config.yaml from the registration snapshot

use std::path::Path;

use crate::charm::layout::METADATA_FILE;
use crate::charm::{AUTOGEN_MESSAGE, CharmInfo, CharmLayout, Config, Meta, Role, yaml_autogen_comment};
use crate::common::fs::write_file;
use crate::error::charm::{metadata_invalid, metadata_missing};
use crate::error::{CharmError, Result};
use crate::ui::BuildReporter;

/// Write `metadata.yaml` into the charm
///
/// Starts from the hand-written metadata in `package_dir`. The name is
/// replaced by the charm directory's name and the relation sections by the
/// registered relations.
pub fn write_meta(
    layout: &CharmLayout,
    package_dir: &Path,
    info: &CharmInfo,
    reporter: &dyn BuildReporter,
) -> Result<()> {
    let base_path = package_dir.join(METADATA_FILE);
    let yaml = std::fs::read_to_string(&base_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            metadata_missing(package_dir.display().to_string())
        } else {
            crate::error::fs::read_failed(&base_path, e)
        }
    })?;
    let mut meta = Meta::from_yaml(&yaml)
        .map_err(|e| metadata_invalid(base_path.display().to_string(), e.to_string()))?;

    let name = layout.charm_name();
    if !crate::charm::is_valid_charm_name(&name) {
        return Err(CharmError::InvalidCharmName { name });
    }
    if meta.name != name {
        reporter.info(&format!("renaming charm {:?} to {name:?}", meta.name));
    }
    meta.name = name;
    meta.provides = info.relations_with_role(Role::Provider);
    meta.requires = info.relations_with_role(Role::Requirer);
    meta.peers = info.relations_with_role(Role::Peer);
    meta.validate()
        .map_err(|reason| metadata_invalid(base_path.display().to_string(), reason))?;

    let contents = format!("{}{}", yaml_autogen_comment(), meta.to_yaml()?);
    write_file(&layout.metadata(), contents)
}

/// Write `config.yaml` when the charm registered any options
///
/// Returns whether a file was written. With no options, a config.yaml left
/// by an earlier build is removed; one written by hand is kept.
pub fn write_config(
    layout: &CharmLayout,
    info: &CharmInfo,
    reporter: &dyn BuildReporter,
) -> Result<bool> {
    let path = layout.config();
    if info.config.is_empty() {
        if is_generated(&path) {
            std::fs::remove_file(&path).map_err(|e| crate::error::fs::write_failed(&path, e))?;
            reporter.info("removed stale config.yaml");
        }
        return Ok(false);
    }

    let config = Config::new(info.config.clone());
    let contents = format!("{}{}", yaml_autogen_comment(), config.to_yaml()?);
    write_file(&path, contents)?;
    Ok(true)
}

fn is_generated(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .map(|content| {
            content
                .lines()
                .next()
                .is_some_and(|line| line.contains(AUTOGEN_MESSAGE))
        })
        .unwrap_or(false)
}
