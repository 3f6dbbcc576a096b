//! Reading a charm directory the way the Juju agent does

use std::path::{Path, PathBuf};

use super::config::Config;
use super::layout::CharmLayout;
use super::meta::Meta;
use crate::error::charm::metadata_invalid;
use crate::error::{CharmError, Result};

/// A charm directory that has been read and checked
#[derive(Debug, Clone)]
pub struct CharmDir {
    pub path: PathBuf,
    pub meta: Meta,
    pub config: Option<Config>,
    /// Hook file names, sorted
    pub hooks: Vec<String>,
}

impl CharmDir {
    /// Read the charm at `path`
    ///
    /// Fails if metadata.yaml is missing or invalid, if its name differs from
    /// the directory name, if config.yaml exists but is invalid, or if any
    /// file under hooks/ is not executable. Subdirectories of hooks/ are
    /// helper libraries and are not hooks.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(CharmError::CharmNotFound {
                path: path.display().to_string(),
            });
        }
        let layout = CharmLayout::new(path);

        let meta_path = layout.metadata();
        let meta = Meta::read(&meta_path)?;
        let dir_name = layout.charm_name();
        if meta.name != dir_name {
            return Err(metadata_invalid(
                meta_path.display().to_string(),
                format!(
                    "charm name {:?} does not match directory name {dir_name:?}",
                    meta.name
                ),
            ));
        }

        let config_path = layout.config();
        let config = if config_path.exists() {
            Some(Config::read(&config_path)?)
        } else {
            None
        };

        let hooks = read_hooks(&layout.hooks_dir())?;

        Ok(Self {
            path: path.to_path_buf(),
            meta,
            config,
            hooks,
        })
    }
}

fn read_hooks(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut hooks = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| crate::error::fs::read_failed(dir, e))? {
        let entry = entry?;
        let path = entry.path();
        // follow symlinks: hooks are often links to a shared script
        let metadata = std::fs::metadata(&path).map_err(|e| crate::error::fs::read_failed(&path, e))?;
        if metadata.is_dir() {
            continue;
        }
        if !metadata.is_file() || !is_executable(&metadata) {
            return Err(CharmError::HookNotExecutable {
                path: path.display().to_string(),
            });
        }
        hooks.push(entry.file_name().to_string_lossy().into_owned());
    }
    hooks.sort();
    Ok(hooks)
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}
