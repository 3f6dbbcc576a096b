//! Common file system operations with unified error handling

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;
use crate::error::fs::{create_dir_failed, read_failed, write_failed};

#[derive(Default, Clone)]
pub struct CopyOptions {
    /// File or directory names skipped directly below the source root
    pub exclude: Vec<String>,
    /// Absolute paths skipped, with everything below them
    pub exclude_paths: Vec<PathBuf>,
}

impl CopyOptions {
    /// Skip build output and version control metadata
    pub fn source_tree() -> Self {
        Self {
            exclude: vec!["target".to_string(), ".git".to_string()],
            exclude_paths: Vec::new(),
        }
    }

    /// Also skip `path`
    #[must_use]
    pub fn excluding_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclude_paths.push(path.into());
        self
    }

    fn is_excluded(&self, path: &Path, depth: usize) -> bool {
        if depth == 1
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| self.exclude.iter().any(|e| e == name))
        {
            return true;
        }
        self.exclude_paths.iter().any(|p| p == path)
    }
}

/// Copy a directory recursively with options
///
/// Symlinks are copied as the files they point to; links to directories
/// are skipped.
pub fn copy_dir_recursive(src: &Path, dst: &Path, options: &CopyOptions) -> Result<()> {
    ensure_dir(dst)?;

    let walker = WalkDir::new(src)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !options.is_excluded(entry.path(), entry.depth()));

    for entry in walker {
        let entry = entry.map_err(|e| read_failed(src, e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| read_failed(entry.path(), e))?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            ensure_dir(&target)?;
        } else if entry.path().is_file() {
            fs::copy(entry.path(), &target).map_err(|e| write_failed(&target, e))?;
        }
    }

    Ok(())
}

/// Create `dir` and its parents
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| create_dir_failed(dir, e))
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| write_failed(path, e))
}

/// Write an executable file (mode 0755)
pub fn write_executable(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    write_file(path, contents)?;
    make_executable(path)
}

/// Set mode 0755 on `path`
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|e| write_failed(path, e))
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Whether `path` exists at all, including as a dangling symlink
pub fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
