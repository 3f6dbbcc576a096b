//! Scratch space for builds
//!
//! Generated crates, cargo's target directory and the probe executable all
//! live in a per-build scratch directory under an absolute temp base, never
//! under the current directory (e.g. when TMPDIR=tmp).

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::error::Result;
use crate::error::fs::create_dir_failed;

/// Absolute directory that scratch directories are created in
pub fn temp_dir_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        #[cfg(windows)]
        {
            env::var("TEMP")
                .or_else(|_| env::var("TMP"))
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
        }
        #[cfg(not(windows))]
        {
            PathBuf::from("/tmp")
        }
    }
}

/// Create a scratch directory for one build, removed when dropped
pub fn create_scratch_dir() -> Result<TempDir> {
    let base = temp_dir_base();
    tempfile::Builder::new()
        .prefix("rscharm-")
        .tempdir_in(&base)
        .map_err(|e| create_dir_failed(&base, e))
}
