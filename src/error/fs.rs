//! File system errors

use std::path::Path;

use super::CharmError;

/// Creates a read failure for `path`
pub fn read_failed(path: &Path, err: impl std::fmt::Display) -> CharmError {
    CharmError::FileReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a write failure for `path`
pub fn write_failed(path: &Path, err: impl std::fmt::Display) -> CharmError {
    CharmError::FileWriteFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates a directory creation failure for `path`
pub fn create_dir_failed(path: &Path, err: impl std::fmt::Display) -> CharmError {
    CharmError::DirCreateFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> CharmError {
    CharmError::IoError {
        message: message.into(),
    }
}
