//! Errors that mean rscharm itself produced a broken charm

use std::path::Path;

use super::CharmError;

/// The toolchain claimed success but left no executable behind
pub fn executable_missing(path: &Path) -> CharmError {
    CharmError::ExecutableMissing {
        path: path.display().to_string(),
    }
}

/// The freshly written charm does not read back
pub fn charm_unreadable(path: &Path, reason: impl std::fmt::Display) -> CharmError {
    CharmError::CharmUnreadable {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// A descriptor built in memory could not be encoded
pub fn serialize_failed(what: &str, reason: impl std::fmt::Display) -> CharmError {
    CharmError::SerializeFailed {
        what: what.to_string(),
        reason: reason.to_string(),
    }
}
