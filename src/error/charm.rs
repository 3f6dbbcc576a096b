//! Errors in the charm package or in what it registers

use super::CharmError;

/// Creates a package not found error
pub fn package_not_found(path: impl Into<String>) -> CharmError {
    CharmError::PackageNotFound { path: path.into() }
}

/// Creates a metadata.yaml missing error
pub fn metadata_missing(path: impl Into<String>) -> CharmError {
    CharmError::MetadataMissing { path: path.into() }
}

/// Creates an invalid metadata error
pub fn metadata_invalid(path: impl Into<String>, reason: impl Into<String>) -> CharmError {
    CharmError::MetadataInvalid {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn config_invalid(path: impl Into<String>, reason: impl Into<String>) -> CharmError {
    CharmError::ConfigInvalid {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an unknown relation role error
pub fn unknown_role(relation: impl Into<String>, role: impl Into<String>) -> CharmError {
    CharmError::UnknownRelationRole {
        relation: relation.into(),
        role: role.into(),
    }
}

/// Creates an invalid probe output error
pub fn probe_output(reason: impl Into<String>) -> CharmError {
    CharmError::InvalidProbeOutput {
        reason: reason.into(),
    }
}
