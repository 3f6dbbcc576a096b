//! Error types and handling for rscharm
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`charm`]: errors in the package or its charm declarations (input errors)
//! - [`toolchain`]: cargo and other external tool failures
//! - [`invariant`]: the pipeline produced an artifact it cannot read back
//! - [`fs`]: file system errors

#![allow(dead_code)]

pub mod charm;
pub mod fs;
pub mod invariant;
pub mod toolchain;


use miette::Diagnostic;
use thiserror::Error;

use crate::builder::BuildStage;

/// Broad classification of a [`CharmError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The package or its declarations are wrong; the user must fix them
    Input,
    /// An external tool failed or could not be found
    Toolchain,
    /// The pipeline produced an inconsistent artifact (a defect in rscharm)
    Invariant,
    /// Reading or writing the file system failed
    Io,
}

/// Main error type for rscharm operations
#[derive(Error, Diagnostic, Debug)]
pub enum CharmError {
    // Package errors
    #[error("No Cargo package found at: {path}")]
    #[diagnostic(
        code(rscharm::package::not_found),
        help("Pass the directory containing the charm's Cargo.toml")
    )]
    PackageNotFound { path: String },

    #[error("Package {package} has no library target")]
    #[diagnostic(
        code(rscharm::package::no_library),
        help("The charm must be a library crate exporting `pub fn register_hooks(r: &mut charm_hook::Registry)`")
    )]
    MissingLibraryTarget { package: String },

    #[error("Package {package} does not depend on {dependency}")]
    #[diagnostic(
        code(rscharm::package::no_hook_dependency),
        help("Add charm-hook to the [dependencies] of the charm package")
    )]
    MissingHookDependency { package: String, dependency: String },

    #[error("Cannot read package metadata: {reason}")]
    #[diagnostic(code(rscharm::package::metadata_failed))]
    PackageMetadataInvalid { reason: String },

    #[error("No charm directory at: {path}")]
    #[diagnostic(code(rscharm::charm::not_found))]
    CharmNotFound { path: String },

    #[error("Invalid target triple {triple:?}")]
    #[diagnostic(
        code(rscharm::config::invalid_target),
        help("Use a full target triple such as x86_64-unknown-linux-musl")
    )]
    InvalidTarget { triple: String },

    // Charm declaration errors
    #[error("No metadata.yaml found in {path}")]
    #[diagnostic(
        code(rscharm::charm::metadata_missing),
        help("Every charm package needs a hand-written metadata.yaml with at least name, summary and description")
    )]
    MetadataMissing { path: String },

    #[error("Invalid metadata in {path}: {reason}")]
    #[diagnostic(code(rscharm::charm::metadata_invalid))]
    MetadataInvalid { path: String, reason: String },

    #[error("Invalid config in {path}: {reason}")]
    #[diagnostic(code(rscharm::charm::config_invalid))]
    ConfigInvalid { path: String, reason: String },

    #[error("Unknown role {role:?} in relation {relation:?}")]
    #[diagnostic(
        code(rscharm::charm::unknown_role),
        help("Relations must be registered with role provider, requirer or peer")
    )]
    UnknownRelationRole { relation: String, role: String },

    #[error("Invalid hook name {name:?}")]
    #[diagnostic(
        code(rscharm::charm::invalid_hook_name),
        help("Hook names may only contain ASCII letters, digits, '-', '_' and '.'")
    )]
    InvalidHookName { name: String },

    #[error("Hook {path} is not an executable file")]
    #[diagnostic(
        code(rscharm::charm::hook_not_executable),
        help("Hooks are run directly by the agent; chmod +x the file")
    )]
    HookNotExecutable { path: String },

    #[error("Invalid charm name {name:?}")]
    #[diagnostic(
        code(rscharm::charm::invalid_name),
        help("Charm names start with a lowercase letter and contain lowercase letters, digits and single hyphens")
    )]
    InvalidCharmName { name: String },

    #[error("Invalid introspection output: {reason}")]
    #[diagnostic(code(rscharm::charm::probe_output))]
    InvalidProbeOutput { reason: String },

    #[error("No charm repository given")]
    #[diagnostic(
        code(rscharm::config::repository_not_set),
        help("Set JUJU_REPOSITORY, or pass --repo or --dest")
    )]
    RepositoryNotSet,

    // Toolchain errors
    #[error("{tool} executable not found")]
    #[diagnostic(code(rscharm::toolchain::not_found))]
    ToolNotFound {
        tool: String,
        #[help]
        remedy: String,
    },

    #[error("`{command}` failed ({status}):\n{stderr}")]
    #[diagnostic(code(rscharm::toolchain::failed))]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Template rendering failed: {message}")]
    #[diagnostic(code(rscharm::codegen::template_failed))]
    TemplateFailed { message: String },

    // Invariant violations
    #[error("{path} was not built although the toolchain reported success")]
    #[diagnostic(
        code(rscharm::invariant::executable_missing),
        help("This is a bug in rscharm; please report it")
    )]
    ExecutableMissing { path: String },

    #[error("charm in {path} will not read correctly; we've broken it, sorry: {reason}")]
    #[diagnostic(
        code(rscharm::invariant::charm_unreadable),
        help("This is a bug in rscharm; please report it")
    )]
    CharmUnreadable { path: String, reason: String },

    #[error("cannot encode {what}: {reason}")]
    #[diagnostic(
        code(rscharm::invariant::serialize_failed),
        help("This is a bug in rscharm; please report it")
    )]
    SerializeFailed { what: String, reason: String },

    // Git errors
    #[error("Git operation failed: {message}")]
    #[diagnostic(code(rscharm::git::operation_failed))]
    GitOperationFailed { message: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(rscharm::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(rscharm::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to create directory: {path}: {reason}")]
    #[diagnostic(code(rscharm::fs::create_dir_failed))]
    DirCreateFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(rscharm::fs::io_error))]
    IoError { message: String },

    // Stage context
    #[error("{stage}: {source}")]
    #[diagnostic(code(rscharm::build::stage_failed))]
    Stage {
        stage: BuildStage,
        source: Box<CharmError>,
    },
}

impl CharmError {
    /// Wrap this error with the pipeline stage it surfaced in
    pub fn in_stage(self, stage: BuildStage) -> Self {
        CharmError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all stage context removed
    pub fn root_cause(&self) -> &CharmError {
        match self {
            CharmError::Stage { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Classify the root cause of this error
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            CharmError::ToolNotFound { .. }
            | CharmError::ToolFailed { .. }
            | CharmError::GitOperationFailed { .. } => ErrorKind::Toolchain,
            CharmError::ExecutableMissing { .. }
            | CharmError::CharmUnreadable { .. }
            | CharmError::SerializeFailed { .. }
            | CharmError::TemplateFailed { .. } => ErrorKind::Invariant,
            CharmError::FileReadFailed { .. }
            | CharmError::FileWriteFailed { .. }
            | CharmError::DirCreateFailed { .. }
            | CharmError::IoError { .. } => ErrorKind::Io,
            _ => ErrorKind::Input,
        }
    }

    /// Whether the pipeline itself produced an inconsistent artifact
    pub fn is_invariant_violation(&self) -> bool {
        self.kind() == ErrorKind::Invariant
    }
}

/// Extension for attaching stage context to results
pub trait StageContext<T> {
    fn stage(self, stage: BuildStage) -> Result<T>;
}

impl<T> StageContext<T> for Result<T> {
    fn stage(self, stage: BuildStage) -> Result<T> {
        self.map_err(|e| e.in_stage(stage))
    }
}

impl From<std::io::Error> for CharmError {
    fn from(err: std::io::Error) -> Self {
        CharmError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CharmError {
    fn from(err: serde_json::Error) -> Self {
        CharmError::InvalidProbeOutput {
            reason: err.to_string(),
        }
    }
}

impl From<git2::Error> for CharmError {
    fn from(err: git2::Error) -> Self {
        CharmError::GitOperationFailed {
            message: err.message().to_string(),
        }
    }
}

impl From<tera::Error> for CharmError {
    fn from(err: tera::Error) -> Self {
        // tera keeps the useful part of the message in the source chain
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        CharmError::TemplateFailed { message }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CharmError>;
