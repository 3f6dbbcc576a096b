//! External tool errors

use std::process::ExitStatus;

use super::CharmError;

/// Creates a tool not found error carrying the remedy shown to the user
pub fn not_found(tool: impl Into<String>, remedy: impl Into<String>) -> CharmError {
    CharmError::ToolNotFound {
        tool: tool.into(),
        remedy: remedy.into(),
    }
}

/// Creates a tool failure, keeping the tool's stderr verbatim
pub fn failed(command: impl Into<String>, status: ExitStatus, stderr: &[u8]) -> CharmError {
    CharmError::ToolFailed {
        command: command.into(),
        status: status.to_string(),
        stderr: String::from_utf8_lossy(stderr).trim_end().to_string(),
    }
}
