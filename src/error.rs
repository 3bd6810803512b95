//! Error types for probing operations.
//!
//! This module defines [`ProbeError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - A failed compile or link is not an error; it is a probe outcome
//! - [`ProbeError::ToolInvocationFailure`] is swallowed at the flag
//!   resolution boundary and never reaches the caller of a probe
//! - [`ProbeError::MalformedExpression`] is the only error raised while
//!   probing; it aborts the run with exit status 2
//! - Use `anyhow::Error` (via `ProbeError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for probing operations.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A flag expression contains a backtick without a closing partner.
    #[error("Unmatched backtick: {expression}")]
    MalformedExpression { expression: String },

    /// A helper command embedded in a flag expression could not run.
    #[error("Helper command failed with exit code {code:?}: {command}")]
    ToolInvocationFailure { command: String, code: Option<i32> },

    /// A component refers to a library that is not in the catalog.
    #[error("Unknown library: {name}")]
    UnknownLibrary { name: String },

    /// A catalog flag template references an unknown variable.
    #[error("Unresolved variable: ${{{name}}}")]
    UnresolvedVariable { name: String },

    /// The requested link mode has no configuration in the catalog.
    #[error("Unknown link mode: {name}")]
    UnknownConfiguration { name: String },

    /// Failed to parse a catalog file.
    #[error("Failed to parse catalog at {path}: {message}")]
    CatalogParse { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProbeError {
    /// Process exit status for this error when it terminates the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            ProbeError::MalformedExpression { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for probing operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_expression_displays_expression() {
        let err = ProbeError::MalformedExpression {
            expression: "-I`sdl-config --cflags".into(),
        };
        assert!(err.to_string().contains("-I`sdl-config --cflags"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn tool_invocation_failure_displays_command_and_code() {
        let err = ProbeError::ToolInvocationFailure {
            command: "pkg-config --libs zlib".into(),
            code: Some(1),
        };
        let msg = err.to_string();
        assert!(msg.contains("pkg-config --libs zlib"));
        assert!(msg.contains("1"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn catalog_parse_displays_path_and_message() {
        let err = ProbeError::CatalogParse {
            path: PathBuf::from("/catalog.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/catalog.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn unknown_configuration_displays_name() {
        let err = ProbeError::UnknownConfiguration {
            name: "WEIRD".into(),
        };
        assert!(err.to_string().contains("WEIRD"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: ProbeError = io_err.into();
        assert!(matches!(err, ProbeError::Io(_)));
    }
}
