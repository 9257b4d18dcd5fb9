//! # Error Hierarchy
//!
//! Structured error types for pipeval, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Two failure styles coexist:
//!
//! - **Terminal failures** ([`PipevalError::ValidationFailed`]) are raised once
//!   at the end of a validation pass and carry every accumulated problem, both
//!   as a rendered message and as a structured list.
//! - **Immediate failures** ([`PipevalError::ParamNotFound`],
//!   [`PipevalError::MissingSamplesheetBinding`], [`PipevalError::SchemaParse`])
//!   describe a request that cannot proceed at all.

use thiserror::Error;

/// Top-level error type for pipeval.
#[derive(Error, Debug)]
pub enum PipevalError {
    /// The schema document is malformed or not a mapping at top level.
    #[error("failed to parse schema {path}: {reason}")]
    SchemaParse {
        /// Path of the schema document.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A parameters file could not be read or is not a mapping.
    #[error("failed to load parameters from {path}: {reason}")]
    ParamsLoad {
        /// Path of the parameters file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("failed to load configuration from {path}: {reason}")]
    ConfigLoad {
        /// Path of the configuration file.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// A command-line parameter argument does not start with `--`.
    #[error("invalid parameter argument '{0}': expected --name, --name value or --name=value")]
    InvalidArgument(String),

    /// Parameter validation accumulated at least one error.
    #[error("{message}")]
    ValidationFailed {
        /// Fully rendered multi-line message, colorized when permitted.
        message: String,
        /// Individual error lines, in the order they were produced.
        errors: Vec<String>,
    },

    /// Help was requested for a parameter the schema does not declare.
    #[error("specified param '{0}' does not exist in JSON schema")]
    ParamNotFound(String),

    /// The samplesheet channel could not be bound to a schema fragment.
    #[error("{message}")]
    MissingSamplesheetBinding {
        /// Human-readable reason.
        message: String,
        /// Always empty; kept for parity with [`PipevalError::ValidationFailed`].
        errors: Vec<String>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipevalError {
    /// Structured error list carried by terminal failures.
    ///
    /// Empty for every variant other than [`PipevalError::ValidationFailed`].
    pub fn errors(&self) -> &[String] {
        match self {
            Self::ValidationFailed { errors, .. }
            | Self::MissingSamplesheetBinding { errors, .. } => errors,
            _ => &[],
        }
    }
}
