//! Error types for the Gnosis server
//!
//! This module provides the crate-wide error enum using thiserror for
//! structured error definitions and anyhow at the binary boundary.

use thiserror::Error;

/// Main error type for Gnosis operations
#[derive(Error, Debug)]
pub enum GnosisError {
    /// Tag outside the closed gnoseological tag set
    #[error("Invalid tag: '{0}'")]
    InvalidTag(String),

    /// Fallacy or materiality selector outside its closed set
    #[error("Invalid {field}: '{value}'")]
    InvalidSelector { field: &'static str, value: String },

    /// Tool arguments did not match the expected shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required tool parameter was absent
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// Journey import text was not parseable
    #[error("Failed to parse journey: {0}")]
    JourneyParse(String),

    /// Journey import text parsed but had the wrong structure
    #[error("Invalid journey format: {0}")]
    JourneyFormat(String),

    /// No diagnosticator matched the requested name, id or group
    #[error("Diagnosticator not found: {0}")]
    DiagnosticatorNotFound(String),

    /// Pathology table definition could not be loaded
    #[error("Invalid pathology table: {0}")]
    InvalidTable(String),

    /// Unknown classification mode
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// Unknown tool name in tools/call
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Unknown MCP resource URI
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// MCP protocol error
    #[error("MCP protocol error: {0}")]
    McpProtocol(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl GnosisError {
    /// Whether the error is a caller-correctable input problem.
    ///
    /// Validation errors are reported to the model as tool results flagged
    /// `isError`, everything else surfaces as a protocol-level failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GnosisError::InvalidTag(_)
                | GnosisError::InvalidSelector { .. }
                | GnosisError::InvalidInput(_)
                | GnosisError::MissingParameter(_)
                | GnosisError::JourneyParse(_)
                | GnosisError::JourneyFormat(_)
                | GnosisError::DiagnosticatorNotFound(_)
                | GnosisError::UnknownMode(_)
        )
    }
}

/// Result type alias for Gnosis operations
pub type Result<T> = std::result::Result<T, GnosisError>;

/// Convert anyhow::Error to GnosisError
impl From<anyhow::Error> for GnosisError {
    fn from(err: anyhow::Error) -> Self {
        GnosisError::Other(err.to_string())
    }
}
