//! Error types for the sync front end.

/// Errors that can occur while comparing or applying a schema.
///
/// Each variant identifies the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The configuration is incomplete or invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error (reading the DDL file, writing the script or config).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The DDL file could not be parsed.
    #[error("Failed to parse DDL: {0}")]
    Parse(#[from] oxide_ddl::ParseError),

    /// The live schema could not be read.
    #[error("Database inspection failed: {0}")]
    Inspection(#[from] sqlx::Error),

    /// The sync script failed while running.
    #[error("Script execution failed: {0}")]
    Execution(#[source] sqlx::Error),

    /// The user did not confirm execution.
    #[error("Execution declined, nothing was applied")]
    Declined,

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Returns a short name of the failing stage.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Parse(_) => "parse",
            Self::Inspection(_) => "inspect",
            Self::Execution(_) => "execute",
            Self::Declined => "confirm",
            Self::Serialization(_) => "serialize",
        }
    }
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
