//! Error types for peerscope

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for peerscope operations
#[derive(Error, Debug)]
pub enum ToolsError {
    /// The store instance has not been initialized yet
    #[error("Store instance is not initialized")]
    NotInitialized,

    /// Creating the store instance failed
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// A platform permission request failed or was denied
    #[error("Permission error: {0}")]
    Permission(String),

    /// Registering or running a presence observer failed
    #[error("Presence error: {0}")]
    Presence(String),

    /// A presence subscription already exists for this consumer
    #[error("Presence observer already active for this consumer")]
    AlreadySubscribed,

    /// Query text was blank
    #[error("Please enter a valid DQL statement")]
    EmptyStatement,

    /// A query is already executing
    #[error("A query is already executing")]
    QueryInFlight,

    /// The store rejected or failed a query
    #[error("{0}")]
    Query(String),

    /// Nothing to export
    #[error("No results to export")]
    NoResults,

    /// Materializing or sharing an export failed
    #[error("Export error: {0}")]
    Export(String),

    /// Deleting a temporary export artifact failed
    #[error("Failed to clean up temp file {path}: {source}")]
    Cleanup {
        /// Artifact that could not be removed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Sync control (transport config, start/stop) failed
    #[error("Sync error: {0}")]
    Sync(String),

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Zip archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Result type alias using ToolsError
pub type ToolsResult<T> = Result<T, ToolsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ToolsError::EmptyStatement.to_string(),
            "Please enter a valid DQL statement"
        );
        assert_eq!(
            ToolsError::Query("syntax error at 1:7".to_string()).to_string(),
            "syntax error at 1:7"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ToolsError = io_err.into();
        assert!(matches!(err, ToolsError::Io(_)));
    }

    #[test]
    fn test_cleanup_error_mentions_path() {
        let err = ToolsError::Cleanup {
            path: PathBuf::from("/tmp/store-data.zip"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/store-data.zip"));
    }
}
