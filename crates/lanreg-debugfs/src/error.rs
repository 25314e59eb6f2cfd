//! Error types for debugfs register access

use std::path::PathBuf;
use thiserror::Error;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// debugfs transport errors
#[derive(Debug, Error)]
pub enum DebugfsError {
    /// No register file was found
    #[error("No debugfs register file found (searched: {}). Is debugfs mounted?", join_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// Reading or writing the register file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The driver's reply did not contain a value
    #[error("Unexpected response from {}: '{response}'", .path.display())]
    BadResponse { path: PathBuf, response: String },
}

/// Result type for debugfs operations
pub type Result<T> = std::result::Result<T, DebugfsError>;
