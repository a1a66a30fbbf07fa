//! Error types for Ferry
//!
//! Uses `thiserror` for library errors; the binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Ferry operations
pub type FerryResult<T> = Result<T, FerryError>;

/// Main error type for Ferry operations
#[derive(Error, Debug)]
pub enum FerryError {
    /// Required environment variable is not set
    #[error("missing required environment variable '{var}'")]
    MissingEnv { var: &'static str },

    /// Assets directory does not exist
    #[error("assets directory not found: {path} - build the site first")]
    AssetsDirNotFound { path: PathBuf },

    /// Entry page contains the placeholder but no tracking code is configured
    #[error("{file} contains '{placeholder}' but GA_TRACKING_CODE is not set")]
    MissingTrackingCode {
        file: String,
        placeholder: &'static str,
    },

    /// The version-control query could not be run
    #[error("failed to run '{command}': {message}")]
    VersionCommand { command: String, message: String },

    /// The log output did not yield a version token
    #[error("could not parse a version from the commit log - no commits, or unexpected log format")]
    UnparseableVersion,

    /// Authentication / connection handshake with the object store failed
    #[error("could not connect to bucket '{bucket}': {message}")]
    Connection { bucket: String, message: String },

    /// A single object upload failed
    #[error("upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
