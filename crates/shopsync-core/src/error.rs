//! Error types for the shopsync system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for shopsync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the shopsync system
#[derive(Error, Debug)]
pub enum Error {
    /// Contact source could not be reached (network/auth failure)
    #[error("contact source unavailable: {0}")]
    SourceUnavailable(String),

    /// Contact source returned a record that cannot be parsed
    #[error("contact source returned invalid data: {0}")]
    SourceDataInvalid(String),

    /// Required reference data (group, salutation, sales channel) is missing
    /// at the destination
    #[error("reference data missing: {0}")]
    ReferenceDataMissing(String),

    /// The contact's country could not be resolved to a destination country id.
    /// Fails the single record, not the run.
    #[error("no destination country for ISO code: {0}")]
    CountryNotFound(String),

    /// Destination could not be reached (network/auth failure)
    #[error("destination unavailable: {0}")]
    DestinationUnavailable(String),

    /// Destination rejected a create/update payload
    #[error("destination rejected write: {0}")]
    DestinationWriteRejected(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a source-unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable(msg.into())
    }

    /// Create a source-data-invalid error
    pub fn source_data_invalid(msg: impl Into<String>) -> Self {
        Self::SourceDataInvalid(msg.into())
    }

    /// Create a reference-data-missing error
    pub fn reference_data_missing(msg: impl Into<String>) -> Self {
        Self::ReferenceDataMissing(msg.into())
    }

    /// Create a destination-unavailable error
    pub fn destination_unavailable(msg: impl Into<String>) -> Self {
        Self::DestinationUnavailable(msg.into())
    }

    /// Create a destination-write-rejected error
    pub fn write_rejected(msg: impl Into<String>) -> Self {
        Self::DestinationWriteRejected(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
