//! Module errors

use common::SourceError;
use thiserror::Error;

/// Terminal failures of a collection session.
///
/// Every variant is surfaced as is to the caller of `collect`. Nothing is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollectorError {
    /// Frame count is zero or negative.
    #[error("invalid target frame count: {0}")]
    InvalidTarget(i64),

    /// Motion stream could not be started.
    #[error("sensor unavailable: {0}")]
    SensorUnavailable(String),

    /// Motion stream reported an error while collecting.
    #[error("sensor stream error: {0}")]
    SensorStream(String),

    /// Output file could not be created or opened for writing.
    #[error("could not create destination: {0}")]
    DestinationCreationFailed(String),

    /// Writing the table failed. The destination may be left truncated.
    #[error("serialization failed: {0}")]
    SerializationFailed(String),

    /// A stored table could not be read back.
    #[error("could not read table: {0}")]
    TableRead(String),

    /// Session was cancelled before reaching the target count.
    #[error("session cancelled")]
    Cancelled,

    /// Another session is still running on this collector.
    #[error("a collection session is already in progress")]
    SessionInProgress,
}

impl From<SourceError> for CollectorError {
    fn from(value: SourceError) -> Self {
        match value {
            SourceError::Unavailable(reason) => CollectorError::SensorUnavailable(reason),
            SourceError::Stream(reason) => CollectorError::SensorStream(reason),
        }
    }
}
