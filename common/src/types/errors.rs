//! Module errors

use thiserror::Error;

/// Errors reported by a motion source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The sensor stream cannot be started.
    #[error("motion sensor unavailable: {0}")]
    Unavailable(String),

    /// A delivery failed while the stream was running.
    #[error("motion stream error: {0}")]
    Stream(String),
}
