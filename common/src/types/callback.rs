use std::sync::Arc;

use crate::types::{MotionReading, SourceError};

/// Callback invoked by a [`crate::MotionSource`] for every delivered reading or stream error.
pub type ReadingCallback = Arc<dyn Fn(Result<MotionReading, SourceError>) + Send + Sync>;
