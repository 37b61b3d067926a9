//! General functionality shared by the `motion-collector` crates.
//!
//! Holds the motion reading model, the table column layout and the
//! [`MotionSource`] port that any sensor stream has to implement to feed a
//! collection session.

pub mod constants;

#[doc(hidden)]
pub mod traits;
#[doc(hidden)]
pub mod types;

// Re-export traits
#[doc(inline)]
pub use traits::MotionSource;

// Re-export types
#[doc(inline)]
pub use types::{MotionReading, ReadingCallback, SourceError, TableColumn, XYZ};
