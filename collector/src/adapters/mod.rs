//! Host implementations of [`common::MotionSource`].

mod gaussian;
pub mod replay;
pub mod simulated;
mod stream_task;

pub use replay::ReplaySource;
pub use simulated::SimulatedSource;
