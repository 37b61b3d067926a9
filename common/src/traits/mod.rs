pub mod motion_source;

pub use crate::traits::motion_source::MotionSource;
