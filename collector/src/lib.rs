//! # Crate collector-rs
//!
//! ## collector-rs
//!
//! The `collector-rs` crate captures a bounded number of device motion frames (user acceleration
//! and rotation rate) at a fixed 50 Hz rate and saves them as a comma separated table.
//!
//! Features include:
//! - A [`services::FrameCollector`] owning one capture session at a time, resolving exactly once
//!   with the location of the table or the reason of the failure.
//! - Any motion stream implementing [`common::MotionSource`] can feed the collector.
//! - A simulated source for hosts without motion hardware, and a replay source for previously
//!   captured tables.
//! - Cancellation of a session in flight.
//!
//! **NOTE** A table left partially written by a failed write is not rolled back.

pub mod adapters;
pub mod constants;
pub mod errors;
pub mod services;
pub mod session;
pub mod table;

pub use errors::CollectorError;
pub use services::{run_service, run_simulated_service, FrameCollector};
pub use session::{SessionOutcome, SessionState};
