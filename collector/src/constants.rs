pub use common::constants::{SAMPLE_INTERVAL, SAMPLE_RATE_HZ};

/// Fixed name of the table written on every successful session.
pub const OUTPUT_FILE_NAME: &str = "KATA.csv";
