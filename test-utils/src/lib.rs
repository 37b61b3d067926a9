//! Helpers shared by the test suites of the workspace.

pub mod csv_loader;
pub mod source_mock;
