//! Integration tests for plan-check.
//!
//! These tests drive complete runs against a mock planning host.

pub mod full_run_tests;
pub mod logging_tests;
pub mod output_tests;
pub mod report_tests;
