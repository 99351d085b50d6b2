//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - constants: Constants for the application
//! - logging: Logging utilities
//! - tests: Test builders shared by unit and integration tests

pub mod constants;
pub mod logging;

pub use constants::*;
