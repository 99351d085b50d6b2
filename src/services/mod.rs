//! Core services implementing the log monitoring pipeline.
//!
//! - `linesource`: Follows the log file and yields complete appended lines
//! - `filter`: Matches lines against the trigger keywords
//! - `notification`: Builds alerts and delivers them with a bounded timeout
//! - `monitor`: Runs the follow, match and dispatch loop and owns its lifecycle
//! - `shell`: Terminal front end that prompts for the recipient and reports status

pub mod filter;
pub mod linesource;
pub mod monitor;
pub mod notification;
pub mod shell;
