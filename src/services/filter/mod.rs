//! Log line filtering functionality.
//!
//! Implements the matching side of the monitoring pipeline:
//! - Keyword evaluation of individual log lines
//! - Match handling: alert construction and dispatch

mod filter_match;
mod keyword;

pub use filter_match::{handle_match, AlertOutcome};
pub use keyword::{evaluate, evaluate_at, FilterService};
