//! Monitoring session management.
//!
//! - [`MonitorLoop`] / [`MonitorHandle`]: the background follow, match and
//!   dispatch loop and its control handle
//! - [`RecipientProvider`]: where alerts are addressed
//! - [`AlertTracker`]: optional duplicate suppression

mod error;
mod recipient;
mod service;
mod tracker;

pub use error::MonitorError;
pub use recipient::{resolve_recipient, RecipientProvider, StoredRecipientProvider};
pub use service::{MonitorCanceller, MonitorHandle, MonitorLoop, MonitorOutcome, MonitorState};
pub use tracker::{AlertCheckResult, AlertTracker};
