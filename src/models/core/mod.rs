//! Core domain models for the log monitoring system.
//!
//! This module contains the fundamental data structures that represent:
//! - Watch targets: The file being followed and the read position within it
//! - Triggers: The keywords that mark a line as alert-worthy
//! - Alerts: Matched lines and the notification built from them
//! - Recipient: The validated destination address for alerts
//! - Monitor: The configuration of a monitoring session

mod alert;
mod monitor;
mod recipient;
mod trigger;
mod watch_target;

pub use alert::{AlertMessage, MatchResult};
pub use monitor::{DeliveryConfig, MonitorConfig, RotationPolicy};
pub use recipient::RecipientConfig;
pub use trigger::TriggerSet;
pub use watch_target::{ReadCursor, WatchTarget};
