//! Domain models and data structures for log monitoring.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (watch target, triggers, matches, alerts, recipient)

mod config;
mod core;

// Re-export core types
pub use core::{
	AlertMessage, DeliveryConfig, MatchResult, MonitorConfig, ReadCursor, RecipientConfig,
	RotationPolicy, TriggerSet, WatchTarget,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader};
