//! Notification error types and handling.
//!
//! Provides error types for alert delivery, including timeouts, delivery
//! failures and configuration problems.

use log::error;
use std::{error::Error, fmt};

/// Represents possible errors during notification operations
#[derive(Debug)]
pub enum NotificationError {
	/// Delivery did not finish within the dispatch timeout
	Timeout(String),
	/// The delivery mechanism reported a failure
	DeliveryFailed(String),
	/// Configuration-related errors
	ConfigError(String),
	/// Internal errors (e.g., failed to build email)
	InternalError(String),
}

impl NotificationError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::Timeout(msg) => format!("Delivery timeout: {}", msg),
			Self::DeliveryFailed(msg) => format!("Delivery failed: {}", msg),
			Self::ConfigError(msg) => format!("Config error: {}", msg),
			Self::InternalError(msg) => format!("Internal error: {}", msg),
		}
	}

	/// Creates a new timeout error with logging
	pub fn timeout(msg: impl Into<String>) -> Self {
		let error = Self::Timeout(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new delivery error with logging
	pub fn delivery_failed(msg: impl Into<String>) -> Self {
		let error = Self::DeliveryFailed(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new configuration error with logging
	pub fn config_error(msg: impl Into<String>) -> Self {
		let error = Self::ConfigError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new internal error with logging
	pub fn internal_error(msg: impl Into<String>) -> Self {
		let error = Self::InternalError(msg.into());
		error!("{}", error.format_message());
		error
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout(_))
	}
}

impl fmt::Display for NotificationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for NotificationError {}
