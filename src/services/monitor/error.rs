//! Monitor error types.
//!
//! Aggregates the failures that end a monitoring session and maps each one
//! to the process exit code reported by the binary.

use thiserror::Error;

use crate::{
	models::WatchTarget,
	services::linesource::LineSourceError,
	utils::constants::{EXIT_INVALID_CONFIG, EXIT_MONITOR_FAILED, EXIT_SETUP_DECLINED},
};

/// Errors that stop monitoring or prevent it from starting
#[derive(Debug, Error)]
pub enum MonitorError {
	/// The watched file is missing, unreadable or stopped being readable
	#[error("Log file unavailable: {path}: {reason}")]
	TargetUnavailable { path: String, reason: String },

	/// Monitor or recipient configuration cannot be used
	#[error("Invalid configuration: {0}")]
	ConfigInvalid(String),

	/// The user refused to supply a recipient address
	#[error("Recipient setup was declined")]
	SetupDeclined,

	/// The recipient store could not be read or written
	#[error("Recipient store error: {0}")]
	RecipientStore(String),

	/// Anything else that escaped the monitor task
	#[error("Unexpected monitor error: {0}")]
	UnexpectedLoopError(String),
}

impl MonitorError {
	pub fn target_unavailable(target: &WatchTarget, reason: impl ToString) -> Self {
		Self::TargetUnavailable {
			path: target.to_string(),
			reason: reason.to_string(),
		}
	}

	/// Wraps a line source failure for `target`
	pub fn from_line_source(target: &WatchTarget, err: LineSourceError) -> Self {
		Self::target_unavailable(target, err)
	}

	/// Process exit code for this error
	pub fn exit_code(&self) -> u8 {
		match self {
			Self::SetupDeclined => EXIT_SETUP_DECLINED,
			Self::ConfigInvalid(_) => EXIT_INVALID_CONFIG,
			Self::TargetUnavailable { .. } | Self::RecipientStore(_) | Self::UnexpectedLoopError(_) => {
				EXIT_MONITOR_FAILED
			}
		}
	}
}
