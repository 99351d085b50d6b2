use std::fmt;
use tokio::sync::oneshot;

use crate::{models::RecipientConfig, services::monitor::MonitorState};

/// Why the user is being asked for a recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReason {
	/// Nothing has been stored yet
	Missing,
	/// The stored record could not be used
	Invalid(String),
}

impl fmt::Display for PromptReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Missing => write!(f, "No alert recipient is configured."),
			Self::Invalid(msg) => write!(f, "The stored alert recipient is invalid: {}", msg),
		}
	}
}

/// Work posted to the shell from other tasks
#[derive(Debug)]
pub enum ShellRequest {
	/// Show a failure to the user
	ShowError { title: String, message: String },
	/// Show a monitor state change
	ShowStatus { state: MonitorState, detail: String },
	/// Ask for a recipient and send the answer back
	PromptRecipient {
		reason: PromptReason,
		reply: oneshot::Sender<Option<RecipientConfig>>,
	},
}
