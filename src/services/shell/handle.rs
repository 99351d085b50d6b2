use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::{
	models::RecipientConfig,
	services::{
		monitor::MonitorState,
		shell::{PromptReason, RecipientPrompt, ShellRequest},
	},
};

/// Cloneable sender side of the shell's request queue
#[derive(Debug, Clone)]
pub struct ShellHandle {
	tx: mpsc::UnboundedSender<ShellRequest>,
}

impl ShellHandle {
	/// Creates a handle and the receiver the shell consumes
	pub fn channel() -> (Self, mpsc::UnboundedReceiver<ShellRequest>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}

	/// Posts an error report. Returns false if the shell has gone away.
	pub fn report_error(&self, title: impl Into<String>, message: impl Into<String>) -> bool {
		self.post(ShellRequest::ShowError {
			title: title.into(),
			message: message.into(),
		})
	}

	/// Posts a status update. Returns false if the shell has gone away.
	pub fn report_status(&self, state: MonitorState, detail: impl Into<String>) -> bool {
		self.post(ShellRequest::ShowStatus {
			state,
			detail: detail.into(),
		})
	}

	fn post(&self, request: ShellRequest) -> bool {
		match self.tx.send(request) {
			Ok(()) => true,
			Err(e) => {
				warn!(request = ?e.0, "Shell is closed, dropping request");
				false
			}
		}
	}
}

#[async_trait]
impl RecipientPrompt for ShellHandle {
	async fn prompt_recipient(&self, reason: &PromptReason) -> Option<RecipientConfig> {
		let (reply, answer) = oneshot::channel();
		if !self.post(ShellRequest::PromptRecipient {
			reason: reason.clone(),
			reply,
		}) {
			return None;
		}
		answer.await.ok().flatten()
	}
}
