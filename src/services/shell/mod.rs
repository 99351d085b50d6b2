//! Terminal front end.
//!
//! The shell owns stdin and stdout on the primary task. Background tasks
//! never write to the terminal or read input themselves; they post
//! [`ShellRequest`]s through a [`ShellHandle`] and the shell renders them in
//! order. A recipient prompt is a request carrying a reply channel, so the
//! caller blocks until the user has answered.

use async_trait::async_trait;

mod handle;
mod request;
mod terminal;

pub use handle::ShellHandle;
pub use request::{PromptReason, ShellRequest};
pub use terminal::{ShellExit, TerminalShell};

use crate::models::RecipientConfig;

/// Capability to ask the user for a recipient address
#[async_trait]
pub trait RecipientPrompt: Send + Sync {
	/// Asks for a recipient until a valid address is entered.
	///
	/// Returns `None` if the user declines or input is no longer available.
	async fn prompt_recipient(&self, reason: &PromptReason) -> Option<RecipientConfig>;
}
