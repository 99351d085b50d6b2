//! Recipient lookup for the monitor.
//!
//! The stored recipient is read again for every alert. When it is missing or
//! unusable the user is asked through a [`RecipientPrompt`], and the answer is
//! written back to the store.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
	models::RecipientConfig,
	repositories::{RecipientRepositoryTrait, RecipientService, RepositoryError},
	services::{
		monitor::MonitorError,
		shell::{PromptReason, RecipientPrompt},
	},
};

/// Source of the address alerts are sent to
#[async_trait]
pub trait RecipientProvider: Send + Sync {
	async fn recipient(&self) -> Result<RecipientConfig, MonitorError>;
}

/// Reads the stored recipient, prompting once if it is missing or invalid.
///
/// # Errors
/// - `MonitorError::SetupDeclined` if the prompt was declined
/// - `MonitorError::RecipientStore` if the store could not be read or written
pub async fn resolve_recipient<T, P>(
	service: &RecipientService<T>,
	prompt: &P,
) -> Result<RecipientConfig, MonitorError>
where
	T: RecipientRepositoryTrait,
	P: RecipientPrompt + ?Sized,
{
	let reason = match service.get() {
		Ok(Some(recipient)) => return Ok(recipient),
		Ok(None) => PromptReason::Missing,
		Err(RepositoryError::ValidationError(msg)) => {
			warn!(error = %msg, "Stored recipient is invalid");
			PromptReason::Invalid(msg)
		}
		Err(e) => return Err(MonitorError::RecipientStore(e.to_string())),
	};

	let recipient = prompt
		.prompt_recipient(&reason)
		.await
		.ok_or(MonitorError::SetupDeclined)?;

	service
		.store(&recipient)
		.map_err(|e| MonitorError::RecipientStore(e.to_string()))?;
	info!(recipient = %recipient, "Recipient stored");

	Ok(recipient)
}

/// [`RecipientProvider`] backed by the recipient store and a prompt
pub struct StoredRecipientProvider<T: RecipientRepositoryTrait> {
	service: RecipientService<T>,
	prompt: Arc<dyn RecipientPrompt>,
}

impl<T: RecipientRepositoryTrait> StoredRecipientProvider<T> {
	pub fn new(service: RecipientService<T>, prompt: Arc<dyn RecipientPrompt>) -> Self {
		Self { service, prompt }
	}
}

#[async_trait]
impl<T: RecipientRepositoryTrait> RecipientProvider for StoredRecipientProvider<T> {
	async fn recipient(&self) -> Result<RecipientConfig, MonitorError> {
		resolve_recipient(&self.service, self.prompt.as_ref()).await
	}
}
