//! Alert delivery.
//!
//! A [`Notifier`] hands one message to one recipient. [`AlertDispatcher`]
//! wraps a notifier with the dispatch timeout so that a hung delivery can
//! never stall the monitor loop.

use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

mod email;
mod error;
mod mail_composer;
pub mod payload_builder;

pub use email::{EmailNotifier, SmtpConfig};
pub use error::NotificationError;
pub use mail_composer::{mailto_url, ComposerCommand, MailComposerNotifier, MailPlatform};
pub use payload_builder::{build_alert_message, build_body, build_subject};

use crate::models::{DeliveryConfig, RecipientConfig};

/// Interface for alert delivery mechanisms
#[async_trait]
pub trait Notifier: Send + Sync {
	/// Delivers a message to a single recipient
	///
	/// # Arguments
	/// * `recipient` - Validated email address
	/// * `subject` - Alert subject line
	/// * `body` - Plain text alert body
	async fn deliver(&self, recipient: &str, subject: &str, body: &str)
		-> Result<(), NotificationError>;
}

/// Builds notifiers from delivery configuration
pub struct NotificationService;

impl NotificationService {
	/// Creates the notifier described by `config`
	///
	/// # Errors
	/// Returns `NotificationError::ConfigError` if the SMTP settings are unusable.
	pub fn notifier_from_config(
		config: &DeliveryConfig,
	) -> Result<Arc<dyn Notifier>, NotificationError> {
		match config {
			DeliveryConfig::MailComposer => Ok(Arc::new(MailComposerNotifier::new())),
			DeliveryConfig::Smtp { .. } => Ok(Arc::new(EmailNotifier::from_config(config)?)),
		}
	}
}

/// Sends alerts through a notifier under a fixed timeout
pub struct AlertDispatcher {
	notifier: Arc<dyn Notifier>,
	timeout: Duration,
}

impl AlertDispatcher {
	pub fn new(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
		Self { notifier, timeout }
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Delivers one alert, waiting at most the configured timeout.
	///
	/// A delivery still running when the timeout elapses is dropped, which
	/// cancels it.
	///
	/// # Errors
	/// - `NotificationError::Timeout` if delivery did not finish in time
	/// - `NotificationError::DeliveryFailed` for any other delivery failure
	pub async fn dispatch(
		&self,
		subject: &str,
		body: &str,
		recipient: &RecipientConfig,
	) -> Result<(), NotificationError> {
		let delivery = self.notifier.deliver(recipient.email(), subject, body);

		match tokio::time::timeout(self.timeout, delivery).await {
			Ok(Ok(())) => {
				info!(recipient = %recipient, subject, "Alert delivered");
				Ok(())
			}
			Ok(Err(e)) => {
				warn!(recipient = %recipient, subject, error = %e, "Alert delivery failed");
				match e {
					NotificationError::Timeout(_) | NotificationError::DeliveryFailed(_) => Err(e),
					other => Err(NotificationError::delivery_failed(other.to_string())),
				}
			}
			Err(_) => {
				warn!(
					recipient = %recipient,
					subject,
					timeout_ms = self.timeout.as_millis() as u64,
					"Alert delivery timed out"
				);
				Err(NotificationError::timeout(format!(
					"no result after {}ms",
					self.timeout.as_millis()
				)))
			}
		}
	}
}
