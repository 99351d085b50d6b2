//! Email notification implementation.
//!
//! Sends plain text alerts directly through an SMTP relay.

use async_trait::async_trait;
use email_address::EmailAddress;
use lettre::{
	message::header::ContentType, transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::str::FromStr;

use crate::{
	models::DeliveryConfig,
	services::notification::{NotificationError, Notifier},
	utils::constants::DEFAULT_SMTP_PORT,
};

/// Implementation of email notifications via SMTP
pub struct EmailNotifier {
	/// SMTP client for email delivery
	client: AsyncSmtpTransport<Tokio1Executor>,
	/// Email sender
	sender: EmailAddress,
}

/// Configuration for SMTP connection
#[derive(Clone)]
pub struct SmtpConfig {
	pub host: String,
	pub port: u16,
	pub username: String,
	pub password: String,
}

impl EmailNotifier {
	/// Creates a new email notifier instance
	///
	/// # Arguments
	/// * `smtp_config` - SMTP server configuration
	/// * `sender` - Address alerts are sent from
	pub fn new(smtp_config: SmtpConfig, sender: EmailAddress) -> Result<Self, NotificationError> {
		let relay = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_config.host).map_err(|e| {
			NotificationError::config_error(format!("Failed to build client: {}", e))
		})?;

		let client = relay
			.port(smtp_config.port)
			.credentials(Credentials::new(smtp_config.username, smtp_config.password))
			.build();

		Ok(Self { client, sender })
	}

	/// Creates an email notifier from a delivery configuration
	///
	/// # Errors
	/// Returns `NotificationError::ConfigError` if `config` is not SMTP delivery
	/// or the sender address is invalid.
	pub fn from_config(config: &DeliveryConfig) -> Result<Self, NotificationError> {
		match config {
			DeliveryConfig::Smtp {
				host,
				port,
				username,
				password,
				sender,
			} => {
				let sender = EmailAddress::from_str(sender).map_err(|e| {
					NotificationError::config_error(format!("Invalid sender address: {}", e))
				})?;
				let smtp_config = SmtpConfig {
					host: host.clone(),
					port: port.unwrap_or(DEFAULT_SMTP_PORT),
					username: username.clone(),
					password: password.clone(),
				};
				Self::new(smtp_config, sender)
			}
			DeliveryConfig::MailComposer => Err(NotificationError::config_error(
				"delivery is not configured for SMTP",
			)),
		}
	}

	/// Builds the plain text message for one recipient
	pub fn build_message(
		&self,
		recipient: &str,
		subject: &str,
		body: &str,
	) -> Result<Message, NotificationError> {
		let sender = self.sender.to_string().parse().map_err(|e| {
			NotificationError::internal_error(format!("Failed to parse email sender: {}", e))
		})?;
		let to = recipient.parse().map_err(|e| {
			NotificationError::internal_error(format!("Failed to parse email recipient: {}", e))
		})?;

		Message::builder()
			.from(sender)
			.to(to)
			.subject(subject)
			.header(ContentType::TEXT_PLAIN)
			.body(body.to_owned())
			.map_err(|e| NotificationError::internal_error(format!("Failed to build email: {}", e)))
	}
}

#[async_trait]
impl Notifier for EmailNotifier {
	async fn deliver(
		&self,
		recipient: &str,
		subject: &str,
		body: &str,
	) -> Result<(), NotificationError> {
		let email = self.build_message(recipient, subject, body)?;

		self.client
			.send(email)
			.await
			.map_err(|e| NotificationError::delivery_failed(e.to_string()))?;

		Ok(())
	}
}
