//! Bootstrap module for loading configuration and wiring services together.
//!
//! # Services
//! - `FilterService`: keyword evaluation of log lines
//! - `AlertDispatcher`: alert delivery with a timeout
//! - `RecipientService`: the stored recipient address
//!
//! # Startup
//! - `load_monitor_config`: reads and validates the monitor configuration
//! - `ensure_recipient_configured`: resolves the recipient before monitoring
//!   starts, prompting if needed
//! - `create_monitor_loop`: assembles a ready to start `MonitorLoop`

use std::{path::Path, sync::Arc};
use tracing::info;

use crate::{
	models::{ConfigLoader, MonitorConfig, RecipientConfig},
	repositories::{RecipientRepositoryTrait, RecipientService},
	services::{
		filter::FilterService,
		monitor::{resolve_recipient, MonitorError, MonitorLoop, StoredRecipientProvider},
		notification::{AlertDispatcher, NotificationService},
		shell::RecipientPrompt,
	},
};

/// Type alias for bootstrap results
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Loads the monitor configuration from `path`.
///
/// `watch_override` replaces the configured log path when given.
///
/// # Errors
/// Returns `MonitorError::ConfigInvalid` if the file cannot be read, parsed
/// or validated.
pub fn load_monitor_config(path: &Path, watch_override: Option<&Path>) -> Result<MonitorConfig> {
	let mut config = MonitorConfig::load_from_path(path)
		.map_err(|e| MonitorError::ConfigInvalid(e.to_string()))?;

	if let Some(watch) = watch_override {
		config.log_path = watch.display().to_string();
		config
			.validate()
			.map_err(|e| MonitorError::ConfigInvalid(e.to_string()))?;
	}

	info!(
		monitor = %config.name,
		path = %config.watch_target(),
		keywords = ?config.trigger_keywords.keywords(),
		"Loaded monitor configuration"
	);
	Ok(config)
}

/// Builds the services used by the monitor loop.
///
/// # Errors
/// Returns `MonitorError::ConfigInvalid` if the delivery settings are unusable.
pub fn initialize_services(config: &MonitorConfig) -> Result<(FilterService, Arc<AlertDispatcher>)> {
	let filter_service = FilterService::new(config.trigger_keywords.clone());

	let notifier = NotificationService::notifier_from_config(&config.delivery)
		.map_err(|e| MonitorError::ConfigInvalid(e.to_string()))?;
	let dispatcher = AlertDispatcher::new(notifier, config.dispatch_timeout());

	Ok((filter_service, Arc::new(dispatcher)))
}

/// Makes sure a valid recipient is stored before monitoring starts.
///
/// Prompts at most once; the prompt itself keeps asking until it gets a
/// valid address or the user declines.
///
/// # Errors
/// - `MonitorError::SetupDeclined` if the user declined
/// - `MonitorError::RecipientStore` if the store could not be read or written
pub async fn ensure_recipient_configured<T, P>(
	service: &RecipientService<T>,
	prompt: &P,
) -> Result<RecipientConfig>
where
	T: RecipientRepositoryTrait,
	P: RecipientPrompt + ?Sized,
{
	let recipient = resolve_recipient(service, prompt).await?;
	info!(recipient = %recipient, "Alert recipient configured");
	Ok(recipient)
}

/// Assembles a monitor loop for `config`.
///
/// The loop reads the recipient from `recipient_service` for every alert and
/// falls back to `prompt` if the stored address has become unusable.
pub fn create_monitor_loop<T>(
	config: &MonitorConfig,
	filter_service: FilterService,
	dispatcher: Arc<AlertDispatcher>,
	recipient_service: RecipientService<T>,
	prompt: Arc<dyn RecipientPrompt>,
) -> MonitorLoop
where
	T: RecipientRepositoryTrait + 'static,
{
	let recipients = StoredRecipientProvider::new(recipient_service, prompt);
	MonitorLoop::new(config, filter_service, dispatcher, Arc::new(recipients))
}
