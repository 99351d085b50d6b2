//! Monitor configuration loading and validation.
//!
//! This module implements the ConfigLoader trait for the monitor configuration,
//! allowing it to be loaded from a JSON file.

use email_address::EmailAddress;
use std::{fs, path::Path};

use crate::models::{ConfigError, ConfigLoader, DeliveryConfig, MonitorConfig};

impl ConfigLoader for MonitorConfig {
	/// Load a monitor configuration from a specific file
	///
	/// Reads and parses a single JSON file, then validates it.
	fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(format!(
				"{} is not a JSON file",
				path.display()
			)));
		}

		let content =
			fs::read_to_string(path).map_err(|e| ConfigError::file_error_at(path, e))?;
		let config: MonitorConfig = serde_json::from_str(&content).map_err(|e| {
			ConfigError::parse_error(format!(
				"failed to parse monitor config {}: {}",
				path.display(),
				e
			))
		})?;

		config.validate()?;

		Ok(config)
	}

	/// Validate the monitor configuration
	///
	/// Ensures that:
	/// - The monitor has a name and a log path
	/// - Poll interval and dispatch timeout are non-zero
	/// - SMTP delivery has a host and a valid sender address
	fn validate(&self) -> Result<(), ConfigError> {
		if self.name.trim().is_empty() {
			return Err(ConfigError::validation_error("Monitor name is required"));
		}

		if self.log_path.trim().is_empty() {
			return Err(ConfigError::validation_error("Log path is required"));
		}

		if self.trigger_keywords.is_empty() {
			return Err(ConfigError::validation_error(
				"At least one trigger keyword is required",
			));
		}

		if self.poll_interval_ms == 0 {
			return Err(ConfigError::validation_error(
				"Poll interval must be greater than 0",
			));
		}

		if self.dispatch_timeout_ms == 0 {
			return Err(ConfigError::validation_error(
				"Dispatch timeout must be greater than 0",
			));
		}

		if let DeliveryConfig::Smtp { host, sender, .. } = &self.delivery {
			if host.trim().is_empty() {
				return Err(ConfigError::validation_error("SMTP host is required"));
			}
			if !EmailAddress::is_valid(sender) {
				return Err(ConfigError::validation_error(format!(
					"Invalid SMTP sender address: {}",
					sender
				)));
			}
		}

		Ok(())
	}
}
