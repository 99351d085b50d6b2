//! Test helper utilities for Monitor configuration
//!
//! - `MonitorConfigBuilder`: Builder for creating test MonitorConfig instances

use crate::models::{DeliveryConfig, MonitorConfig, RotationPolicy, TriggerSet};

/// Builder for creating test MonitorConfig instances
pub struct MonitorConfigBuilder {
	name: String,
	log_path: String,
	trigger_keywords: Vec<String>,
	alert_title: String,
	poll_interval_ms: u64,
	dispatch_timeout_ms: u64,
	rotation_policy: RotationPolicy,
	dedup_window_secs: u64,
	delivery: DeliveryConfig,
}

impl Default for MonitorConfigBuilder {
	fn default() -> Self {
		Self {
			name: "test_monitor".to_string(),
			log_path: "/tmp/test.log".to_string(),
			trigger_keywords: vec![
				"error".to_string(),
				"failed".to_string(),
				"critical".to_string(),
			],
			alert_title: "[TEST ALERT]".to_string(),
			poll_interval_ms: 10,
			dispatch_timeout_ms: 1000,
			rotation_policy: RotationPolicy::ResetToStart,
			dedup_window_secs: 0,
			delivery: DeliveryConfig::MailComposer,
		}
	}
}

impl MonitorConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn log_path(mut self, path: impl AsRef<std::path::Path>) -> Self {
		self.log_path = path.as_ref().display().to_string();
		self
	}

	pub fn trigger_keywords(mut self, keywords: &[&str]) -> Self {
		self.trigger_keywords = keywords.iter().map(|k| k.to_string()).collect();
		self
	}

	pub fn alert_title(mut self, title: &str) -> Self {
		self.alert_title = title.to_string();
		self
	}

	pub fn poll_interval_ms(mut self, interval: u64) -> Self {
		self.poll_interval_ms = interval;
		self
	}

	pub fn dispatch_timeout_ms(mut self, timeout: u64) -> Self {
		self.dispatch_timeout_ms = timeout;
		self
	}

	pub fn rotation_policy(mut self, policy: RotationPolicy) -> Self {
		self.rotation_policy = policy;
		self
	}

	pub fn dedup_window_secs(mut self, secs: u64) -> Self {
		self.dedup_window_secs = secs;
		self
	}

	pub fn delivery(mut self, delivery: DeliveryConfig) -> Self {
		self.delivery = delivery;
		self
	}

	pub fn build(self) -> MonitorConfig {
		MonitorConfig {
			name: self.name,
			log_path: self.log_path,
			trigger_keywords: TriggerSet::new(self.trigger_keywords)
				.expect("test trigger keywords must be valid"),
			alert_title: self.alert_title,
			poll_interval_ms: self.poll_interval_ms,
			dispatch_timeout_ms: self.dispatch_timeout_ms,
			rotation_policy: self.rotation_policy,
			dedup_window_secs: self.dedup_window_secs,
			delivery: self.delivery,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_monitor_config() {
		let config = MonitorConfigBuilder::new().build();

		assert_eq!(config.name, "test_monitor");
		assert_eq!(config.trigger_keywords.len(), 3);
		assert_eq!(config.poll_interval_ms, 10);
		assert_eq!(config.delivery, DeliveryConfig::MailComposer);
	}

	#[test]
	fn test_custom_monitor_config() {
		let config = MonitorConfigBuilder::new()
			.name("custom")
			.log_path("/var/log/app.log")
			.trigger_keywords(&["Panic"])
			.alert_title("[APP]")
			.rotation_policy(RotationPolicy::ResetToEnd)
			.dedup_window_secs(5)
			.build();

		assert_eq!(config.name, "custom");
		assert_eq!(config.log_path, "/var/log/app.log");
		assert_eq!(config.trigger_keywords.keywords(), &["panic"]);
		assert_eq!(config.alert_title, "[APP]");
		assert_eq!(config.rotation_policy, RotationPolicy::ResetToEnd);
		assert_eq!(config.dedup_window_secs, 5);
	}
}
