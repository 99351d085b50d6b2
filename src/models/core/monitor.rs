use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::{
	models::{TriggerSet, WatchTarget},
	utils::constants::{DEFAULT_ALERT_TITLE, DEFAULT_DISPATCH_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS},
};

/// Configuration of a monitoring session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MonitorConfig {
	/// Name used in logs
	pub name: String,
	/// Path of the log file to follow; a leading `~/` is expanded to `$HOME`
	pub log_path: String,
	/// Keywords that make a line alert-worthy
	pub trigger_keywords: TriggerSet,
	/// Prefix of every alert subject
	#[serde(default = "default_alert_title")]
	pub alert_title: String,
	/// Interval between reads when no new data is available
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Upper bound for a single alert delivery
	#[serde(default = "default_dispatch_timeout_ms")]
	pub dispatch_timeout_ms: u64,
	/// Where to resume after the file was truncated or replaced
	#[serde(default)]
	pub rotation_policy: RotationPolicy,
	/// Identical alerts within this window are suppressed (0 disables)
	#[serde(default)]
	pub dedup_window_secs: u64,
	/// How alerts are delivered
	#[serde(default)]
	pub delivery: DeliveryConfig,
}

/// Where the read cursor goes when the watched file is truncated or replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
	/// Read the new file from its first byte
	#[default]
	ResetToStart,
	/// Skip whatever the new file already contains
	ResetToEnd,
}

/// Alert delivery mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeliveryConfig {
	/// Pre-filled message in the platform mail client
	#[default]
	MailComposer,
	/// Direct SMTP delivery
	Smtp {
		host: String,
		#[serde(default)]
		port: Option<u16>,
		username: String,
		password: String,
		sender: String,
	},
}

fn default_alert_title() -> String {
	DEFAULT_ALERT_TITLE.to_string()
}

fn default_poll_interval_ms() -> u64 {
	DEFAULT_POLL_INTERVAL_MS
}

fn default_dispatch_timeout_ms() -> u64 {
	DEFAULT_DISPATCH_TIMEOUT_MS
}

impl MonitorConfig {
	/// The file to follow, with `~/` expanded
	pub fn watch_target(&self) -> WatchTarget {
		WatchTarget::new(expand_home(&self.log_path))
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn dispatch_timeout(&self) -> Duration {
		Duration::from_millis(self.dispatch_timeout_ms)
	}

	/// `None` when duplicate suppression is disabled
	pub fn dedup_window(&self) -> Option<Duration> {
		(self.dedup_window_secs > 0).then(|| Duration::from_secs(self.dedup_window_secs))
	}
}

fn expand_home(path: &str) -> PathBuf {
	match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
		(Some(rest), Some(home)) => PathBuf::from(home).join(rest),
		_ => PathBuf::from(path),
	}
}
