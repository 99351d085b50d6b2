//! Duplicate alert suppression.
//!
//! [`AlertTracker`] remembers recently dispatched alerts so that a burst of
//! identical log lines produces a single notification per window.

use std::{
	collections::VecDeque,
	time::{Duration, Instant},
};

/// Result of checking an alert against recent history
#[derive(Debug, Clone, PartialEq)]
pub enum AlertCheckResult {
	/// Alert has not been seen within the window
	Ok,
	/// Identical alert was dispatched `since` ago
	Duplicate { since: Duration },
}

/// Bounded history of recently dispatched alerts
#[derive(Debug)]
pub struct AlertTracker {
	window: Duration,
	/// Oldest first
	history: VecDeque<(Instant, String)>,
	/// Maximum number of alerts to keep in history
	history_size: usize,
}

impl AlertTracker {
	pub fn new(window: Duration, history_size: usize) -> Self {
		Self {
			window,
			history: VecDeque::new(),
			history_size,
		}
	}

	pub fn window(&self) -> Duration {
		self.window
	}

	pub fn len(&self) -> usize {
		self.history.len()
	}

	pub fn is_empty(&self) -> bool {
		self.history.is_empty()
	}

	/// Checks `key` against the window and records it when it is new.
	pub fn check_and_record(&mut self, key: &str) -> AlertCheckResult {
		self.check_at(key, Instant::now())
	}

	/// Same as [`check_and_record`](Self::check_and_record) at an explicit instant.
	pub fn check_at(&mut self, key: &str, now: Instant) -> AlertCheckResult {
		while let Some((seen, _)) = self.history.front() {
			if now.saturating_duration_since(*seen) > self.window {
				self.history.pop_front();
			} else {
				break;
			}
		}

		if let Some((seen, _)) = self.history.iter().rev().find(|(_, k)| k == key) {
			return AlertCheckResult::Duplicate {
				since: now.saturating_duration_since(*seen),
			};
		}

		self.history.push_back((now, key.to_string()));
		if self.history.len() > self.history_size {
			self.history.pop_front();
		}
		AlertCheckResult::Ok
	}
}
