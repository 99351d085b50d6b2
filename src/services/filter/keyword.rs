//! Keyword matching for log lines.
//!
//! Matching is case-insensitive substring containment: a keyword fires when
//! its lowercase form occurs anywhere in the lowercased line. There is no
//! word-boundary check, so `error` also fires on `terrorist`.

use chrono::{DateTime, Local};

use crate::models::{MatchResult, TriggerSet};

/// Evaluates `line` against `triggers`, timestamping a match with the current time.
pub fn evaluate(line: &str, triggers: &TriggerSet) -> Option<MatchResult> {
	evaluate_at(line, triggers, Local::now())
}

/// Evaluates `line` against `triggers` with an explicit match timestamp.
///
/// Returns `None` when no keyword fires. Otherwise every firing keyword is
/// recorded in declaration order.
pub fn evaluate_at(
	line: &str,
	triggers: &TriggerSet,
	timestamp: DateTime<Local>,
) -> Option<MatchResult> {
	let lowered = line.to_lowercase();
	let matched: Vec<String> = triggers
		.iter()
		.filter(|keyword| lowered.contains(keyword.as_str()))
		.cloned()
		.collect();

	MatchResult::new(line, matched, timestamp)
}

/// Matches lines against a fixed trigger set
#[derive(Debug, Clone)]
pub struct FilterService {
	triggers: TriggerSet,
}

impl FilterService {
	pub fn new(triggers: TriggerSet) -> Self {
		Self { triggers }
	}

	pub fn triggers(&self) -> &TriggerSet {
		&self.triggers
	}

	pub fn evaluate(&self, line: &str) -> Option<MatchResult> {
		evaluate(line, &self.triggers)
	}
}
