use chrono::{DateTime, Local};

/// A log line that fired at least one trigger keyword.
///
/// Only constructed when a match occurred, so `matched_keywords` is never
/// empty. Keywords keep the trigger set's declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
	line: String,
	matched_keywords: Vec<String>,
	timestamp: DateTime<Local>,
}

impl MatchResult {
	/// Returns `None` when `matched_keywords` is empty.
	pub fn new(
		line: impl Into<String>,
		matched_keywords: Vec<String>,
		timestamp: DateTime<Local>,
	) -> Option<Self> {
		if matched_keywords.is_empty() {
			return None;
		}
		Some(Self {
			line: line.into(),
			matched_keywords,
			timestamp,
		})
	}

	pub fn line(&self) -> &str {
		&self.line
	}

	pub fn matched_keywords(&self) -> &[String] {
		&self.matched_keywords
	}

	pub fn timestamp(&self) -> DateTime<Local> {
		self.timestamp
	}

	/// First keyword that fired, in declaration order
	pub fn primary_keyword(&self) -> &str {
		&self.matched_keywords[0]
	}

	/// Uppercased primary keyword used to tag the alert subject
	pub fn subject_tag(&self) -> String {
		self.primary_keyword().to_uppercase()
	}
}

/// Subject and body of an alert notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
	pub subject: String,
	pub body: String,
}
