//! Alert payload builder.
//!
//! Turns a matched log line into the subject and body handed to a notifier.
//! The output is fully determined by the title, the match and the watched path.

use crate::models::{AlertMessage, MatchResult, WatchTarget};

/// Timestamp layout used in alert bodies
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `"{title}[{KEYWORD}]"`, tagged with the first keyword that fired.
pub fn build_subject(title: &str, matched: &MatchResult) -> String {
	format!("{}[{}]", title, matched.subject_tag())
}

/// Time of the match, the watched path and the offending line.
pub fn build_body(matched: &MatchResult, target: &WatchTarget) -> String {
	format!(
		"Time: {}\nLog path: {}\nContent: {}",
		matched.timestamp().format(TIMESTAMP_FORMAT),
		target,
		matched.line()
	)
}

pub fn build_alert_message(
	title: &str,
	matched: &MatchResult,
	target: &WatchTarget,
) -> AlertMessage {
	AlertMessage {
		subject: build_subject(title, matched),
		body: build_body(matched, target),
	}
}
