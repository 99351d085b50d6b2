//! Match handling.
//!
//! Turns a keyword match into an alert and hands it to the dispatcher.
//! Nothing here is fatal to the monitor loop: every path ends in an
//! [`AlertOutcome`] that the caller records and moves past.

use tracing::{debug, error, warn};

use crate::{
	models::{MatchResult, WatchTarget},
	services::{
		monitor::{AlertCheckResult, AlertTracker, MonitorError, RecipientProvider},
		notification::{build_alert_message, AlertDispatcher, NotificationError},
	},
};

/// What happened to the alert for one match
#[derive(Debug)]
pub enum AlertOutcome {
	/// Delivered to the recipient
	Sent,
	/// Delivery timed out or failed
	Failed(NotificationError),
	/// An identical alert was dispatched within the dedup window
	Suppressed,
	/// No usable recipient could be obtained
	NoRecipient(MonitorError),
}

/// Builds the alert for `matched` and dispatches it.
///
/// The recipient is fetched for every alert so that changes to the stored
/// address apply without restarting.
///
/// # Arguments
/// * `matched` - The match produced by the keyword filter
/// * `title` - Prefix of the alert subject
/// * `target` - The watched file, quoted in the alert body
/// * `tracker` - Duplicate suppression, if enabled
/// * `recipients` - Source of the destination address
/// * `dispatcher` - Delivery with timeout
pub async fn handle_match(
	matched: &MatchResult,
	title: &str,
	target: &WatchTarget,
	tracker: Option<&mut AlertTracker>,
	recipients: &dyn RecipientProvider,
	dispatcher: &AlertDispatcher,
) -> AlertOutcome {
	let message = build_alert_message(title, matched, target);

	if let Some(tracker) = tracker {
		let key = format!("{}\n{}", message.subject, matched.line());
		if let AlertCheckResult::Duplicate { since } = tracker.check_and_record(&key) {
			debug!(
				subject = %message.subject,
				since_ms = since.as_millis() as u64,
				"Duplicate alert suppressed"
			);
			return AlertOutcome::Suppressed;
		}
	}

	let recipient = match recipients.recipient().await {
		Ok(recipient) => recipient,
		Err(e) => {
			error!(subject = %message.subject, error = %e, "No recipient for alert");
			return AlertOutcome::NoRecipient(e);
		}
	};

	match dispatcher
		.dispatch(&message.subject, &message.body, &recipient)
		.await
	{
		Ok(()) => AlertOutcome::Sent,
		Err(e) => {
			warn!(subject = %message.subject, "Alert not delivered, continuing");
			AlertOutcome::Failed(e)
		}
	}
}
