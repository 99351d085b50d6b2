//! Integration tests for the monitor loop.
//!
//! Tests the follow, match and dispatch cycle against real files, including
//! delivery failures and timeouts that must not stop monitoring.

use crate::integration::mocks::{
	append_line, create_test_log, create_test_recipient, monitor_config_for, DeliveredAlert,
	MockNotifier, MockRecipientProvider, RecordingNotifier, StaticRecipient,
};
#[cfg(unix)]
use crate::integration::mocks::make_unreadable;
use log_alert_monitor::{
	models::MonitorConfig,
	services::{
		filter::FilterService,
		monitor::{MonitorError, MonitorHandle, MonitorLoop, MonitorState, RecipientProvider},
		notification::{AlertDispatcher, NotificationError, Notifier},
	},
};
use std::{sync::Arc, time::Duration};
use tempfile::TempDir;
use tokio::sync::mpsc;

const WAIT: Duration = Duration::from_secs(3);

fn start_monitor(
	config: &MonitorConfig,
	notifier: Arc<dyn Notifier>,
	recipients: Arc<dyn RecipientProvider>,
) -> MonitorHandle {
	let dispatcher = AlertDispatcher::new(notifier, config.dispatch_timeout());
	MonitorLoop::new(
		config,
		FilterService::new(config.trigger_keywords.clone()),
		Arc::new(dispatcher),
		recipients,
	)
	.start()
}

fn static_recipient() -> Arc<dyn RecipientProvider> {
	Arc::new(StaticRecipient(create_test_recipient("ops@example.com")))
}

async fn wait_until_running(handle: &MonitorHandle) {
	let mut states = handle.subscribe();
	tokio::time::timeout(WAIT, states.wait_for(|s| *s == MonitorState::Running))
		.await
		.expect("monitor did not start")
		.unwrap();
}

async fn next_alert(alerts: &mut mpsc::UnboundedReceiver<DeliveredAlert>) -> DeliveredAlert {
	tokio::time::timeout(WAIT, alerts.recv())
		.await
		.expect("no alert delivered")
		.unwrap()
}

#[tokio::test]
async fn test_existing_content_is_not_replayed() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "2023-12-31 ERROR: before start\n");
	let config = monitor_config_for(&path).build();
	let (notifier, mut alerts) = RecordingNotifier::new();

	let mut handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	wait_until_running(&handle).await;

	append_line(&path, "2024-01-01 ERROR: disk full\n");
	let alert = next_alert(&mut alerts).await;
	assert!(alert.body.contains("2024-01-01 ERROR: disk full"));

	handle.stop();
	handle.wait().await.unwrap();
	assert!(alerts.try_recv().is_err());
}

#[tokio::test]
async fn test_matching_lines_are_dispatched() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).build();
	let (notifier, mut alerts) = RecordingNotifier::new();

	let mut handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	wait_until_running(&handle).await;

	append_line(&path, "2024-01-01 ERROR: disk full\n");
	append_line(&path, "informational message\n");
	append_line(&path, "upload failed with error code 5\n");
	append_line(&path, "CRITICAL: out of memory\n");

	let first = next_alert(&mut alerts).await;
	assert_eq!(first.recipient, "ops@example.com");
	assert_eq!(first.subject, "[LOG ALERT][ERROR]");
	assert!(first.body.contains(&format!("Log path: {}", path.display())));
	assert!(first.body.ends_with("Content: 2024-01-01 ERROR: disk full"));

	// Declaration order is error, failed, critical
	let second = next_alert(&mut alerts).await;
	assert_eq!(second.subject, "[LOG ALERT][ERROR]");
	assert!(second.body.ends_with("Content: upload failed with error code 5"));

	let third = next_alert(&mut alerts).await;
	assert_eq!(third.subject, "[LOG ALERT][CRITICAL]");

	handle.stop();
	let outcome = handle.wait().await.unwrap();
	assert_eq!(outcome.lines_read, 4);
	assert_eq!(outcome.matches, 3);
	assert_eq!(outcome.alerts_sent, 3);
}

#[tokio::test]
async fn test_unmatched_lines_never_dispatch() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).build();

	let mut notifier = MockNotifier::new();
	notifier.expect_deliver().times(0);
	let mut recipients = MockRecipientProvider::new();
	recipients.expect_recipient().times(0);

	let mut handle = start_monitor(&config, Arc::new(notifier), Arc::new(recipients));
	wait_until_running(&handle).await;

	append_line(&path, "informational message\nall systems nominal\n");
	tokio::time::sleep(Duration::from_millis(200)).await;

	handle.stop();
	let outcome = handle.wait().await.unwrap();
	assert_eq!(outcome.lines_read, 2);
	assert_eq!(outcome.matches, 0);
}

#[tokio::test]
async fn test_partial_line_waits_for_newline() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).build();
	let (notifier, mut alerts) = RecordingNotifier::new();

	let mut handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	wait_until_running(&handle).await;

	append_line(&path, "disk write fail");
	tokio::time::sleep(Duration::from_millis(200)).await;
	assert!(alerts.try_recv().is_err());

	append_line(&path, "ed on /dev/sda1\n");
	let alert = next_alert(&mut alerts).await;
	assert!(alert.body.ends_with("Content: disk write failed on /dev/sda1"));

	handle.stop();
	handle.wait().await.unwrap();
}

#[tokio::test]
async fn test_delivery_failure_does_not_stop_monitoring() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).build();

	let (tx, mut delivered) = mpsc::unbounded_channel();
	let mut notifier = MockNotifier::new();
	let mut calls = 0;
	notifier.expect_deliver().times(2).returning(move |_, subject, _| {
		calls += 1;
		let _ = tx.send(subject.to_string());
		if calls == 1 {
			Err(NotificationError::delivery_failed("mail client exited with 1"))
		} else {
			Ok(())
		}
	});

	let mut handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	wait_until_running(&handle).await;

	append_line(&path, "first error\n");
	tokio::time::timeout(WAIT, delivered.recv()).await.unwrap();
	append_line(&path, "second critical\n");
	tokio::time::timeout(WAIT, delivered.recv()).await.unwrap();

	assert_eq!(handle.state(), MonitorState::Running);
	handle.stop();
	let outcome = handle.wait().await.unwrap();
	assert_eq!(outcome.alerts_failed, 1);
	assert_eq!(outcome.alerts_sent, 1);
}

struct HangingNotifier;

#[async_trait::async_trait]
impl Notifier for HangingNotifier {
	async fn deliver(&self, _: &str, _: &str, _: &str) -> Result<(), NotificationError> {
		tokio::time::sleep(Duration::from_secs(30)).await;
		Ok(())
	}
}

#[tokio::test]
async fn test_delivery_timeout_does_not_stop_monitoring() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).dispatch_timeout_ms(50).build();

	let mut handle = start_monitor(&config, Arc::new(HangingNotifier), static_recipient());
	wait_until_running(&handle).await;

	append_line(&path, "error one\nerror two\n");
	tokio::time::sleep(Duration::from_millis(500)).await;

	assert_eq!(handle.state(), MonitorState::Running);
	handle.stop();
	let outcome = tokio::time::timeout(WAIT, handle.wait())
		.await
		.unwrap()
		.unwrap();
	assert_eq!(outcome.matches, 2);
	assert_eq!(outcome.alerts_failed, 2);
}

#[tokio::test]
async fn test_missing_recipient_is_not_fatal() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).build();

	let mut notifier = MockNotifier::new();
	notifier.expect_deliver().times(0);
	let mut recipients = MockRecipientProvider::new();
	recipients
		.expect_recipient()
		.times(1)
		.returning(|| Err(MonitorError::SetupDeclined));

	let mut handle = start_monitor(&config, Arc::new(notifier), Arc::new(recipients));
	wait_until_running(&handle).await;

	append_line(&path, "fatal error\n");
	tokio::time::sleep(Duration::from_millis(300)).await;

	assert_eq!(handle.state(), MonitorState::Running);
	handle.stop();
	assert_eq!(handle.wait().await.unwrap().alerts_failed, 1);
}

#[tokio::test]
async fn test_nonexistent_path_stops_before_running() {
	let dir = TempDir::new().unwrap();
	let config = monitor_config_for(&dir.path().join("missing.log")).build();

	let mut notifier = MockNotifier::new();
	notifier.expect_deliver().times(0);

	let mut handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	let mut states = handle.subscribe();
	let result = handle.wait().await;

	match result {
		Err(MonitorError::TargetUnavailable { path, .. }) => {
			assert!(path.ends_with("missing.log"))
		}
		other => panic!("unexpected result: {:?}", other),
	}
	assert_eq!(*states.borrow_and_update(), MonitorState::Stopped);
	assert_eq!(handle.state(), MonitorState::Stopped);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_file_stops_before_running() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	if !make_unreadable(&path) {
		return;
	}
	let config = monitor_config_for(&path).build();

	let mut notifier = MockNotifier::new();
	notifier.expect_deliver().times(0);

	let mut handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	let result = handle.wait().await;

	assert!(matches!(result, Err(MonitorError::TargetUnavailable { .. })));
	assert_eq!(result.unwrap_err().exit_code(), 2);
	assert_eq!(handle.state(), MonitorState::Stopped);
}

#[tokio::test]
async fn test_canceller_stops_loop() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).build();
	let (notifier, _alerts) = RecordingNotifier::new();

	let mut handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	wait_until_running(&handle).await;

	let canceller = handle.canceller();
	tokio::spawn(async move { canceller.cancel() });

	let outcome = tokio::time::timeout(WAIT, handle.wait())
		.await
		.unwrap()
		.unwrap();
	assert_eq!(outcome.lines_read, 0);
	assert_eq!(handle.state(), MonitorState::Stopped);
}

#[tokio::test]
async fn test_dropping_handle_stops_loop() {
	let dir = TempDir::new().unwrap();
	let path = create_test_log(&dir, "");
	let config = monitor_config_for(&path).build();
	let (notifier, mut alerts) = RecordingNotifier::new();

	let handle = start_monitor(&config, Arc::new(notifier), static_recipient());
	wait_until_running(&handle).await;
	drop(handle);

	// The notifier is owned by the loop, so the channel closes once it exits
	let closed = tokio::time::timeout(WAIT, alerts.recv()).await.unwrap();
	assert!(closed.is_none());
}
