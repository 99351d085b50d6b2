//! Integration tests for startup: configuration loading, recipient setup and
//! monitor assembly.

use crate::integration::mocks::{
	append_line, create_test_log, create_test_recipient, MockRecipientPrompt,
	MockRecipientRepository, RecordingNotifier,
};
use log_alert_monitor::{
	bootstrap::{create_monitor_loop, ensure_recipient_configured, load_monitor_config},
	repositories::{RecipientRepository, RecipientService, RepositoryError},
	services::{
		filter::FilterService,
		monitor::{MonitorError, MonitorState},
		notification::AlertDispatcher,
		shell::PromptReason,
	},
};
use mockall::predicate::eq;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tempfile::TempDir;

fn write_monitor_config(dir: &TempDir, log_path: &std::path::Path) -> PathBuf {
	let path = dir.path().join("monitor.json");
	let content = serde_json::json!({
		"name": "app_errors",
		"log_path": log_path,
		"trigger_keywords": ["error", "critical"],
		"poll_interval_ms": 10,
		"dispatch_timeout_ms": 1000
	});
	std::fs::write(&path, content.to_string()).unwrap();
	path
}

#[tokio::test]
async fn test_absent_recipient_prompts_exactly_once() {
	let mut repository = MockRecipientRepository::new();
	repository.expect_load().times(1).returning(|| Ok(None));
	repository
		.expect_save()
		.withf(|recipient| recipient.email() == "ops@example.com")
		.times(1)
		.returning(|_| Ok(()));

	let mut prompt = MockRecipientPrompt::new();
	prompt
		.expect_prompt_recipient()
		.with(eq(PromptReason::Missing))
		.times(1)
		.returning(|_| Some(create_test_recipient("ops@example.com")));

	let service = RecipientService::new_with_repository(repository);
	let recipient = ensure_recipient_configured(&service, &prompt).await.unwrap();

	assert_eq!(recipient.email(), "ops@example.com");
}

#[tokio::test]
async fn test_present_recipient_skips_prompt() {
	let mut repository = MockRecipientRepository::new();
	repository
		.expect_load()
		.returning(|| Ok(Some(create_test_recipient("ops@example.com"))));
	repository.expect_save().times(0);

	let mut prompt = MockRecipientPrompt::new();
	prompt.expect_prompt_recipient().times(0);

	let service = RecipientService::new_with_repository(repository);
	let recipient = ensure_recipient_configured(&service, &prompt).await.unwrap();

	assert_eq!(recipient.email(), "ops@example.com");
}

#[tokio::test]
async fn test_declined_setup() {
	let mut repository = MockRecipientRepository::new();
	repository.expect_load().returning(|| Ok(None));
	repository.expect_save().times(0);

	let mut prompt = MockRecipientPrompt::new();
	prompt
		.expect_prompt_recipient()
		.times(1)
		.returning(|_| None);

	let service = RecipientService::new_with_repository(repository);
	let result = ensure_recipient_configured(&service, &prompt).await;

	assert!(matches!(result, Err(MonitorError::SetupDeclined)));
	assert_eq!(result.unwrap_err().exit_code(), 1);
}

#[tokio::test]
async fn test_invalid_stored_recipient_prompts_for_reentry() {
	let dir = TempDir::new().unwrap();
	let recipient_path = dir.path().join("recipient.json");
	std::fs::write(&recipient_path, r#"{"alert": {"recipient_email": "broken@"}}"#).unwrap();

	let mut prompt = MockRecipientPrompt::new();
	prompt
		.expect_prompt_recipient()
		.withf(|reason| matches!(reason, PromptReason::Invalid(_)))
		.times(1)
		.returning(|_| Some(create_test_recipient("fixed@example.com")));

	let service = RecipientService::new(Some(&recipient_path));
	ensure_recipient_configured(&service, &prompt).await.unwrap();

	let stored = RecipientRepository::new(Some(&recipient_path));
	assert_eq!(
		RecipientService::new_with_repository(stored)
			.get()
			.unwrap()
			.unwrap()
			.email(),
		"fixed@example.com"
	);
}

#[tokio::test]
async fn test_unreadable_store_is_reported() {
	let mut repository = MockRecipientRepository::new();
	repository
		.expect_load()
		.returning(|| Err(RepositoryError::load_error("disk unavailable")));

	let mut prompt = MockRecipientPrompt::new();
	prompt.expect_prompt_recipient().times(0);

	let service = RecipientService::new_with_repository(repository);
	let result = ensure_recipient_configured(&service, &prompt).await;

	assert!(matches!(result, Err(MonitorError::RecipientStore(_))));
}

#[tokio::test]
async fn test_assembled_monitor_alerts_stored_recipient() {
	let dir = TempDir::new().unwrap();
	let log_path = create_test_log(&dir, "");
	let config_path = write_monitor_config(&dir, &log_path);
	let recipient_path = dir.path().join("recipient.json");

	let config = load_monitor_config(&config_path, None).unwrap();
	RecipientService::new(Some(&recipient_path))
		.set("ops@example.com")
		.unwrap();

	let (notifier, mut alerts) = RecordingNotifier::new();
	let dispatcher = AlertDispatcher::new(Arc::new(notifier), config.dispatch_timeout());
	let mut prompt = MockRecipientPrompt::new();
	prompt.expect_prompt_recipient().times(0);

	let monitor = create_monitor_loop(
		&config,
		FilterService::new(config.trigger_keywords.clone()),
		Arc::new(dispatcher),
		RecipientService::new(Some(&recipient_path)),
		Arc::new(prompt),
	);
	let mut handle = monitor.start();
	let mut states = handle.subscribe();
	tokio::time::timeout(
		Duration::from_secs(2),
		states.wait_for(|s| *s == MonitorState::Running),
	)
	.await
	.unwrap()
	.unwrap();

	append_line(&log_path, "CRITICAL: service down\n");
	let alert = tokio::time::timeout(Duration::from_secs(2), alerts.recv())
		.await
		.unwrap()
		.unwrap();
	assert_eq!(alert.recipient, "ops@example.com");
	assert_eq!(alert.subject, "[LOG ALERT][CRITICAL]");

	handle.stop();
	handle.wait().await.unwrap();
}

#[test]
fn test_watch_override_replaces_log_path() {
	let dir = TempDir::new().unwrap();
	let config_path = write_monitor_config(&dir, &dir.path().join("configured.log"));
	let override_path = dir.path().join("override.log");

	let config = load_monitor_config(&config_path, Some(&override_path)).unwrap();
	assert_eq!(config.watch_target().path(), override_path.as_path());
}
