//! Monitor loop.
//!
//! Validates the watched file, then pulls lines from a [`LogFollower`], runs
//! each through the keyword filter and dispatches an alert per match. The
//! loop runs on its own tokio task and is controlled through the
//! [`MonitorHandle`] returned by [`MonitorLoop::start`].

use std::{fmt, sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
	models::{MonitorConfig, WatchTarget},
	services::{
		filter::{handle_match, AlertOutcome, FilterService},
		linesource::{FollowOptions, LogFollower},
		monitor::{AlertTracker, MonitorError, RecipientProvider},
		notification::AlertDispatcher,
	},
	utils::constants::ALERT_HISTORY_SIZE,
};

/// Lifecycle of a monitor loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
	Idle,
	Validating,
	Running,
	Stopped,
}

impl fmt::Display for MonitorState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = match self {
			Self::Idle => "idle",
			Self::Validating => "validating",
			Self::Running => "running",
			Self::Stopped => "stopped",
		};
		write!(f, "{}", state)
	}
}

/// Counters for one monitoring session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorOutcome {
	pub lines_read: u64,
	pub matches: u64,
	pub alerts_sent: u64,
	pub alerts_failed: u64,
	pub alerts_suppressed: u64,
}

impl MonitorOutcome {
	fn record(&mut self, outcome: &AlertOutcome) {
		match outcome {
			AlertOutcome::Sent => self.alerts_sent += 1,
			AlertOutcome::Failed(_) | AlertOutcome::NoRecipient(_) => self.alerts_failed += 1,
			AlertOutcome::Suppressed => self.alerts_suppressed += 1,
		}
	}
}

/// A configured, not yet started monitor
pub struct MonitorLoop {
	name: String,
	target: WatchTarget,
	alert_title: String,
	follow_options: FollowOptions,
	dedup_window: Option<Duration>,
	filter: FilterService,
	dispatcher: Arc<AlertDispatcher>,
	recipients: Arc<dyn RecipientProvider>,
}

impl MonitorLoop {
	pub fn new(
		config: &MonitorConfig,
		filter: FilterService,
		dispatcher: Arc<AlertDispatcher>,
		recipients: Arc<dyn RecipientProvider>,
	) -> Self {
		Self {
			name: config.name.clone(),
			target: config.watch_target(),
			alert_title: config.alert_title.clone(),
			follow_options: FollowOptions {
				poll_interval: config.poll_interval(),
				rotation_policy: config.rotation_policy,
			},
			dedup_window: config.dedup_window(),
			filter,
			dispatcher,
			recipients,
		}
	}

	pub fn target(&self) -> &WatchTarget {
		&self.target
	}

	/// Spawns the loop on the current tokio runtime.
	pub fn start(self) -> MonitorHandle {
		let (shutdown_tx, shutdown_rx) = watch::channel(false);
		let (state_tx, state_rx) = watch::channel(MonitorState::Idle);

		let task = tokio::spawn(self.run(shutdown_rx, state_tx));

		MonitorHandle {
			shutdown: Arc::new(shutdown_tx),
			state: state_rx,
			task: Some(task),
		}
	}

	async fn run(
		self,
		mut shutdown: watch::Receiver<bool>,
		state: watch::Sender<MonitorState>,
	) -> Result<MonitorOutcome, MonitorError> {
		state.send_replace(MonitorState::Validating);

		if let Err(e) = validate_target(&self.target).await {
			warn!(monitor = %self.name, error = %e, "Log file validation failed");
			state.send_replace(MonitorState::Stopped);
			return Err(e);
		}

		let mut follower = match LogFollower::open(self.target.clone(), self.follow_options).await {
			Ok(follower) => follower,
			Err(e) => {
				state.send_replace(MonitorState::Stopped);
				return Err(MonitorError::from_line_source(&self.target, e));
			}
		};

		state.send_replace(MonitorState::Running);
		info!(monitor = %self.name, path = %self.target, "Monitoring started");

		let mut tracker = self
			.dedup_window
			.map(|window| AlertTracker::new(window, ALERT_HISTORY_SIZE));
		let mut outcome = MonitorOutcome::default();

		let result = loop {
			if *shutdown.borrow_and_update() {
				break Ok(());
			}

			let next = tokio::select! {
				_ = shutdown.changed() => None,
				line = follower.next_line() => Some(line),
			};
			let line = match next {
				// Shutdown requested or every handle dropped
				None => break Ok(()),
				Some(Ok(line)) => line,
				Some(Err(e)) => break Err(MonitorError::from_line_source(&self.target, e)),
			};

			outcome.lines_read += 1;
			let Some(matched) = self.filter.evaluate(&line) else {
				continue;
			};
			outcome.matches += 1;
			debug!(keywords = ?matched.matched_keywords(), "Trigger keywords matched");

			let alert = handle_match(
				&matched,
				&self.alert_title,
				&self.target,
				tracker.as_mut(),
				self.recipients.as_ref(),
				&self.dispatcher,
			)
			.await;
			outcome.record(&alert);
		};

		drop(follower);
		state.send_replace(MonitorState::Stopped);
		info!(
			monitor = %self.name,
			lines_read = outcome.lines_read,
			matches = outcome.matches,
			alerts_sent = outcome.alerts_sent,
			alerts_failed = outcome.alerts_failed,
			"Monitoring stopped"
		);

		result.map(|()| outcome)
	}
}

/// Checks that `target` exists, is a regular file and can be opened.
async fn validate_target(target: &WatchTarget) -> Result<(), MonitorError> {
	let metadata = tokio::fs::metadata(target.path())
		.await
		.map_err(|e| MonitorError::target_unavailable(target, e))?;

	if !metadata.is_file() {
		return Err(MonitorError::target_unavailable(
			target,
			"not a regular file",
		));
	}

	tokio::fs::File::open(target.path())
		.await
		.map_err(|e| MonitorError::target_unavailable(target, e))?;

	Ok(())
}

/// Requests shutdown of a running loop
#[derive(Debug, Clone)]
pub struct MonitorCanceller {
	shutdown: Arc<watch::Sender<bool>>,
}

impl MonitorCanceller {
	/// Takes effect at the next iteration boundary; an in-flight dispatch
	/// finishes first.
	pub fn cancel(&self) {
		self.shutdown.send_replace(true);
	}
}

/// Handle to a started monitor loop
pub struct MonitorHandle {
	shutdown: Arc<watch::Sender<bool>>,
	state: watch::Receiver<MonitorState>,
	task: Option<JoinHandle<Result<MonitorOutcome, MonitorError>>>,
}

impl MonitorHandle {
	pub fn stop(&self) {
		self.shutdown.send_replace(true);
	}

	pub fn canceller(&self) -> MonitorCanceller {
		MonitorCanceller {
			shutdown: self.shutdown.clone(),
		}
	}

	pub fn state(&self) -> MonitorState {
		*self.state.borrow()
	}

	/// Receiver that observes every state change
	pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
		self.state.clone()
	}

	/// Waits for the loop to finish.
	///
	/// Safe to call again if a previous call was cancelled before completion.
	///
	/// # Errors
	/// Returns the error that stopped the loop, or
	/// `MonitorError::UnexpectedLoopError` if the task panicked or was already
	/// awaited.
	pub async fn wait(&mut self) -> Result<MonitorOutcome, MonitorError> {
		let task = self.task.as_mut().ok_or_else(|| {
			MonitorError::UnexpectedLoopError("monitor task was already awaited".to_string())
		})?;

		let joined = task.await;
		self.task = None;

		joined.map_err(|e| MonitorError::UnexpectedLoopError(e.to_string()))?
	}
}
