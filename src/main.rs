//! Log alert monitor entry point.
//!
//! Loads the monitor configuration, makes sure an alert recipient is
//! configured, then follows the configured log file until the user quits
//! from the terminal or presses Ctrl+C.
//!
//! # Flow
//! 1. Parses command line arguments and loads `.env`
//! 2. Loads the monitor configuration and builds the services
//! 3. Prompts for a recipient if none is stored
//! 4. Starts the monitor loop on a background task
//! 5. Renders status and errors in the terminal until shutdown
//!
//! Exit codes: 0 on clean shutdown, 1 when recipient setup is declined,
//! 2 when monitoring fails and 3 for invalid configuration.

use clap::{Arg, Command};
use dotenvy::dotenv;
use log_alert_monitor::{
	bootstrap::{
		create_monitor_loop, ensure_recipient_configured, initialize_services, load_monitor_config,
	},
	repositories::RecipientService,
	services::{
		monitor::MonitorError,
		shell::{ShellExit, ShellHandle, ShellRequest, TerminalShell},
	},
	utils::{
		constants::{DEFAULT_MONITOR_CONFIG_PATH, DEFAULT_RECIPIENT_CONFIG_PATH},
		logging::setup_logging,
	},
};
use std::{
	env::{set_var, var},
	path::PathBuf,
	process::ExitCode,
	sync::Arc,
	time::Duration,
};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{error, info, warn};

/// Shows a fatal error in the shell and returns the matching exit code.
async fn report_failure<R, W>(
	shell: &mut TerminalShell<R, W>,
	title: &str,
	error: &MonitorError,
) -> anyhow::Result<ExitCode>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	error!(error = %error, "{}", title);
	shell
		.handle(ShellRequest::ShowError {
			title: title.to_string(),
			message: error.to_string(),
		})
		.await?;
	Ok(ExitCode::from(error.exit_code()))
}

/// Resolves a path from a CLI argument, then an environment variable, then a default.
fn resolve_path(cli: Option<&String>, env_key: &str, default: &str) -> PathBuf {
	cli.cloned()
		.or_else(|| var(env_key).ok())
		.map(PathBuf::from)
		.unwrap_or_else(|| PathBuf::from(default))
}

/// Main entry point for the log alert monitor.
///
/// # Errors
/// Returns an error if the runtime cannot be built or the terminal cannot be
/// read or written.
fn main() -> anyhow::Result<ExitCode> {
	let runtime = tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?;
	let result = runtime.block_on(run());
	// A pending stdin read would otherwise hold the runtime open until Enter is pressed
	runtime.shutdown_timeout(Duration::from_millis(100));
	result
}

async fn run() -> anyhow::Result<ExitCode> {
	// Initialize command-line interface
	let matches = Command::new("log-alert-monitor")
		.version(env!("CARGO_PKG_VERSION"))
		.about(
			"Follows a log file and sends an alert for every new line containing one of the \
			 configured trigger keywords.",
		)
		.arg(
			Arg::new("config")
				.long("config")
				.help("Path to the monitor configuration (default: config/monitor.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("recipient-config")
				.long("recipient-config")
				.help("Path to the stored recipient (default: config/recipient.json)")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("watch")
				.long("watch")
				.help("Log file to follow, overriding the configured log path")
				.value_name("PATH"),
		)
		.arg(
			Arg::new("log-file")
				.long("log-file")
				.help("Write logs to file instead of stdout")
				.action(clap::ArgAction::SetTrue),
		)
		.arg(
			Arg::new("log-level")
				.long("log-level")
				.help("Set log level (trace, debug, info, warn, error)")
				.value_name("LEVEL"),
		)
		.arg(
			Arg::new("log-path")
				.long("log-path")
				.help("Path to store log files (default: logs/)")
				.value_name("PATH"),
		)
		.get_matches();

	// Load environment variables from .env file
	dotenv().ok();

	// Only apply CLI options if the corresponding environment variables are NOT already set
	if matches.get_flag("log-file") && var("LOG_MODE").is_err() {
		set_var("LOG_MODE", "file");
	}

	if let Some(level) = matches.get_one::<String>("log-level") {
		if var("LOG_LEVEL").is_err() {
			set_var("LOG_LEVEL", level);
		}
	}

	if let Some(path) = matches.get_one::<String>("log-path") {
		if var("LOG_DATA_DIR").is_err() {
			set_var("LOG_DATA_DIR", path);
		}
	}

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let config_path = resolve_path(
		matches.get_one::<String>("config"),
		"MONITOR_CONFIG_PATH",
		DEFAULT_MONITOR_CONFIG_PATH,
	);
	let recipient_path = resolve_path(
		matches.get_one::<String>("recipient-config"),
		"RECIPIENT_CONFIG_PATH",
		DEFAULT_RECIPIENT_CONFIG_PATH,
	);
	let watch_override = matches.get_one::<String>("watch").map(PathBuf::from);

	let (shell_handle, mut requests) = ShellHandle::channel();
	let mut shell = TerminalShell::stdio();

	let config = match load_monitor_config(&config_path, watch_override.as_deref()) {
		Ok(config) => config,
		Err(e) => return report_failure(&mut shell, "Invalid configuration", &e).await,
	};

	let (filter_service, dispatcher) = match initialize_services(&config) {
		Ok(services) => services,
		Err(e) => return report_failure(&mut shell, "Invalid configuration", &e).await,
	};

	// The shell has to run while setup waits on the prompt it answers
	let recipient_service = RecipientService::new(Some(&recipient_path));
	let setup = tokio::select! {
		result = ensure_recipient_configured(&recipient_service, &shell_handle) => result,
		exit = shell.run(&mut requests) => {
			exit?;
			Err(MonitorError::SetupDeclined)
		}
		_ = tokio::signal::ctrl_c() => Err(MonitorError::SetupDeclined),
	};
	if let Err(e) = setup {
		return report_failure(&mut shell, "Setup required", &e).await;
	}

	let monitor = create_monitor_loop(
		&config,
		filter_service,
		dispatcher,
		RecipientService::new(Some(&recipient_path)),
		Arc::new(shell_handle.clone()),
	);
	let mut handle = monitor.start();
	let canceller = handle.canceller();

	// Forward state changes to the shell
	let mut states = handle.subscribe();
	let status_shell = shell_handle.clone();
	let detail = config.watch_target().to_string();
	tokio::spawn(async move {
		while states.changed().await.is_ok() {
			let state = *states.borrow_and_update();
			status_shell.report_status(state, detail.clone());
		}
	});

	info!("Monitoring started. Type 'q' or press Ctrl+C to stop");

	let mut shell_active = true;
	let result = loop {
		tokio::select! {
			result = handle.wait() => break result,
			exit = shell.run(&mut requests), if shell_active => match exit {
				Ok(ShellExit::Quit) => {
					info!("Stop requested from the terminal, stopping monitor...");
					canceller.cancel();
				}
				Ok(ShellExit::Closed) => shell_active = false,
				Err(e) => {
					warn!(error = %e, "Terminal unavailable, stopping monitor...");
					shell_active = false;
					canceller.cancel();
				}
			},
			_ = tokio::signal::ctrl_c() => {
				info!("Shutdown signal received, stopping monitor...");
				canceller.cancel();
			}
		}
	};

	// Render anything posted while the loop was finishing
	while let Ok(request) = requests.try_recv() {
		if !matches!(request, ShellRequest::PromptRecipient { .. }) {
			shell.handle(request).await?;
		}
	}

	match result {
		Ok(outcome) => {
			info!(
				lines_read = outcome.lines_read,
				alerts_sent = outcome.alerts_sent,
				alerts_failed = outcome.alerts_failed,
				"Shutdown complete"
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => report_failure(&mut shell, "Monitoring stopped", &e).await,
	}
}
