//! Logging utilities for the application
//!
//! Logging is configured with `tracing_subscriber` from environment variables:
//!
//! - `RUST_LOG`: full filter directive, takes precedence over `LOG_LEVEL`
//! - `LOG_LEVEL`: level used when `RUST_LOG` is not set (default `info`)
//! - `LOG_MODE`: `stdout` (default) or `file`
//! - `LOG_DATA_DIR`: directory for log files in file mode (default `logs/`)
//!
//! In file mode logs go to daily rolling files through `tracing_appender`.
//! Records emitted with the `log` crate (error constructors) are forwarded to
//! the same subscriber.

use std::path::PathBuf;
use tracing_appender::rolling::{Builder as RollingBuilder, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

type LoggingResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

const LOG_FILE_PREFIX: &str = "log-alert-monitor";
const MAX_LOG_FILES: usize = 7;

/// Where log records are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogMode {
	Stdout,
	File(PathBuf),
}

impl LogMode {
	/// Reads `LOG_MODE` and `LOG_DATA_DIR`
	pub fn from_env() -> Self {
		match std::env::var("LOG_MODE") {
			Ok(mode) if mode.eq_ignore_ascii_case("file") => {
				let dir = std::env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string());
				LogMode::File(PathBuf::from(dir))
			}
			_ => LogMode::Stdout,
		}
	}
}

/// Builds the filter from `RUST_LOG`, then `LOG_LEVEL`, then `info`
fn env_filter() -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
		EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
	})
}

/// Setup logging for the application
///
/// Chooses stdout or rolling file output based on `LOG_MODE`.
pub fn setup_logging() -> LoggingResult {
	match LogMode::from_env() {
		LogMode::Stdout => setup_logging_with_writer(std::io::stdout, true),
		LogMode::File(dir) => {
			std::fs::create_dir_all(&dir)?;
			let appender = RollingBuilder::new()
				.rotation(Rotation::DAILY)
				.filename_prefix(LOG_FILE_PREFIX)
				.filename_suffix("log")
				.max_log_files(MAX_LOG_FILES)
				.build(&dir)?;
			setup_logging_with_writer(appender, false)
		}
	}
}

/// Setup logging for the application with a custom writer
pub fn setup_logging_with_writer<W>(writer: W, ansi: bool) -> LoggingResult
where
	W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
	tracing_subscriber::registry()
		.with(env_filter())
		.with(
			fmt::layer()
				.with_writer(writer)
				.event_format(
					fmt::format()
						.with_level(true)
						.with_target(true)
						.with_thread_ids(false)
						.with_thread_names(false)
						.with_ansi(ansi)
						.compact(),
				)
				.fmt_fields(fmt::format::PrettyFields::new()),
		)
		.try_init()?;
	Ok(())
}
