//! Line source error types and handling.
//!
//! Provides error types for opening and reading the followed log file.

use log::error;
use std::{error::Error, fmt, io, path::Path};

/// Represents possible errors while following a log file
#[derive(Debug)]
pub enum LineSourceError {
	/// The file does not exist
	NotFound(String),
	/// The file exists but cannot be read
	PermissionDenied(String),
	/// Any other I/O failure while reading
	ReadError(String),
}

impl LineSourceError {
	/// Formats the error message based on the error type
	fn format_message(&self) -> String {
		match self {
			Self::NotFound(msg) => format!("Log file not found: {}", msg),
			Self::PermissionDenied(msg) => format!("Log file not readable: {}", msg),
			Self::ReadError(msg) => format!("Log read error: {}", msg),
		}
	}

	/// Creates a new not found error with logging
	pub fn not_found(msg: impl Into<String>) -> Self {
		let error = Self::NotFound(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new permission denied error with logging
	pub fn permission_denied(msg: impl Into<String>) -> Self {
		let error = Self::PermissionDenied(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Creates a new read error with logging
	pub fn read_error(msg: impl Into<String>) -> Self {
		let error = Self::ReadError(msg.into());
		error!("{}", error.format_message());
		error
	}

	/// Classifies an I/O error raised for `path`
	pub fn from_io(path: &Path, err: io::Error) -> Self {
		let msg = format!("{}: {}", path.display(), err);
		match err.kind() {
			io::ErrorKind::NotFound => Self::not_found(msg),
			io::ErrorKind::PermissionDenied => Self::permission_denied(msg),
			_ => Self::read_error(msg),
		}
	}
}

impl fmt::Display for LineSourceError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_message())
	}
}

impl Error for LineSourceError {}
