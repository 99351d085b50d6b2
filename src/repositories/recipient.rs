//! Recipient configuration repository implementation.
//!
//! This module provides storage and retrieval of the alert recipient address.
//! The record is a small JSON document:
//!
//! ```json
//! { "alert": { "recipient_email": "ops@example.com" } }
//! ```
//!
//! The file is re-read on every access so edits made while monitoring is
//! running are picked up by the next alert. No locking is performed.

use serde::{Deserialize, Serialize};
use std::{
	fs,
	path::{Path, PathBuf},
};

use crate::{
	models::RecipientConfig, repositories::error::RepositoryError,
	utils::constants::DEFAULT_RECIPIENT_CONFIG_PATH,
};

/// On-disk layout of the recipient record
#[derive(Debug, Deserialize, Serialize)]
struct RecipientFile {
	alert: AlertSection,
}

#[derive(Debug, Deserialize, Serialize)]
struct AlertSection {
	recipient_email: String,
}

/// Interface for recipient repository implementations
///
/// This trait defines the operations any recipient store must support,
/// allowing for different storage backends while maintaining a consistent interface.
pub trait RecipientRepositoryTrait: Send + Sync {
	/// Load the stored recipient
	///
	/// Returns `Ok(None)` when nothing has been stored yet and
	/// `RepositoryError::ValidationError` when the stored record is malformed.
	fn load(&self) -> Result<Option<RecipientConfig>, RepositoryError>;

	/// Persist a validated recipient, replacing any previous record
	fn save(&self, recipient: &RecipientConfig) -> Result<(), RepositoryError>;
}

/// File-backed recipient repository
#[derive(Debug, Clone)]
pub struct RecipientRepository {
	path: PathBuf,
}

impl RecipientRepository {
	/// Create a repository reading from `path`, or from the default
	/// location if None is provided.
	pub fn new(path: Option<&Path>) -> Self {
		Self {
			path: path
				.map(Path::to_path_buf)
				.unwrap_or_else(|| PathBuf::from(DEFAULT_RECIPIENT_CONFIG_PATH)),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl RecipientRepositoryTrait for RecipientRepository {
	fn load(&self) -> Result<Option<RecipientConfig>, RepositoryError> {
		let content = match fs::read_to_string(&self.path) {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => {
				return Err(RepositoryError::load_error(format!(
					"failed to read {}: {}",
					self.path.display(),
					e
				)))
			}
		};

		let record: RecipientFile = serde_json::from_str(&content)?;
		RecipientConfig::new(&record.alert.recipient_email)
			.map(Some)
			.map_err(|e| RepositoryError::validation_error(e.to_string()))
	}

	fn save(&self, recipient: &RecipientConfig) -> Result<(), RepositoryError> {
		if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| {
				RepositoryError::internal_error(format!(
					"failed to create {}: {}",
					parent.display(),
					e
				))
			})?;
		}

		let record = RecipientFile {
			alert: AlertSection {
				recipient_email: recipient.email().to_string(),
			},
		};
		let json = serde_json::to_string_pretty(&record)
			.map_err(|e| RepositoryError::internal_error(e.to_string()))?;

		fs::write(&self.path, json).map_err(|e| {
			RepositoryError::internal_error(format!(
				"failed to write {}: {}",
				self.path.display(),
				e
			))
		})
	}
}

/// Service layer for recipient repository operations
///
/// Provides address validation on write on top of any repository implementation.
#[derive(Debug, Clone)]
pub struct RecipientService<T: RecipientRepositoryTrait> {
	repository: T,
}

impl<T: RecipientRepositoryTrait> RecipientService<T> {
	/// Create a new recipient service with a custom repository implementation
	pub fn new_with_repository(repository: T) -> Self {
		Self { repository }
	}

	/// Get the stored recipient, if any
	pub fn get(&self) -> Result<Option<RecipientConfig>, RepositoryError> {
		self.repository.load()
	}

	/// Validate and store a recipient address
	pub fn set(&self, email: &str) -> Result<RecipientConfig, RepositoryError> {
		let recipient = RecipientConfig::new(email)
			.map_err(|e| RepositoryError::validation_error(e.to_string()))?;
		self.repository.save(&recipient)?;
		Ok(recipient)
	}

	/// Store an already validated recipient
	pub fn store(&self, recipient: &RecipientConfig) -> Result<(), RepositoryError> {
		self.repository.save(recipient)
	}
}

impl RecipientService<RecipientRepository> {
	/// Create a new recipient service backed by the file at `path`
	pub fn new(path: Option<&Path>) -> Self {
		Self::new_with_repository(RecipientRepository::new(path))
	}
}
