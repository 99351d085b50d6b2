use email_address::EmailAddress;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::models::ConfigError;

lazy_static! {
	/// `local-part@domain(.tld)+`
	static ref EMAIL_PATTERN: Regex =
		Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-.]+)+$").unwrap();
}

/// Destination address for alert notifications.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecipientConfig {
	email: String,
}

impl RecipientConfig {
	/// Validates and wraps an address. Surrounding whitespace is ignored.
	///
	/// # Errors
	/// Returns `ConfigError::ValidationError` if the address is not of the
	/// form `local-part@domain.tld`.
	pub fn new(email: impl AsRef<str>) -> Result<Self, ConfigError> {
		let email = email.as_ref().trim();
		if !Self::is_valid_address(email) {
			return Err(ConfigError::validation_error(format!(
				"invalid email address '{}' (expected e.g. yourname@example.com)",
				email
			)));
		}
		Ok(Self {
			email: email.to_string(),
		})
	}

	/// Checks an address without constructing (and logging) an error.
	pub fn is_valid_address(email: &str) -> bool {
		EMAIL_PATTERN.is_match(email) && EmailAddress::is_valid(email)
	}

	pub fn email(&self) -> &str {
		&self.email
	}
}

impl FromStr for RecipientConfig {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl fmt::Display for RecipientConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.email)
	}
}
