use serde::{Deserialize, Serialize};

use crate::models::ConfigError;

/// Ordered set of lowercase trigger keywords.
///
/// The declaration order is preserved because it decides which keyword tags
/// the alert subject when several fire on the same line. A `TriggerSet` is
/// never empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TriggerSet {
	keywords: Vec<String>,
}

impl TriggerSet {
	/// Builds a trigger set, lowercasing every keyword.
	///
	/// Repeated keywords keep their first position only.
	///
	/// # Errors
	/// Returns `ConfigError::ValidationError` if no keyword is given or a
	/// keyword is blank.
	pub fn new<I, S>(keywords: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut normalized: Vec<String> = Vec::new();
		for keyword in keywords {
			let keyword = keyword.as_ref();
			if keyword.trim().is_empty() {
				return Err(ConfigError::validation_error(
					"trigger keywords cannot be blank",
				));
			}
			let keyword = keyword.to_lowercase();
			if !normalized.contains(&keyword) {
				normalized.push(keyword);
			}
		}

		if normalized.is_empty() {
			return Err(ConfigError::validation_error(
				"at least one trigger keyword is required",
			));
		}

		Ok(Self {
			keywords: normalized,
		})
	}

	/// Keywords in declaration order
	pub fn keywords(&self) -> &[String] {
		&self.keywords
	}

	pub fn iter(&self) -> std::slice::Iter<'_, String> {
		self.keywords.iter()
	}

	pub fn len(&self) -> usize {
		self.keywords.len()
	}

	pub fn is_empty(&self) -> bool {
		self.keywords.is_empty()
	}
}

impl TryFrom<Vec<String>> for TriggerSet {
	type Error = ConfigError;

	fn try_from(keywords: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(keywords)
	}
}

impl From<TriggerSet> for Vec<String> {
	fn from(set: TriggerSet) -> Self {
		set.keywords
	}
}

impl<'a> IntoIterator for &'a TriggerSet {
	type Item = &'a String;
	type IntoIter = std::slice::Iter<'a, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.keywords.iter()
	}
}
