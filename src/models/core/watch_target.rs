use std::{
	fmt,
	path::{Path, PathBuf},
};

/// The file followed by a monitoring session.
///
/// Immutable for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
	path: PathBuf,
}

impl WatchTarget {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl fmt::Display for WatchTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.path.display())
	}
}

/// Byte position up to which the watch target has been consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCursor {
	offset: u64,
}

impl ReadCursor {
	pub fn at(offset: u64) -> Self {
		Self { offset }
	}

	pub fn offset(&self) -> u64 {
		self.offset
	}

	pub fn advance(&mut self, bytes: u64) {
		self.offset = self.offset.saturating_add(bytes);
	}

	pub fn reset(&mut self, offset: u64) {
		self.offset = offset;
	}
}
