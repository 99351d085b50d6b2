//! Incremental reader over a growing log file.

use futures::Stream;
use std::{fs::Metadata, io::SeekFrom, time::Duration};
use tokio::{
	fs::File,
	io::{AsyncReadExt, AsyncSeekExt},
};
use tracing::{debug, info};

use crate::{
	models::{ReadCursor, RotationPolicy, WatchTarget},
	services::linesource::{LineBuffer, LineSourceError},
	utils::constants::DEFAULT_POLL_INTERVAL_MS,
};

const READ_CHUNK_SIZE: usize = 8 * 1024;
/// Bytes before the cursor compared before each read to spot in-place rewrites
const FINGERPRINT_SIZE: usize = 64;

/// Tuning for a [`LogFollower`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowOptions {
	/// Wait between reads that returned no data
	pub poll_interval: Duration,
	/// Where to resume after truncation or replacement
	pub rotation_policy: RotationPolicy,
}

impl Default for FollowOptions {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
			rotation_policy: RotationPolicy::ResetToStart,
		}
	}
}

/// Follows a log file from its current end, yielding complete lines.
///
/// `next_line` suspends until a full line is available; it never treats an
/// empty read as the end of the stream. The follower owns the open file
/// handle, which is closed when the follower is dropped.
pub struct LogFollower {
	target: WatchTarget,
	file: File,
	cursor: ReadCursor,
	buffer: LineBuffer,
	ready: std::collections::VecDeque<String>,
	chunk: Vec<u8>,
	identity: Option<FileIdentity>,
	fingerprint: Vec<u8>,
	options: FollowOptions,
}

impl LogFollower {
	/// Opens `target` and positions the cursor at its current end.
	///
	/// # Errors
	/// - `LineSourceError::NotFound` if the path does not exist
	/// - `LineSourceError::PermissionDenied` if the file cannot be read
	/// - `LineSourceError::ReadError` if the path is not a regular file
	pub async fn open(target: WatchTarget, options: FollowOptions) -> Result<Self, LineSourceError> {
		let mut file = File::open(target.path())
			.await
			.map_err(|e| LineSourceError::from_io(target.path(), e))?;

		let metadata = file
			.metadata()
			.await
			.map_err(|e| LineSourceError::from_io(target.path(), e))?;
		if !metadata.is_file() {
			return Err(LineSourceError::read_error(format!(
				"{} is not a regular file",
				target
			)));
		}

		let end = file
			.seek(SeekFrom::End(0))
			.await
			.map_err(|e| LineSourceError::from_io(target.path(), e))?;

		let fingerprint = read_fingerprint(&mut file, end)
			.await
			.map_err(|e| LineSourceError::from_io(target.path(), e))?;

		debug!(path = %target, offset = end, "Following log file");

		Ok(Self {
			target,
			file,
			cursor: ReadCursor::at(end),
			buffer: LineBuffer::new(),
			ready: std::collections::VecDeque::new(),
			chunk: vec![0; READ_CHUNK_SIZE],
			identity: FileIdentity::of(&metadata),
			fingerprint,
			options,
		})
	}

	pub fn target(&self) -> &WatchTarget {
		&self.target
	}

	pub fn cursor(&self) -> ReadCursor {
		self.cursor
	}

	/// Waits for the next complete line, newline stripped.
	///
	/// # Errors
	/// Returns an error if the file becomes unreadable while being followed.
	pub async fn next_line(&mut self) -> Result<String, LineSourceError> {
		loop {
			if let Some(line) = self.ready.pop_front() {
				return Ok(line);
			}

			self.check_rotation().await?;

			let read = self
				.file
				.read(&mut self.chunk)
				.await
				.map_err(|e| LineSourceError::from_io(self.target.path(), e))?;

			if read == 0 {
				tokio::time::sleep(self.options.poll_interval).await;
				continue;
			}

			self.cursor.advance(read as u64);
			self.remember(read);
			let lines = self.buffer.push(&self.chunk[..read]);
			self.ready.extend(lines);
		}
	}

	/// Exposes the follower as a stream that ends after the first error.
	pub fn into_stream(self) -> impl Stream<Item = Result<String, LineSourceError>> {
		futures::stream::unfold(Some(self), |state| async move {
			let mut follower = state?;
			match follower.next_line().await {
				Ok(line) => Some((Ok(line), Some(follower))),
				Err(e) => Some((Err(e), None)),
			}
		})
	}

	fn remember(&mut self, read: usize) {
		self.fingerprint.extend_from_slice(&self.chunk[..read]);
		if self.fingerprint.len() > FINGERPRINT_SIZE {
			let excess = self.fingerprint.len() - FINGERPRINT_SIZE;
			self.fingerprint.drain(..excess);
		}
	}

	/// Whether the bytes just before the cursor differ from those last read.
	///
	/// Catches a truncation followed by a write that grew the file past the
	/// cursor before the next poll.
	async fn rewritten_in_place(&self) -> Result<bool, LineSourceError> {
		if self.fingerprint.is_empty() {
			return Ok(false);
		}
		let mut file = match File::open(self.target.path()).await {
			Ok(file) => file,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
			Err(e) => return Err(LineSourceError::from_io(self.target.path(), e)),
		};
		let on_disk = read_fingerprint(&mut file, self.cursor.offset())
			.await
			.map_err(|e| LineSourceError::from_io(self.target.path(), e))?;
		Ok(on_disk != self.fingerprint)
	}

	/// Reopens the file if it shrank below the cursor, was rewritten in place
	/// or was replaced.
	///
	/// A path that is briefly missing (rotation in progress) is not an error.
	async fn check_rotation(&mut self) -> Result<(), LineSourceError> {
		let metadata = match tokio::fs::metadata(self.target.path()).await {
			Ok(metadata) => metadata,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
				debug!(path = %self.target, "Log file missing, waiting for it to reappear");
				return Ok(());
			}
			Err(e) => return Err(LineSourceError::from_io(self.target.path(), e)),
		};

		let replaced = match (self.identity, FileIdentity::of(&metadata)) {
			(Some(current), Some(on_disk)) => current != on_disk,
			_ => false,
		};
		let truncated = metadata.len() < self.cursor.offset()
			|| (!replaced && self.rewritten_in_place().await?);
		if !truncated && !replaced {
			return Ok(());
		}

		let mut file = File::open(self.target.path())
			.await
			.map_err(|e| LineSourceError::from_io(self.target.path(), e))?;
		let metadata = file
			.metadata()
			.await
			.map_err(|e| LineSourceError::from_io(self.target.path(), e))?;

		let offset = match self.options.rotation_policy {
			RotationPolicy::ResetToStart => 0,
			RotationPolicy::ResetToEnd => metadata.len(),
		};
		let fingerprint = read_fingerprint(&mut file, offset)
			.await
			.map_err(|e| LineSourceError::from_io(self.target.path(), e))?;

		info!(
			path = %self.target,
			truncated,
			replaced,
			offset,
			"Log file rotated, reopened"
		);

		self.file = file;
		self.cursor.reset(offset);
		self.buffer.clear();
		self.identity = FileIdentity::of(&metadata);
		self.fingerprint = fingerprint;
		Ok(())
	}
}

/// Reads up to [`FINGERPRINT_SIZE`] bytes ending at `end`, leaving `file`
/// positioned at `end`.
async fn read_fingerprint(file: &mut File, end: u64) -> std::io::Result<Vec<u8>> {
	let start = end.saturating_sub(FINGERPRINT_SIZE as u64);
	file.seek(SeekFrom::Start(start)).await?;
	let mut bytes = vec![0; (end - start) as usize];
	match file.read_exact(&mut bytes).await {
		Ok(_) => {}
		Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => bytes.clear(),
		Err(e) => return Err(e),
	}
	file.seek(SeekFrom::Start(end)).await?;
	Ok(bytes)
}

/// Identifies the file behind a path so replacement can be detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
	device: u64,
	inode: u64,
}

impl FileIdentity {
	#[cfg(unix)]
	fn of(metadata: &Metadata) -> Option<Self> {
		use std::os::unix::fs::MetadataExt;
		Some(Self {
			device: metadata.dev(),
			inode: metadata.ino(),
		})
	}

	#[cfg(not(unix))]
	fn of(_metadata: &Metadata) -> Option<Self> {
		None
	}
}
