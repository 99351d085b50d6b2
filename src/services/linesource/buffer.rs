/// Splits a byte stream into complete lines.
///
/// Bytes after the last `\n` stay pending until the terminating newline
/// arrives. Yielded lines never contain `\n`; a trailing `\r` is dropped as
/// well. Invalid UTF-8 is replaced lossily.
#[derive(Debug, Default)]
pub struct LineBuffer {
	pending: Vec<u8>,
}

impl LineBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `bytes` and returns every line completed by them
	pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
		let mut lines = Vec::new();
		let mut search_from = self.pending.len();
		self.pending.extend_from_slice(bytes);

		while let Some(pos) = self.pending[search_from..]
			.iter()
			.position(|b| *b == b'\n')
			.map(|p| p + search_from)
		{
			let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
			line.pop();
			if line.last() == Some(&b'\r') {
				line.pop();
			}
			lines.push(String::from_utf8_lossy(&line).into_owned());
			search_from = 0;
		}

		lines
	}

	/// Number of bytes waiting for a newline
	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}

	/// Drops the unterminated tail
	pub fn clear(&mut self) {
		self.pending.clear();
	}
}
