use crate::properties::strategies::log_bytes_strategy;
use log_alert_monitor::services::linesource::LineBuffer;
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_lines_never_contain_newlines(
		bytes in log_bytes_strategy(),
		split in any::<prop::sample::Index>(),
	) {
		let mut buffer = LineBuffer::new();
		let at = if bytes.is_empty() { 0 } else { split.index(bytes.len()) };

		let mut lines = buffer.push(&bytes[..at]);
		lines.extend(buffer.push(&bytes[at..]));

		prop_assert!(lines.iter().all(|line| !line.contains('\n')));
	}

	#[test]
	fn test_chunking_does_not_change_lines(
		bytes in log_bytes_strategy(),
		chunk_size in 1usize..32,
	) {
		let mut whole = LineBuffer::new();
		let expected = whole.push(&bytes);

		let mut chunked = LineBuffer::new();
		let actual: Vec<String> = bytes
			.chunks(chunk_size)
			.flat_map(|chunk| chunked.push(chunk))
			.collect();

		prop_assert_eq!(&actual, &expected);
		prop_assert_eq!(chunked.pending_len(), whole.pending_len());
	}

	#[test]
	fn test_one_line_per_newline(bytes in log_bytes_strategy()) {
		let mut buffer = LineBuffer::new();
		let lines = buffer.push(&bytes);

		let newlines = bytes.iter().filter(|b| **b == b'\n').count();
		let tail = bytes.iter().rev().take_while(|b| **b != b'\n').count();

		prop_assert_eq!(lines.len(), newlines);
		prop_assert_eq!(buffer.pending_len(), tail);
	}
}
