use std::io;
use tokio::{
	io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout},
	sync::mpsc,
};
use tracing::debug;

use crate::{
	models::RecipientConfig,
	services::shell::{PromptReason, ShellRequest},
};

/// Why [`TerminalShell::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
	/// The user asked to stop monitoring
	Quit,
	/// Every [`ShellHandle`](super::ShellHandle) was dropped
	Closed,
}

/// Line-oriented shell over an input reader and an output writer
pub struct TerminalShell<R, W> {
	lines: Lines<R>,
	out: W,
	input_open: bool,
}

impl TerminalShell<BufReader<Stdin>, Stdout> {
	/// Shell bound to the process stdin and stdout
	pub fn stdio() -> Self {
		Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
	}
}

impl<R, W> TerminalShell<R, W>
where
	R: AsyncBufRead + Unpin,
	W: AsyncWrite + Unpin,
{
	pub fn new(reader: R, out: W) -> Self {
		Self {
			lines: reader.lines(),
			out,
			input_open: true,
		}
	}

	pub fn writer(&self) -> &W {
		&self.out
	}

	/// Renders requests until the user quits or the queue closes.
	///
	/// Typing `q` (or `quit`) and confirming stops the shell. Once input has
	/// ended, only requests are processed.
	pub async fn run(
		&mut self,
		requests: &mut mpsc::UnboundedReceiver<ShellRequest>,
	) -> io::Result<ShellExit> {
		loop {
			tokio::select! {
				request = requests.recv() => match request {
					Some(request) => self.handle(request).await?,
					None => return Ok(ShellExit::Closed),
				},
				line = self.lines.next_line(), if self.input_open => match line? {
					Some(line) if is_quit(&line) => {
						if self.confirm("Stop monitoring and exit? [y/N] ", false).await? {
							return Ok(ShellExit::Quit);
						}
					}
					Some(_) => self.write_line("Type 'q' to stop monitoring.").await?,
					None => {
						debug!("Shell input closed");
						self.input_open = false;
					}
				},
			}
		}
	}

	/// Renders a single request
	pub async fn handle(&mut self, request: ShellRequest) -> io::Result<()> {
		match request {
			ShellRequest::ShowError { title, message } => {
				self.write_line(&format!("[{}] {}", title, message)).await
			}
			ShellRequest::ShowStatus { state, detail } => {
				self.write_line(&format!("Status: {} ({})", state, detail)).await
			}
			ShellRequest::PromptRecipient { reason, reply } => {
				let answer = self.prompt(&reason).await?;
				if reply.send(answer).is_err() {
					debug!("Recipient prompt was abandoned by its caller");
				}
				Ok(())
			}
		}
	}

	/// Asks for a recipient address until a valid one is entered.
	///
	/// A blank answer asks whether to continue setup; declining, typing `q`,
	/// or reaching the end of input returns `None`.
	pub async fn prompt(&mut self, reason: &PromptReason) -> io::Result<Option<RecipientConfig>> {
		self.write_line(&reason.to_string()).await?;

		loop {
			self.write("Recipient email address ('q' to cancel): ").await?;
			let Some(input) = self.read_line().await? else {
				return Ok(None);
			};
			let input = input.trim();
			if is_quit(input) {
				return Ok(None);
			}

			if input.is_empty() {
				let resume = self
					.confirm(
						"A recipient address is required to start monitoring. Continue setup? [Y/n] ",
						true,
					)
					.await?;
				if !resume {
					return Ok(None);
				}
				continue;
			}

			match RecipientConfig::new(input) {
				Ok(recipient) => {
					self.write_line(&format!("Alerts will be sent to {}", recipient))
						.await?;
					return Ok(Some(recipient));
				}
				Err(_) => {
					self.write_line(&format!("Invalid email address: {}", input))
						.await?
				}
			}
		}
	}

	async fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
		self.write(question).await?;
		let answer = match self.read_line().await? {
			Some(answer) => answer,
			None => return Ok(false),
		};
		Ok(match answer.trim().to_lowercase().as_str() {
			"" => default,
			"y" | "yes" => true,
			_ => false,
		})
	}

	async fn read_line(&mut self) -> io::Result<Option<String>> {
		if !self.input_open {
			return Ok(None);
		}
		let line = self.lines.next_line().await?;
		if line.is_none() {
			self.input_open = false;
		}
		Ok(line)
	}

	async fn write(&mut self, text: &str) -> io::Result<()> {
		self.out.write_all(text.as_bytes()).await?;
		self.out.flush().await
	}

	async fn write_line(&mut self, text: &str) -> io::Result<()> {
		self.out.write_all(text.as_bytes()).await?;
		self.out.write_all(b"\n").await?;
		self.out.flush().await
	}
}

fn is_quit(line: &str) -> bool {
	matches!(line.trim().to_lowercase().as_str(), "q" | "quit")
}
