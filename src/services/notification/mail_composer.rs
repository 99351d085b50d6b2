//! Mail composer notification implementation.
//!
//! Hands the alert to the platform mail client: on macOS Mail.app sends the
//! message through an AppleScript run by `osascript`; elsewhere a `mailto:`
//! URL is opened with the desktop handler (`xdg-open`, or `start` on Windows).

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::services::notification::{NotificationError, Notifier};

/// Platform mail integration to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailPlatform {
	MacOs,
	Windows,
	Unix,
}

impl MailPlatform {
	/// The platform this binary was built for
	pub fn current() -> Self {
		if cfg!(target_os = "macos") {
			MailPlatform::MacOs
		} else if cfg!(windows) {
			MailPlatform::Windows
		} else {
			MailPlatform::Unix
		}
	}
}

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerCommand {
	pub program: String,
	pub args: Vec<String>,
}

/// Delivers alerts through the platform mail client
#[derive(Debug, Clone)]
pub struct MailComposerNotifier {
	platform: MailPlatform,
}

impl Default for MailComposerNotifier {
	fn default() -> Self {
		Self::new()
	}
}

impl MailComposerNotifier {
	pub fn new() -> Self {
		Self::with_platform(MailPlatform::current())
	}

	pub fn with_platform(platform: MailPlatform) -> Self {
		Self { platform }
	}

	/// Builds the command that hands the message to the mail client
	pub fn build_command(&self, recipient: &str, subject: &str, body: &str) -> ComposerCommand {
		match self.platform {
			MailPlatform::MacOs => ComposerCommand {
				program: "osascript".to_string(),
				args: vec![
					"-e".to_string(),
					apple_mail_script(recipient, subject, body),
				],
			},
			MailPlatform::Windows => ComposerCommand {
				program: "cmd".to_string(),
				args: vec![
					"/C".to_string(),
					"start".to_string(),
					String::new(),
					escape_cmd(&mailto_url(recipient, subject, body)),
				],
			},
			MailPlatform::Unix => ComposerCommand {
				program: "xdg-open".to_string(),
				args: vec![mailto_url(recipient, subject, body)],
			},
		}
	}
}

/// `mailto:` URL with percent-encoded subject and body
pub fn mailto_url(recipient: &str, subject: &str, body: &str) -> String {
	format!(
		"mailto:{}?subject={}&body={}",
		recipient,
		urlencoding::encode(subject),
		urlencoding::encode(body)
	)
}

/// Escapes the characters `cmd.exe` would treat as separators or variable
/// references in an unquoted argument
fn escape_cmd(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());
	for c in value.chars() {
		if matches!(c, '&' | '%' | '^' | '|' | '<' | '>') {
			escaped.push('^');
		}
		escaped.push(c);
	}
	escaped
}

fn escape_applescript(value: &str) -> String {
	value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// AppleScript that creates and sends an outgoing message in Mail.app
fn apple_mail_script(recipient: &str, subject: &str, body: &str) -> String {
	format!(
		r#"tell application "Mail"
	set newMessage to make new outgoing message with properties {{subject:"{subject}", content:"{body}"}}
	tell newMessage
		make new to recipient at end of to recipients with properties {{address:"{recipient}"}}
		send
	end tell
end tell"#,
		subject = escape_applescript(subject),
		body = escape_applescript(body),
		recipient = escape_applescript(recipient),
	)
}

#[async_trait]
impl Notifier for MailComposerNotifier {
	/// Runs the composer command and waits for it to exit.
	///
	/// The child is killed if the delivery future is dropped, which is how the
	/// dispatcher's timeout stops a hung mail client.
	async fn deliver(
		&self,
		recipient: &str,
		subject: &str,
		body: &str,
	) -> Result<(), NotificationError> {
		let command = self.build_command(recipient, subject, body);
		debug!(program = %command.program, "Launching mail composer");

		let output = Command::new(&command.program)
			.args(&command.args)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true)
			.output()
			.await
			.map_err(|e| {
				NotificationError::delivery_failed(format!(
					"failed to launch {}: {}",
					command.program, e
				))
			})?;

		if !output.status.success() {
			let stderr = String::from_utf8_lossy(&output.stderr);
			return Err(NotificationError::delivery_failed(format!(
				"{} exited with {}: {}",
				command.program,
				output.status,
				stderr.trim()
			)));
		}

		Ok(())
	}
}
