//! Constants for the application.

/// Default location of the monitor configuration file
pub const DEFAULT_MONITOR_CONFIG_PATH: &str = "config/monitor.json";

/// Default location of the persisted recipient address
pub const DEFAULT_RECIPIENT_CONFIG_PATH: &str = "config/recipient.json";

/// Prefix of every alert subject unless configured otherwise
pub const DEFAULT_ALERT_TITLE: &str = "[LOG ALERT]";

/// Interval between reads when the log file has no new data
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Upper bound for a single alert delivery
pub const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 10_000;

/// SMTP port used when the configuration does not name one
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Number of recent alerts remembered for duplicate suppression
pub const ALERT_HISTORY_SIZE: usize = 1000;

/// Process exit codes
pub const EXIT_SETUP_DECLINED: u8 = 1;
pub const EXIT_MONITOR_FAILED: u8 = 2;
pub const EXIT_INVALID_CONFIG: u8 = 3;
