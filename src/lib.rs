//! Log alert monitor.
//!
//! Follows a growing log file, matches each new line against a set of
//! trigger keywords and sends an alert for every matching line.
//!
//! # Architecture
//! - Models: monitor configuration, trigger keywords, recipients and alerts
//! - Repositories: the stored recipient address
//! - Services: log following, keyword filtering, alert delivery, the monitor
//!   loop and the terminal shell
//! - Bootstrap: loading configuration and wiring services together

pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
