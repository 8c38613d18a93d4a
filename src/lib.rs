//! # synclog
//! Minimal leveled logger with atomic record writes, caller locations and a
//! process-wide default instance.
//!
//! Each record carries a header (optional `<prefix>`, optional date/time,
//! fixed-width level tag, optional call-site `file:line`) followed by the
//! message and a trailing newline. A single mutex per logger keeps records
//! from interleaving, no matter how many threads share it.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! synclog = "0.1.0"
//! ```
//!
//! ```rust
//! use synclog::{Flags, Level, Logger};
//!
//! let log = Logger::new(std::io::stderr(), "demo", Flags::DEFAULT, Level::Info);
//! log.info("starting up");
//! log.set_level(Level::Warn);
//! log.info("now filtered out");
//! ```
//!
//! ## The default instance
//! A process-wide logger writes to stderr with date and time headers; the
//! free functions and macros delegate to it.
//!
//! ```rust
//! synclog::set_prefix("app");
//! synclog::info("hello");
//! synclog::warn!("disk at {}%", 93);
//! ```
//!
//! ## Bridging the `log` crate
//! Records emitted through the `log` facade can be routed into the default
//! instance:
//!
//! ```rust
//! synclog::init_log_facade().expect("another logger is installed");
//! log::info!("hello from the log crate");
//! ```

mod config;
mod format;
mod level;
mod logger;
mod utils;

pub use config::{SYNCLOG_CONFIG, SynclogConfig};
pub use level::{Flags, Level, ParseLevelError};
pub use logger::Logger;
pub use utils::open_log_file;

use std::{fmt::Display, io, sync::LazyLock};

/// Process-wide default logger: stderr, no prefix, date and time headers,
/// minimum level taken from `SYNCLOG_LEVEL` (everything by default).
static DEFAULT_LOGGER: LazyLock<Logger> = LazyLock::new(|| {
    let level = SYNCLOG_CONFIG.LEVEL.parse().unwrap_or(Level::ALL);
    Logger::new(io::stderr(), "", Flags::STD, level)
});

/// The process-wide default logger shared by the free functions and macros.
pub fn default_logger() -> &'static Logger {
    &DEFAULT_LOGGER
}

/// Writes a debug record to the default logger.
#[track_caller]
pub fn debug(msg: impl Display) {
    default_logger().debug(msg);
}

/// Writes an info record to the default logger.
#[track_caller]
pub fn info(msg: impl Display) {
    default_logger().info(msg);
}

/// Writes a warning record to the default logger.
#[track_caller]
pub fn warn(msg: impl Display) {
    default_logger().warn(msg);
}

/// Writes an error record to the default logger.
#[track_caller]
pub fn error(msg: impl Display) {
    default_logger().error(msg);
}

/// Writes a panic record to the default logger, then panics with the
/// rendered message.
#[track_caller]
pub fn panic(msg: impl Display) -> ! {
    default_logger().panic(msg);
}

/// Writes a fatal record to the default logger, then terminates the process
/// with status 1.
#[track_caller]
pub fn fatal(msg: impl Display) -> ! {
    default_logger().fatal(msg);
}

/// Replaces the default logger's sink.
pub fn set_output<W>(out: W)
where
    W: io::Write + Send + 'static,
{
    default_logger().set_output(out);
}

pub fn flags() -> Flags {
    default_logger().flags()
}

pub fn set_flags(flags: Flags) {
    default_logger().set_flags(flags);
}

pub fn prefix() -> String {
    default_logger().prefix()
}

pub fn set_prefix(prefix: impl Into<String>) {
    default_logger().set_prefix(prefix);
}

pub fn level() -> Level {
    default_logger().level()
}

pub fn set_level(level: Level) {
    default_logger().set_level(level);
}

/// Writes a formatted debug record to the default logger.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => { $crate::default_logger().debug(format_args!($($arg)*)) };
}

/// Writes a formatted info record to the default logger.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::default_logger().info(format_args!($($arg)*)) };
}

/// Writes a formatted warning record to the default logger.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::default_logger().warn(format_args!($($arg)*)) };
}

/// Writes a formatted error record to the default logger.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => { $crate::default_logger().error(format_args!($($arg)*)) };
}

/// Writes a formatted fatal record to the default logger, then terminates
/// the process with status 1.
///
/// There is no `panic!` counterpart, as it would collide with the std macro
/// under glob imports; use [`panic`](crate::panic) with a `format!`-built
/// message instead.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => { $crate::default_logger().fatal(format_args!($($arg)*)) };
}

/// Forwards records from the `log` facade to the default logger.
struct LogFacade;

static LOG_FACADE: LogFacade = LogFacade;

impl log::Log for LogFacade {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Level::from(metadata.level()) >= default_logger().level()
    }

    fn log(&self, record: &log::Record) {
        let level = Level::from(record.level());
        let site = record.file().map(|f| (f, record.line().unwrap_or(0)));
        let _ = default_logger().write_record(level, site, &record.args().to_string());
    }

    fn flush(&self) {}
}

/// Routes the `log` crate's macros into the default logger.
///
/// `log`'s max level is raised to `Trace` so that gating stays with the
/// logger's own minimum level. Fails if another `log` backend is already
/// installed.
pub fn init_log_facade() -> Result<(), log::SetLoggerError> {
    log::set_logger(&LOG_FACADE)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

// The default instance is shared mutable state, so everything touching it
// lives in this one sequential test.
#[test]
fn test_default_logger_free_functions_macros_and_facade() {
    let sink = logger::TestSink::default();
    set_output(sink.clone());
    set_flags(Flags::NONE);
    set_level(Level::ALL);
    assert_eq!(level(), Level::ALL);
    assert_eq!(prefix(), "");

    info("via free function");
    crate::warn!("via macro, {} of {}", 1, 2);
    set_level(Level::Error);
    debug("gated out");

    init_log_facade().unwrap();
    log::error!("via facade");
    log::info!("gated out too");

    assert_eq!(
        sink.writes(),
        vec![
            "[INFO ] via free function\n",
            "[WARN ] via macro, 1 of 2\n",
            "[ERROR] via facade\n",
        ]
    );
}
