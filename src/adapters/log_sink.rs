//! Stderr log backend.
//!
//! Implements the `log` facade for the standalone runner. Every record
//! goes to stderr as `LEVEL target | message`, so stdout stays free for
//! readings. The level comes from `RUST_LOG` (`error`..`trace`), default
//! `info`.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Environment variable holding the maximum log level.
pub const LOG_LEVEL_ENV: &str = "RUST_LOG";

/// Logger that writes every enabled record to stderr.
pub struct StderrLogger {
    level: LevelFilter,
}

static LOGGER: StderrLogger = StderrLogger {
    level: LevelFilter::Trace,
};

impl StderrLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut err = std::io::stderr().lock();
        // A closed stderr leaves nowhere to report the failure.
        let _ = writeln!(err, "{:<5} {} | {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Parse a `RUST_LOG`-style level name. Unknown names give `None`.
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}

/// Install the stderr logger, filtering at `RUST_LOG` (default `info`).
pub fn init() -> Result<(), SetLoggerError> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(LevelFilter::Info);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
