//! Process-wide log level configuration.
//!
//! The driver's log output is gated by a single global [`LogLevel`]
//! with an explicit startup default and an explicit setter; there is
//! no hidden state beyond that one level. Messages that pass the gate
//! are forwarded to `tracing`.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::{DriverError, DriverResult};

/// Driver log verbosity levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Diagnostic output, including trace of controller calls.
    Debug = 0,
    /// Warnings only.
    Warning = 1,
    /// Errors only.
    Error = 2,
    /// Suppress all driver log output.
    None = 3,
}

impl LogLevel {
    /// Map the administrative command's raw integer to a level.
    pub const fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(Self::Debug),
            1 => Some(Self::Warning),
            2 => Some(Self::Error),
            3 => Some(Self::None),
            _ => Option::None,
        }
    }
}

/// Log level in effect at process startup.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Debug;

/// The single process-wide level; affects all subsequent log calls
/// from every driver instance.
static LOG_LEVEL: AtomicU8 = AtomicU8::new(DEFAULT_LOG_LEVEL as u8);

/// Current process-wide log level.
pub fn log_level() -> LogLevel {
    match LOG_LEVEL.load(Ordering::Relaxed) {
        0 => LogLevel::Debug,
        1 => LogLevel::Warning,
        2 => LogLevel::Error,
        _ => LogLevel::None,
    }
}

/// Set the process-wide log level directly.
pub fn set_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::Relaxed);
}

/// Administrative setter taking the raw integer form.
///
/// # Errors
/// Returns `DriverError::InvalidLogLevel` for values outside 0..=3;
/// the global level is left unchanged.
pub fn set_log_level(raw: i64) -> DriverResult<LogLevel> {
    let level = LogLevel::from_raw(raw).ok_or(DriverError::InvalidLogLevel(raw))?;
    set_level(level);
    Ok(level)
}

/// Whether a message at `level` would currently be emitted.
pub fn enabled(level: LogLevel) -> bool {
    level != LogLevel::None && level >= log_level()
}

/// Emit a message at the given level, subject to the global gate.
pub fn log(level: LogLevel, message: &str) {
    if !enabled(level) {
        return;
    }
    match level {
        LogLevel::Debug => tracing::debug!("{}", message),
        LogLevel::Warning => tracing::warn!("{}", message),
        LogLevel::Error => tracing::error!("{}", message),
        LogLevel::None => {}
    }
}
