use std::{fmt, str::FromStr};

use crate::log::{level_mask::LevelMask, log_error::ConfigError};

/// Defines the severity levels for log messages.
///
/// Levels are independent flags rather than a strict hierarchy: each one owns a
/// distinct bit in a [`LevelMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Designates very fine-grained informational events.
    Trace,
    /// Designates fine-grained informational events that are most useful to debug an application.
    Debug,
    /// Designates informational messages that highlight the progress of the application at coarse-grained level.
    Info,
    /// Designates potentially harmful situations.
    Warn,
    /// Designates error events that might still allow the application to continue running.
    Error,
}

impl LogLevel {
    /// Every level, from the most verbose to the most severe.
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// The single-bit mask owned by this level.
    #[must_use]
    pub const fn bit(self) -> LevelMask {
        match self {
            LogLevel::Trace => LevelMask::TRACE,
            LogLevel::Debug => LevelMask::DEBUG,
            LogLevel::Info => LevelMask::INFO,
            LogLevel::Warn => LevelMask::WARN,
            LogLevel::Error => LevelMask::ERROR,
        }
    }

    /// Upper-case name used in rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Debug and trace output is dropped in release builds.
    #[must_use]
    pub const fn is_debug_only(self) -> bool {
        matches!(self, LogLevel::Trace | LogLevel::Debug)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLevel(s.trim().to_string())),
        }
    }
}

impl From<::log::Level> for LogLevel {
    fn from(level: ::log::Level) -> Self {
        match level {
            ::log::Level::Error => LogLevel::Error,
            ::log::Level::Warn => LogLevel::Warn,
            ::log::Level::Info => LogLevel::Info,
            ::log::Level::Debug => LogLevel::Debug,
            ::log::Level::Trace => LogLevel::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn bits_are_distinct_powers_of_two() {
        let mut seen = 0u8;
        for level in LogLevel::ALL {
            let bits = level.bit().bits();
            assert!(bits.is_power_of_two(), "{level} is not a single bit");
            assert_eq!(seen & bits, 0, "{level} shares a bit");
            seen |= bits;
        }
        assert_eq!(seen, LevelMask::ALL.bits());
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" warning ".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("Trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!(matches!(
            "verbose".parse::<LogLevel>(),
            Err(ConfigError::InvalidLevel(name)) if name == "verbose"
        ));
    }

    #[test]
    fn maps_log_crate_levels() {
        assert_eq!(LogLevel::from(::log::Level::Error), LogLevel::Error);
        assert_eq!(LogLevel::from(::log::Level::Trace), LogLevel::Trace);
    }
}
