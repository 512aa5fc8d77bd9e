use std::str::FromStr;

use bitflags::bitflags;

use crate::log::{log_error::ConfigError, log_level::LogLevel};

bitflags! {
    /// Set of severities currently enabled for output.
    ///
    /// Each [`LogLevel`] owns one bit. Presets such as [`LevelMask::IMPORTANT`]
    /// approximate the usual hierarchy, but any combination is allowed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LevelMask: u8 {
        const TRACE = 1 << 0;
        const DEBUG = 1 << 1;
        const INFO = 1 << 2;
        const WARN = 1 << 3;
        const ERROR = 1 << 4;

        /// Warnings and errors; the default active mask.
        const IMPORTANT = Self::WARN.bits() | Self::ERROR.bits();
        /// Alias of [`LevelMask::IMPORTANT`].
        const BAD = Self::IMPORTANT.bits();
        const ALL = Self::TRACE.bits()
            | Self::DEBUG.bits()
            | Self::INFO.bits()
            | Self::WARN.bits()
            | Self::ERROR.bits();
    }
}

impl LevelMask {
    /// The empty mask: nothing is admitted.
    pub const NONE: LevelMask = LevelMask::empty();

    /// Returns true iff the bit for `level` is set.
    #[must_use]
    pub const fn contains_level(self, level: LogLevel) -> bool {
        self.bits() & level.bit().bits() != 0
    }

    /// Conventional hierarchical preset: `level` and every more severe level.
    #[must_use]
    pub fn at_least(level: LogLevel) -> Self {
        LogLevel::ALL
            .iter()
            .skip_while(|l| **l != level)
            .fold(LevelMask::empty(), |acc, l| acc | l.bit())
    }

    /// Levels set in this mask, most verbose first.
    pub fn levels(self) -> impl Iterator<Item = LogLevel> {
        LogLevel::ALL
            .into_iter()
            .filter(move |l| self.contains_level(*l))
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        LevelMask::IMPORTANT
    }
}

impl From<LogLevel> for LevelMask {
    fn from(level: LogLevel) -> Self {
        level.bit()
    }
}

impl FromStr for LevelMask {
    type Err = ConfigError;

    /// Accepts preset names, level names, or a `|` / `,` separated list of both.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = LevelMask::empty();
        let mut any = false;
        for part in s.split(['|', ',']).map(str::trim) {
            if part.is_empty() {
                continue;
            }
            any = true;
            mask |= match part.to_ascii_lowercase().as_str() {
                "all" => LevelMask::ALL,
                "none" | "off" => LevelMask::NONE,
                "important" | "bad" => LevelMask::IMPORTANT,
                _ => part.parse::<LogLevel>()?.bit(),
            };
        }
        if any {
            Ok(mask)
        } else {
            Err(ConfigError::InvalidLevel(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn default_is_warn_and_error() {
        let mask = LevelMask::default();
        assert_eq!(mask, LevelMask::IMPORTANT);
        assert_eq!(mask, LevelMask::BAD);
        assert!(mask.contains_level(LogLevel::Warn));
        assert!(mask.contains_level(LogLevel::Error));
        assert!(!mask.contains_level(LogLevel::Info));
        assert!(!mask.contains_level(LogLevel::Debug));
        assert!(!mask.contains_level(LogLevel::Trace));
    }

    #[test]
    fn all_is_union_of_every_level() {
        let union = LogLevel::ALL
            .iter()
            .fold(LevelMask::empty(), |acc, l| acc | LevelMask::from(*l));
        assert_eq!(union, LevelMask::ALL);
        assert!(LevelMask::ALL.levels().eq(LogLevel::ALL));
    }

    #[test]
    fn arbitrary_combinations_are_independent() {
        let mask = LevelMask::TRACE | LevelMask::ERROR;
        assert!(mask.contains_level(LogLevel::Trace));
        assert!(!mask.contains_level(LogLevel::Debug));
        assert!(mask.contains_level(LogLevel::Error));
        assert_eq!(mask & LevelMask::IMPORTANT, LevelMask::ERROR);
        assert!(!LevelMask::NONE.contains_level(LogLevel::Error));
    }

    #[test]
    fn at_least_builds_hierarchical_presets() {
        assert_eq!(LevelMask::at_least(LogLevel::Warn), LevelMask::IMPORTANT);
        assert_eq!(LevelMask::at_least(LogLevel::Trace), LevelMask::ALL);
        assert_eq!(LevelMask::at_least(LogLevel::Error), LevelMask::ERROR);
    }

    #[test]
    fn parses_presets_and_lists() {
        assert_eq!("all".parse::<LevelMask>().unwrap(), LevelMask::ALL);
        assert_eq!("Bad".parse::<LevelMask>().unwrap(), LevelMask::IMPORTANT);
        assert_eq!("none".parse::<LevelMask>().unwrap(), LevelMask::NONE);
        assert_eq!(
            "info | error".parse::<LevelMask>().unwrap(),
            LevelMask::INFO | LevelMask::ERROR
        );
        assert_eq!(
            "debug,important".parse::<LevelMask>().unwrap(),
            LevelMask::DEBUG | LevelMask::IMPORTANT
        );
        assert!("".parse::<LevelMask>().is_err());
        assert!("info|loud".parse::<LevelMask>().is_err());
    }
}
