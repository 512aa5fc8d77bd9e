use chrono::{DateTime, Local};

use crate::log::{call_site::CallSite, log_arg::LogArg, log_level::LogLevel};

/// Timestamp layout of the message preface: `YY-MM-dd HH:mm:ss.SSS`.
pub const TIMESTAMP_FORMAT: &str = "%y-%m-%d %H:%M:%S%.3f";

/// A single rendered log event.
///
/// Built at most once per admitted log call and shared by every rendered sink.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// The severity level of the log.
    pub level: LogLevel,
    /// Local time at which the log call was admitted.
    pub timestamp: DateTime<Local>,
    /// Where the call came from.
    pub site: CallSite,
    /// Fully rendered line: preface followed by the substituted template.
    pub message: String,
}

impl LogRecord {
    /// Creates a new `LogRecord`, rendering the preface in front of `body`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use veneer::log::{CallSite, LogLevel, LogRecord};
    ///
    /// let record = LogRecord::new(
    ///     LogLevel::Info,
    ///     chrono::Local::now(),
    ///     CallSite::new("Foo.swift", "bar()", 42),
    ///     "3 items",
    /// );
    /// assert!(record.message.ends_with("Foo.42: bar() 3 items"));
    /// ```
    pub fn new(level: LogLevel, timestamp: DateTime<Local>, site: CallSite, body: &str) -> Self {
        let message = render_message(&timestamp, &site, body);
        Self {
            level,
            timestamp,
            site,
            message,
        }
    }
}

/// Unrendered components of a log call, for sinks that format themselves.
#[derive(Debug, Clone, Copy)]
pub struct StructuredRecord<'a> {
    pub level: LogLevel,
    pub timestamp: &'a DateTime<Local>,
    pub template: &'a str,
    pub args: &'a [LogArg],
    pub site: &'a CallSite,
}

impl StructuredRecord<'_> {
    /// Renders this record the same way the logger would.
    ///
    /// # Errors
    ///
    /// Propagates template substitution failures.
    pub fn render(&self) -> Result<LogRecord, crate::log::FormatError> {
        let body = crate::log::template::render_template(self.template, self.args)?;
        Ok(LogRecord::new(
            self.level,
            *self.timestamp,
            self.site.clone(),
            &body,
        ))
    }
}

/// `"<timestamp> <fileBaseName>.<line>: <function> <body>"`
#[must_use]
pub fn render_message(timestamp: &DateTime<Local>, site: &CallSite, body: &str) -> String {
    format!(
        "{} {}.{}: {} {}",
        timestamp.format(TIMESTAMP_FORMAT),
        site.file_base_name(),
        site.line,
        site.function,
        body
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};

    #[test]
    fn preface_layout() {
        let ts = Local.with_ymd_and_hms(2025, 9, 5, 7, 8, 9).single().unwrap();
        let site = CallSite::new("Sources/Veneer/Foo.swift", "bar()", 42);
        assert_eq!(
            render_message(&ts, &site, "3 items"),
            "25-09-05 07:08:09.000 Foo.42: bar() 3 items"
        );
    }

    #[test]
    fn timestamp_prefix_parses_back() {
        let record = LogRecord::new(
            LogLevel::Warn,
            Local::now(),
            CallSite::new("Foo.swift", "bar()", 42),
            "3 items",
        );
        let (prefix, rest) = record.message.split_at(21);
        assert_eq!(rest, " Foo.42: bar() 3 items");
        NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).expect("prefix is a timestamp");
    }

    #[test]
    fn structured_record_renders_like_the_logger() {
        let ts = Local::now();
        let site = CallSite::new("Foo.swift", "bar()", 42);
        let args = [LogArg::from(3)];
        let structured = StructuredRecord {
            level: LogLevel::Info,
            timestamp: &ts,
            template: "%d items",
            args: &args,
            site: &site,
        };
        let record = structured.render().unwrap();
        assert_eq!(record.message, render_message(&ts, &site, "3 items"));
    }
}
