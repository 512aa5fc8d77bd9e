//! Routes records emitted through the `log` crate macros into a [`Logger`].

use std::borrow::Cow;

use crate::log::{
    call_site::CallSite, log_arg::LogArg, log_error::LoggerError, log_level::LogLevel,
    logger::Logger,
};

/// [`::log::Log`] implementation forwarding into a [`Logger`].
#[derive(Debug, Clone, Copy)]
pub struct LogBridge {
    logger: &'static Logger,
}

impl LogBridge {
    #[must_use]
    pub const fn new(logger: &'static Logger) -> Self {
        Self { logger }
    }

    fn call_site(record: &::log::Record<'_>) -> CallSite {
        let file = record
            .file_static()
            .map(Cow::Borrowed)
            .or_else(|| record.file().map(|f| Cow::Owned(f.to_string())))
            .unwrap_or(Cow::Borrowed("<unknown>"));
        let function = record
            .module_path_static()
            .map(Cow::Borrowed)
            .or_else(|| record.module_path().map(|m| Cow::Owned(m.to_string())))
            .unwrap_or(Cow::Borrowed(""));
        CallSite {
            file,
            function,
            line: record.line().unwrap_or(0),
        }
    }
}

impl ::log::Log for LogBridge {
    fn enabled(&self, metadata: &::log::Metadata<'_>) -> bool {
        self.logger.is_enabled(metadata.level().into())
    }

    fn log(&self, record: &::log::Record<'_>) {
        let level = LogLevel::from(record.level());
        if !self.logger.is_enabled(level) {
            return;
        }
        // Already formatted by `log`; pass it through untouched.
        let message = LogArg::Str(record.args().to_string());
        self.logger
            .log(level, "%@", std::slice::from_ref(&message), Self::call_site(record));
    }

    fn flush(&self) {
        self.logger.flush();
    }
}

/// Installs a [`LogBridge`] for `logger` as the `log` crate's global logger.
///
/// The `log` max level is opened fully; filtering stays with the logger's mask
/// so later [`Logger::set_level`] calls keep working.
///
/// # Errors
///
/// Returns [`LoggerError::BridgeAlreadyInstalled`] if another `log`
/// implementation was installed first.
pub fn install_log_bridge(logger: &'static Logger) -> Result<(), LoggerError> {
    let bridge: &'static LogBridge = Box::leak(Box::new(LogBridge::new(logger)));
    ::log::set_logger(bridge).map_err(|_| LoggerError::BridgeAlreadyInstalled)?;
    ::log::set_max_level(::log::LevelFilter::Trace);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::{
        LogRecord, LogSink, SinkError, level_mask::LevelMask, logger::BuildMode,
        memory_sink::MemorySink,
    };
    use ::log::Log;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    /// Sink that only counts flush requests.
    struct CountingFlush(Arc<AtomicUsize>);

    impl LogSink for CountingFlush {
        fn deliver(&self, _record: &LogRecord) -> Result<(), SinkError> {
            Ok(())
        }

        fn flush(&self) -> Result<(), SinkError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn leaked(mask: LevelMask) -> (&'static Logger, Arc<MemorySink>) {
        let logger: &'static Logger = Box::leak(Box::new(Logger::new(mask, BuildMode::Debug)));
        logger.set_fallback(None);
        let mem = Arc::new(MemorySink::new());
        logger.add_shared_sink(mem.clone());
        (logger, mem)
    }

    #[test]
    fn forwards_records_with_their_call_site() {
        let (logger, mem) = leaked(LevelMask::ALL);
        let bridge = LogBridge::new(logger);

        bridge.log(
            &::log::Record::builder()
                .level(::log::Level::Warn)
                .args(format_args!("disk at {}%", 93))
                .file_static(Some("src/storage/disk.rs"))
                .module_path_static(Some("app::storage::disk"))
                .line(Some(17))
                .build(),
        );

        let records = mem.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, LogLevel::Warn);
        assert_eq!(records[0].site.line, 17);
        assert!(records[0].message.ends_with("disk.17: app::storage::disk disk at 93%"));
    }

    #[test]
    fn respects_the_logger_mask() {
        let (logger, mem) = leaked(LevelMask::IMPORTANT);
        let bridge = LogBridge::new(logger);

        let info = ::log::Metadata::builder().level(::log::Level::Info).build();
        let error = ::log::Metadata::builder().level(::log::Level::Error).build();
        assert!(!bridge.enabled(&info));
        assert!(bridge.enabled(&error));

        bridge.log(
            &::log::Record::builder()
                .level(::log::Level::Info)
                .args(format_args!("hidden"))
                .build(),
        );
        assert!(mem.is_empty());
    }

    #[test]
    fn flush_reaches_the_logger_sinks() {
        let (logger, _mem) = leaked(LevelMask::ALL);
        let flushes = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&flushes);
        logger.add_sink(CountingFlush(seen));

        LogBridge::new(logger).flush();

        assert_eq!(flushes.load(Ordering::SeqCst), 1);
        assert_eq!(logger.failure_count(), 0);
    }
}
