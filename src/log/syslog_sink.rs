//! Platform system-log sink.
//!
//! On unix targets records go through `syslog(3)`. Elsewhere the sink writes
//! the rendered message to stderr so the same configuration works everywhere.

use crate::log::{
    log_error::SinkError, log_level::LogLevel, log_record::LogRecord, log_sink::LogSink,
};

/// Priorities understood by the system logger, mirroring `<syslog.h>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyslogPriority {
    Err,
    Warning,
    Info,
    Debug,
}

impl SyslogPriority {
    #[must_use]
    pub const fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => SyslogPriority::Err,
            LogLevel::Warn => SyslogPriority::Warning,
            LogLevel::Info => SyslogPriority::Info,
            LogLevel::Debug | LogLevel::Trace => SyslogPriority::Debug,
        }
    }

    /// Numeric value from `<syslog.h>`.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            SyslogPriority::Err => 3,
            SyslogPriority::Warning => 4,
            SyslogPriority::Info => 6,
            SyslogPriority::Debug => 7,
        }
    }
}

#[cfg(unix)]
mod platform {
    use std::{
        ffi::CString,
        sync::{Mutex, PoisonError},
    };

    use super::SyslogPriority;
    use crate::log::log_error::SinkError;

    /// The process-wide `openlog(3)` connection, shared by every open sink.
    struct Connection {
        // openlog(3) keeps this pointer; it must outlive the connection.
        ident: CString,
        users: usize,
    }

    static CONNECTION: Mutex<Option<Connection>> = Mutex::new(None);

    pub(super) struct SystemLog {
        ident: String,
    }

    impl SystemLog {
        /// Joins the connection, opening it under `ident` if no other sink
        /// holds it. Later idents do not replace the one already open.
        pub(super) fn open(ident: &str) -> Result<Self, SinkError> {
            let c_ident = CString::new(ident)
                .map_err(|_| SinkError::InvalidMessage("syslog ident contains NUL".into()))?;

            let mut connection = CONNECTION.lock().unwrap_or_else(PoisonError::into_inner);
            match connection.as_mut() {
                Some(open) => open.users += 1,
                None => {
                    // SAFETY: `c_ident` moves into `CONNECTION` below and its
                    // heap buffer stays put until `closelog` runs.
                    unsafe {
                        libc::openlog(
                            c_ident.as_ptr(),
                            libc::LOG_PID | libc::LOG_NDELAY,
                            libc::LOG_USER,
                        );
                    }
                    *connection = Some(Connection {
                        ident: c_ident,
                        users: 1,
                    });
                }
            }

            Ok(Self {
                ident: ident.to_string(),
            })
        }

        pub(super) fn ident(&self) -> &str {
            &self.ident
        }

        pub(super) fn send(
            &self,
            priority: SyslogPriority,
            message: &str,
        ) -> Result<(), SinkError> {
            let message = CString::new(message)
                .map_err(|_| SinkError::InvalidMessage("message contains NUL".into()))?;
            // SAFETY: both pointers are valid NUL-terminated strings; the
            // message is passed through "%s" so it is never interpreted.
            unsafe {
                libc::syslog(
                    priority.code() | libc::LOG_USER,
                    c"%s".as_ptr(),
                    message.as_ptr(),
                );
            }
            Ok(())
        }
    }

    impl Drop for SystemLog {
        fn drop(&mut self) {
            let mut connection = CONNECTION.lock().unwrap_or_else(PoisonError::into_inner);
            let Some(open) = connection.as_mut() else {
                return;
            };
            open.users -= 1;
            if open.users == 0 {
                // SAFETY: closelog has no preconditions; afterwards libc no
                // longer references the ident dropped just below.
                unsafe { libc::closelog() };
                *connection = None;
            }
        }
    }

    #[cfg(test)]
    pub(super) fn open_users() -> usize {
        CONNECTION
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or(0, |open| open.users)
    }
}

#[cfg(not(unix))]
mod platform {
    use std::io::Write;

    use super::SyslogPriority;
    use crate::log::log_error::SinkError;

    pub(super) struct SystemLog {
        ident: String,
    }

    impl SystemLog {
        pub(super) fn open(ident: &str) -> Result<Self, SinkError> {
            if ident.contains('\0') {
                return Err(SinkError::InvalidMessage("syslog ident contains NUL".into()));
            }
            Ok(Self {
                ident: ident.to_string(),
            })
        }

        pub(super) fn ident(&self) -> &str {
            &self.ident
        }

        pub(super) fn send(
            &self,
            priority: SyslogPriority,
            message: &str,
        ) -> Result<(), SinkError> {
            if message.contains('\0') {
                return Err(SinkError::InvalidMessage("message contains NUL".into()));
            }
            let mut err = std::io::stderr().lock();
            writeln!(err, "<{}>{}: {}", priority.code(), self.ident, message)?;
            Ok(())
        }
    }
}

/// Routes records to the platform system log, mapping each [`LogLevel`] to
/// the matching [`SyslogPriority`].
///
/// On unix all sinks share one `openlog(3)` connection: it opens with the
/// ident of the first sink and closes when the last sink is dropped, so
/// messages carry that first ident while several sinks are alive.
pub struct SyslogSink {
    log: platform::SystemLog,
}

impl SyslogSink {
    /// Opens the system log under `ident` (usually the program name).
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::InvalidMessage`] if `ident` contains a NUL byte.
    pub fn new(ident: &str) -> Result<Self, SinkError> {
        Ok(Self {
            log: platform::SystemLog::open(ident)?,
        })
    }

    #[must_use]
    pub fn ident(&self) -> &str {
        self.log.ident()
    }
}

impl std::fmt::Debug for SyslogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyslogSink")
            .field("ident", &self.ident())
            .finish()
    }
}

impl LogSink for SyslogSink {
    fn deliver(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.log
            .send(SyslogPriority::for_level(record.level), &record.message)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::call_site::CallSite;

    #[test]
    fn levels_map_to_system_priorities() {
        assert_eq!(SyslogPriority::for_level(LogLevel::Error), SyslogPriority::Err);
        assert_eq!(SyslogPriority::for_level(LogLevel::Warn), SyslogPriority::Warning);
        assert_eq!(SyslogPriority::for_level(LogLevel::Info), SyslogPriority::Info);
        assert_eq!(SyslogPriority::for_level(LogLevel::Debug), SyslogPriority::Debug);
        assert_eq!(SyslogPriority::for_level(LogLevel::Trace), SyslogPriority::Debug);
    }

    #[cfg(unix)]
    #[test]
    fn codes_match_libc() {
        assert_eq!(SyslogPriority::Err.code(), libc::LOG_ERR);
        assert_eq!(SyslogPriority::Warning.code(), libc::LOG_WARNING);
        assert_eq!(SyslogPriority::Info.code(), libc::LOG_INFO);
        assert_eq!(SyslogPriority::Debug.code(), libc::LOG_DEBUG);
    }

    #[test]
    fn rejects_nul_bytes() {
        assert!(matches!(
            SyslogSink::new("bad\0ident"),
            Err(SinkError::InvalidMessage(_))
        ));

        let sink = SyslogSink::new("veneer-test").expect("ident is valid");
        assert_eq!(sink.ident(), "veneer-test");
        let record = LogRecord::new(
            LogLevel::Info,
            chrono::Local::now(),
            CallSite::new("a.rs", "f", 1),
            "nul\0inside",
        );
        assert!(matches!(
            sink.deliver(&record),
            Err(SinkError::InvalidMessage(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn sinks_share_one_connection_until_the_last_drops() {
        let first = SyslogSink::new("veneer-first").expect("ident is valid");
        let second = SyslogSink::new("veneer-second").expect("ident is valid");
        assert!(platform::open_users() >= 2);

        drop(first);
        assert!(platform::open_users() >= 1);
        let record = LogRecord::new(
            LogLevel::Warn,
            chrono::Local::now(),
            CallSite::new("a.rs", "f", 1),
            "still connected",
        );
        assert!(second.deliver(&record).is_ok());
        assert_eq!(second.ident(), "veneer-second");
    }
}
