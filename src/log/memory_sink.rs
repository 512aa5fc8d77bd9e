use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::log::{log_error::SinkError, log_record::LogRecord, log_sink::LogSink};

/// Keeps every delivered record in memory.
///
/// Handy in tests and for in-process inspection of recent output.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copies of the captured records, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<LogRecord> {
        self.lock().clone()
    }

    /// Rendered messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|r| r.message.clone()).collect()
    }

    /// Drains the captured records.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.lock())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn deliver(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.lock().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{call_site::CallSite, log_level::LogLevel};

    #[test]
    fn captures_then_drains() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        for body in ["one", "two"] {
            let record = LogRecord::new(
                LogLevel::Warn,
                chrono::Local::now(),
                CallSite::new("a.rs", "f", 1),
                body,
            );
            assert!(sink.deliver(&record).is_ok());
        }

        assert_eq!(sink.len(), 2);
        assert!(sink.messages()[1].ends_with("a.1: f two"));
        let drained = sink.take();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, LogLevel::Warn);
        assert!(sink.is_empty());
    }
}
