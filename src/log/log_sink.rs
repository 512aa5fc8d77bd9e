use crate::log::{
    log_error::SinkError,
    log_record::{LogRecord, StructuredRecord},
};

/// Output destination receiving the logger's rendered message.
pub trait LogSink: Send + Sync {
    /// Delivers one record. Errors are isolated by the logger and never reach
    /// the code that issued the log call.
    ///
    /// # Errors
    ///
    /// Any [`SinkError`] describing why the record was not delivered.
    fn deliver(&self, record: &LogRecord) -> Result<(), SinkError>;

    /// Pushes buffered output to its destination. Sinks that write through
    /// keep the default.
    ///
    /// # Errors
    ///
    /// Any [`SinkError`] describing why buffered output could not be written.
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Output destination that formats log calls itself from their components.
pub trait StructuredLogSink: Send + Sync {
    /// # Errors
    ///
    /// Any [`SinkError`] describing why the record was not delivered.
    fn deliver_structured(&self, record: &StructuredRecord<'_>) -> Result<(), SinkError>;
}

impl<S: LogSink + ?Sized> LogSink for std::sync::Arc<S> {
    #[inline]
    fn deliver(&self, record: &LogRecord) -> Result<(), SinkError> {
        (**self).deliver(record)
    }

    #[inline]
    fn flush(&self) -> Result<(), SinkError> {
        (**self).flush()
    }
}

impl<S: StructuredLogSink + ?Sized> StructuredLogSink for std::sync::Arc<S> {
    #[inline]
    fn deliver_structured(&self, record: &StructuredRecord<'_>) -> Result<(), SinkError> {
        (**self).deliver_structured(record)
    }
}
