use crate::log::{
    log_error::SinkError,
    log_record::{LogRecord, StructuredRecord},
    log_sink::{LogSink, StructuredLogSink},
};

/// Sink that accepts and discards everything.
#[derive(Debug, Clone, Default)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    #[inline]
    fn deliver(&self, _record: &LogRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

impl StructuredLogSink for NoopLogSink {
    #[inline]
    fn deliver_structured(&self, _record: &StructuredRecord<'_>) -> Result<(), SinkError> {
        Ok(())
    }
}
