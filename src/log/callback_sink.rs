use crate::log::{
    log_error::SinkError,
    log_record::{LogRecord, StructuredRecord},
    log_sink::{LogSink, StructuredLogSink},
};

type RenderedFn = dyn Fn(&LogRecord) -> Result<(), SinkError> + Send + Sync;
type StructuredFn = dyn Fn(&StructuredRecord<'_>) -> Result<(), SinkError> + Send + Sync;

/// Delegates delivery of the rendered record to an injected closure.
pub struct CallbackSink {
    callback: Box<RenderedFn>,
}

impl CallbackSink {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&LogRecord) -> Result<(), SinkError> + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Adapts an infallible closure.
    pub fn infallible<F>(callback: F) -> Self
    where
        F: Fn(&LogRecord) + Send + Sync + 'static,
    {
        Self::new(move |record| {
            callback(record);
            Ok(())
        })
    }
}

impl LogSink for CallbackSink {
    #[inline]
    fn deliver(&self, record: &LogRecord) -> Result<(), SinkError> {
        (self.callback)(record)
    }
}

/// Delegates formatting and delivery of the unrendered components to an
/// injected closure.
pub struct StructuredCallbackSink {
    callback: Box<StructuredFn>,
}

impl StructuredCallbackSink {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&StructuredRecord<'_>) -> Result<(), SinkError> + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }
}

impl StructuredLogSink for StructuredCallbackSink {
    #[inline]
    fn deliver_structured(&self, record: &StructuredRecord<'_>) -> Result<(), SinkError> {
        (self.callback)(record)
    }
}
