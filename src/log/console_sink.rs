use std::{
    io::{self, Write},
    sync::{Mutex, PoisonError},
};

use crate::log::{log_error::SinkError, log_record::LogRecord, log_sink::LogSink};

/// Writes each rendered message verbatim, one per line.
///
/// Writes are serialized so concurrent log calls never interleave within a
/// line.
pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Wraps any writer, e.g. a `Vec<u8>` or a file.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl LogSink for ConsoleSink {
    fn deliver(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", record.message)?;
        out.flush()?;
        Ok(())
    }
}
