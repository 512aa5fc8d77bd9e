//! The single process-wide [`Logger`].
//!
//! Call [`init`] once at startup to install a configured logger. If nothing
//! was installed, the first call to [`logger`] creates
//! [`Logger::with_console`] and every later [`init`] fails.

use std::sync::OnceLock;

use crate::log::{log_error::LoggerError, logger::Logger};

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Installs `logger` as the process-wide instance.
///
/// # Errors
///
/// Returns [`LoggerError::AlreadyInitialized`] if an instance already exists,
/// either from an earlier `init` or from a lazy default.
pub fn init(logger: Logger) -> Result<&'static Logger, LoggerError> {
    let mut slot = Some(logger);
    let installed = GLOBAL.get_or_init(|| slot.take().unwrap_or_default());
    if slot.is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    Ok(installed)
}

/// The process-wide instance, created with defaults on first use.
pub fn logger() -> &'static Logger {
    GLOBAL.get_or_init(Logger::with_console)
}

/// Whether [`init`] or [`logger`] already created the instance.
#[must_use]
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some()
}
