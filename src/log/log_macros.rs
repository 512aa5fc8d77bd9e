//! Leveled logging macros that capture the call site automatically.
//!
//! Two families:
//! - `logger_*!` take an explicit logger (`&Logger`, `Arc<Logger>`, ...).
//! - `log_*!` go to the process-wide instance from [`global::logger`](crate::log::global::logger).
//!
//! Arguments after the template are converted with `LogArg::from`:
//!
//! ```rust
//! use veneer::log::{Logger, MemorySink};
//! use std::sync::Arc;
//!
//! let logger = Logger::default();
//! let mem = Arc::new(MemorySink::new());
//! logger.add_shared_sink(mem.clone());
//!
//! veneer::logger_error!(logger, "%d of %d uploads failed", 2, 5);
//! assert!(mem.messages()[0].ends_with("2 of 5 uploads failed"));
//! ```
//!
//! `debug`/`trace` variants are filtered inside the logger by its
//! [`BuildMode`](crate::log::BuildMode), not at compile time.

// ============================================================================
// 1. GENERIC MACROS
// ============================================================================

#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $tpl:expr $(, $arg:expr)* $(,)?) => {{
        $logger.log(
            $lvl,
            $tpl,
            &[$($crate::log::LogArg::from($arg)),*],
            $crate::call_site!(),
        )
    }};
}

#[macro_export]
macro_rules! log_at {
    ($lvl:expr, $tpl:expr $(, $arg:expr)* $(,)?) => {{
        $crate::logger_log!($crate::log::global::logger(), $lvl, $tpl $(, $arg)*)
    }};
}

// ============================================================================
// 2. LEVEL-SPECIFIC MACROS
// ============================================================================

#[macro_export]
macro_rules! logger_trace { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Trace, $($arg)*) } }
#[macro_export]
macro_rules! logger_debug { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Debug, $($arg)*) } }
#[macro_export]
macro_rules! logger_info  { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Info, $($arg)*) } }
#[macro_export]
macro_rules! logger_warn  { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Warn, $($arg)*) } }
#[macro_export]
macro_rules! logger_error { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::log::LogLevel::Error, $($arg)*) } }

#[macro_export]
macro_rules! log_trace { ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Trace, $($arg)*) } }
#[macro_export]
macro_rules! log_debug { ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Debug, $($arg)*) } }
#[macro_export]
macro_rules! log_info  { ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Info, $($arg)*) } }
#[macro_export]
macro_rules! log_warn  { ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Warn, $($arg)*) } }
#[macro_export]
macro_rules! log_error { ($($arg:tt)*) => { $crate::log_at!($crate::log::LogLevel::Error, $($arg)*) } }
