pub mod call_site;
pub mod callback_sink;
pub mod console_sink;
pub mod file_sink;
pub mod global;
pub mod level_mask;
pub mod log_arg;
pub mod log_bridge;
pub mod log_error;
pub mod log_level;
pub mod log_macros;
pub mod log_record;
pub mod log_sink;
pub mod logger;
pub mod memory_sink;
pub mod noop_log_sink;
pub mod syslog_sink;
pub mod template;

pub use call_site::CallSite;
pub use callback_sink::{CallbackSink, StructuredCallbackSink};
pub use console_sink::ConsoleSink;
pub use file_sink::FileSink;
pub use level_mask::LevelMask;
pub use log_arg::LogArg;
pub use log_bridge::{LogBridge, install_log_bridge};
pub use log_error::{ConfigError, FormatError, LoggerError, SinkError};
pub use log_level::LogLevel;
pub use log_record::{LogRecord, StructuredRecord};
pub use log_sink::{LogSink, StructuredLogSink};
pub use logger::{BuildMode, Logger, SinkId};
pub use memory_sink::MemorySink;
pub use noop_log_sink::NoopLogSink;
pub use syslog_sink::{SyslogPriority, SyslogSink};
