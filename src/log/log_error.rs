use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to substitute arguments into a percent-style template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("template ends with an unterminated '%'")]
    DanglingPercent,
    #[error("unknown conversion '%{0}'")]
    UnknownConversion(char),
    #[error("missing argument for placeholder #{position}")]
    MissingArgument { position: usize },
    #[error("argument #{position} does not fit conversion '%{conversion}'")]
    TypeMismatch { position: usize, conversion: char },
    #[error("field width or precision {0} exceeds the supported maximum")]
    WidthTooLarge(usize),
}

/// Failure of a single sink to deliver a record.
///
/// Sink errors never reach the code that issued the log call; the logger
/// counts them and reports them to its diagnostic fallback.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("message cannot be delivered: {0}")]
    InvalidMessage(String),
    #[error("sink queue is full, message dropped")]
    QueueFull,
    #[error("sink worker is gone")]
    Disconnected,
    #[error("callback failed: {0}")]
    Callback(String),
    #[error("sink panicked: {0}")]
    Panicked(String),
}

/// Errors raised while reading logger configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown log level '{0}'")]
    InvalidLevel(String),
    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Errors raised by logger setup. Logging itself never fails.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("the global logger is already initialized")]
    AlreadyInitialized,
    #[error("a `log` crate logger is already installed")]
    BridgeAlreadyInstalled,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}
