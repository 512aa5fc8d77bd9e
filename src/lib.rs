//! Veneer is a small logging facade: leveled, location-tagged log calls fanned
//! out to pluggable sinks.
//!
//! A [`Logger`](log::Logger) admits a call when its severity is in the active
//! [`LevelMask`](log::LevelMask), renders the message once as
//! `"<timestamp> <file>.<line>: <function> <message>"`, and hands it to every
//! registered sink in registration order. Sinks that fail or panic are
//! isolated; logging never fails from the caller's point of view.
//!
//! ```rust
//! use std::sync::Arc;
//! use veneer::log::{BuildMode, LevelMask, Logger, MemorySink};
//!
//! let logger = Logger::new(LevelMask::IMPORTANT, BuildMode::Debug);
//! let captured = Arc::new(MemorySink::new());
//! logger.add_shared_sink(captured.clone());
//!
//! veneer::logger_info!(logger, "dropped: below the mask");
//! veneer::logger_warn!(logger, "%d retries left", 2);
//!
//! assert_eq!(captured.len(), 1);
//! ```

/// Handles configuration loading for the logger.
pub mod config;
/// Levels, masks, sinks and the logger facade.
pub mod log;
