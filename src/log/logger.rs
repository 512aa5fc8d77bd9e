use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering},
    },
};

use chrono::{DateTime, Local};

use crate::{
    config::LoggerConfig,
    log::{
        call_site::CallSite,
        console_sink::ConsoleSink,
        level_mask::LevelMask,
        log_arg::LogArg,
        log_error::{LoggerError, SinkError},
        log_level::LogLevel,
        log_record::{LogRecord, StructuredRecord},
        log_sink::{LogSink, StructuredLogSink},
        template::render_template,
    },
};

/// Whether debug-only output (`Debug`, `Trace`) is compiled in, so to speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Debug,
    /// `debug` and `trace` calls become no-ops regardless of the mask.
    Release,
}

impl BuildMode {
    /// `Debug` when the crate is built with debug assertions, `Release` otherwise.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Debug
        } else {
            BuildMode::Release
        }
    }
}

/// Handle identifying a registered sink, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SinkId(u64);

#[derive(Clone)]
enum SinkKind {
    Rendered(Arc<dyn LogSink>),
    Structured(Arc<dyn StructuredLogSink>),
}

#[derive(Clone)]
struct SinkEntry {
    id: SinkId,
    kind: SinkKind,
}

/// Process-wide logging entry point: level mask, build mode and an ordered
/// registry of sinks.
///
/// A log call is admitted by the mask, rendered once, and handed to every
/// sink in registration order on the calling thread. Sink errors and panics
/// are contained per sink and reported to the diagnostic fallback; nothing
/// ever reaches the caller.
///
/// The registry is an immutable snapshot swapped on every change, so log
/// calls never hold a lock while sinks run and sinks may log themselves.
pub struct Logger {
    mask: AtomicU8,
    release: AtomicBool,
    sinks: RwLock<Arc<[SinkEntry]>>,
    next_id: AtomicU64,
    fallback: RwLock<Option<Arc<dyn LogSink>>>,
    failures: AtomicU64,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LevelMask::default(), BuildMode::current())
    }
}

impl Logger {
    /// Empty logger; failures are reported to stderr until
    /// [`Logger::set_fallback`] says otherwise.
    #[must_use]
    pub fn new(mask: LevelMask, mode: BuildMode) -> Self {
        let fallback: Arc<dyn LogSink> = Arc::new(ConsoleSink::stderr());
        Self {
            mask: AtomicU8::new(mask.bits()),
            release: AtomicBool::new(mode == BuildMode::Release),
            sinks: RwLock::new(Arc::from(Vec::new())),
            next_id: AtomicU64::new(1),
            fallback: RwLock::new(Some(fallback)),
            failures: AtomicU64::new(0),
        }
    }

    /// Default mask and build mode with a single stdout console sink.
    #[must_use]
    pub fn with_console() -> Self {
        let logger = Self::default();
        logger.add_sink(ConsoleSink::stdout());
        logger
    }

    /// Builds a logger and its sinks from the `[Logging]` configuration.
    ///
    /// # Errors
    ///
    /// Fails if a configured sink cannot be created (for example a syslog
    /// ident containing a NUL byte).
    pub fn from_config(config: &LoggerConfig) -> Result<Self, LoggerError> {
        let logger = Self::new(config.level, config.build_mode);
        config.install_sinks(&logger)?;
        Ok(logger)
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    pub fn set_level(&self, mask: LevelMask) {
        self.mask.store(mask.bits(), Ordering::Relaxed);
    }

    #[must_use]
    pub fn level(&self) -> LevelMask {
        LevelMask::from_bits_truncate(self.mask.load(Ordering::Relaxed))
    }

    pub fn set_build_mode(&self, mode: BuildMode) {
        self.release
            .store(mode == BuildMode::Release, Ordering::Relaxed);
    }

    #[must_use]
    pub fn build_mode(&self) -> BuildMode {
        if self.release.load(Ordering::Relaxed) {
            BuildMode::Release
        } else {
            BuildMode::Debug
        }
    }

    /// Whether a record at `level` would currently be admitted.
    #[must_use]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        if level.is_debug_only() && self.release.load(Ordering::Relaxed) {
            return false;
        }
        self.level().contains_level(level)
    }

    /// Appends a sink receiving rendered records.
    pub fn add_sink<S: LogSink + 'static>(&self, sink: S) -> SinkId {
        self.register(SinkKind::Rendered(Arc::new(sink)))
    }

    /// Appends an already shared sink, keeping the caller's handle usable.
    pub fn add_shared_sink(&self, sink: Arc<dyn LogSink>) -> SinkId {
        self.register(SinkKind::Rendered(sink))
    }

    /// Appends a sink receiving unrendered components.
    pub fn add_structured_sink<S: StructuredLogSink + 'static>(&self, sink: S) -> SinkId {
        self.register(SinkKind::Structured(Arc::new(sink)))
    }

    /// Removes a sink; returns false if it was not registered.
    pub fn remove_sink(&self, id: SinkId) -> bool {
        let mut guard = self.sinks.write().unwrap_or_else(PoisonError::into_inner);
        if !guard.iter().any(|e| e.id == id) {
            return false;
        }
        let next: Vec<SinkEntry> = guard.iter().filter(|e| e.id != id).cloned().collect();
        *guard = Arc::from(next);
        true
    }

    pub fn clear_sinks(&self) {
        let mut guard = self.sinks.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::from(Vec::new());
    }

    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Where sink failures are reported; `None` silences them.
    pub fn set_fallback(&self, sink: Option<Arc<dyn LogSink>>) {
        *self.fallback.write().unwrap_or_else(PoisonError::into_inner) = sink;
    }

    /// Number of sink deliveries and renderings that failed so far.
    #[must_use]
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn register(&self, kind: SinkKind) -> SinkId {
        let id = SinkId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut guard = self.sinks.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = guard.to_vec();
        next.push(SinkEntry { id, kind });
        *guard = Arc::from(next);
        id
    }

    fn snapshot(&self) -> Arc<[SinkEntry]> {
        Arc::clone(&self.sinks.read().unwrap_or_else(PoisonError::into_inner))
    }

    // ------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------

    /// Filters, renders and fans out one log call. Never fails.
    pub fn log(&self, level: LogLevel, template: &str, args: &[LogArg], site: CallSite) {
        if !self.is_enabled(level) {
            return;
        }

        let sinks = self.snapshot();
        if sinks.is_empty() {
            return;
        }

        let timestamp = Local::now();
        let mut rendered: Option<LogRecord> = None;

        for entry in sinks.iter() {
            let result = match &entry.kind {
                SinkKind::Rendered(sink) => {
                    let record = rendered.get_or_insert_with(|| {
                        self.render(level, timestamp, &site, template, args)
                    });
                    guarded(|| sink.deliver(record))
                }
                SinkKind::Structured(sink) => {
                    let structured = StructuredRecord {
                        level,
                        timestamp: &timestamp,
                        template,
                        args,
                        site: &site,
                    };
                    guarded(|| sink.deliver_structured(&structured))
                }
            };

            if let Err(err) = result {
                self.report_failure(&format!("sink #{} failed: {err}", entry.id.0));
            }
        }
    }

    /// Flushes every rendered sink in registration order. Failures are
    /// isolated and reported like delivery failures.
    pub fn flush(&self) {
        for entry in self.snapshot().iter() {
            if let SinkKind::Rendered(sink) = &entry.kind {
                if let Err(err) = guarded(|| sink.flush()) {
                    self.report_failure(&format!("sink #{} failed to flush: {err}", entry.id.0));
                }
            }
        }
    }

    pub fn error(&self, template: &str, args: &[LogArg], site: CallSite) {
        self.log(LogLevel::Error, template, args, site);
    }

    pub fn warn(&self, template: &str, args: &[LogArg], site: CallSite) {
        self.log(LogLevel::Warn, template, args, site);
    }

    pub fn info(&self, template: &str, args: &[LogArg], site: CallSite) {
        self.log(LogLevel::Info, template, args, site);
    }

    /// No-op in [`BuildMode::Release`].
    pub fn debug(&self, template: &str, args: &[LogArg], site: CallSite) {
        self.log(LogLevel::Debug, template, args, site);
    }

    /// No-op in [`BuildMode::Release`].
    pub fn trace(&self, template: &str, args: &[LogArg], site: CallSite) {
        self.log(LogLevel::Trace, template, args, site);
    }

    fn render(
        &self,
        level: LogLevel,
        timestamp: DateTime<Local>,
        site: &CallSite,
        template: &str,
        args: &[LogArg],
    ) -> LogRecord {
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| render_template(template, args)));
        let body = match rendered {
            Ok(Ok(body)) => body,
            Ok(Err(err)) => self.unrenderable(template, &err),
            Err(payload) => {
                let reason = format!("renderer panicked: {}", panic_message(payload.as_ref()));
                self.unrenderable(template, &reason)
            }
        };
        LogRecord::new(level, timestamp, site.clone(), &body)
    }

    /// Reports a template that could not be rendered and returns it raw.
    fn unrenderable(&self, template: &str, err: &dyn std::fmt::Display) -> String {
        self.report_failure(&format!("cannot render {template:?}: {err}"));
        format!("{template} [format error: {err}]")
    }

    fn report_failure(&self, what: &str) {
        self.failures.fetch_add(1, Ordering::Relaxed);

        let fallback = self
            .fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(fallback) = fallback {
            let record = LogRecord::new(
                LogLevel::Error,
                Local::now(),
                CallSite::from_static(file!(), "veneer::dispatch", line!()),
                what,
            );
            // The fallback is best effort too.
            let _ = guarded(|| fallback.deliver(&record));
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("build_mode", &self.build_mode())
            .field("sinks", &self.sink_count())
            .field("failures", &self.failure_count())
            .finish()
    }
}

/// Runs a sink call, turning a panic into [`SinkError::Panicked`].
fn guarded<F>(deliver: F) -> Result<(), SinkError>
where
    F: FnOnce() -> Result<(), SinkError>,
{
    panic::catch_unwind(AssertUnwindSafe(deliver))
        .unwrap_or_else(|payload| Err(SinkError::Panicked(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
