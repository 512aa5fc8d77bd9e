use crate::{
    config::LoggerConfig,
    log::{log_error::SinkError, log_level::LogLevel, log_record::LogRecord, log_sink::LogSink},
};

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, RecvTimeoutError, TrySendError},
    thread,
    time::Duration,
};

/// Flush to disk every 100 lines so a crash loses little output.
const FLUSH_BATCH_SIZE: u32 = 100;

/// Queue length used when the configuration does not name one.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1_024;

/// How long [`LogSink::flush`] waits for the writer thread to confirm.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Work item for the writer thread.
#[derive(Debug)]
enum FileCommand {
    Line { level: LogLevel, text: String },
    /// Flush buffered lines, then report the outcome on the ack channel.
    Flush(mpsc::SyncSender<io::Result<()>>),
}

/// Bounded, non-blocking sink that appends to a per-process log file.
///
/// # Architecture
///
/// 1. **Producers**: the logger calls [`LogSink::deliver`] from any thread.
/// 2. **Queue**: a bounded `mpsc` channel buffers lines; when it is full the
///    line is dropped and [`SinkError::QueueFull`] is returned.
/// 3. **Consumer**: a dedicated thread writes to disk and flushes
///    periodically, on an explicit [`LogSink::flush`], and once more when the
///    sink is dropped.
pub struct FileSink {
    tx: Option<mpsc::SyncSender<FileCommand>>,
    worker: Option<thread::JoinHandle<()>>,
    file_path: PathBuf,
}

impl FileSink {
    /// Starts the sink as described by the `[Logging]` configuration section.
    ///
    /// Uses `file_dir` when set (with `~` expanded), otherwise a `logs/`
    /// directory next to the executable.
    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        let app_name = config.file_name.as_deref();
        match config.file_dir.as_deref() {
            Some(dir) => Self::start_in_dir(expand_path(dir), app_name, config.queue_capacity),
            None => Self::start_default(app_name, config.queue_capacity),
        }
    }

    /// Creates a `logs/` directory next to the executable and starts the sink there.
    ///
    /// # Example Filename
    /// `target/debug/logs/myapp-20251102_023045-pid1234.log`
    #[must_use]
    pub fn start_default(app_name: Option<&str>, cap: usize) -> Self {
        let base = exe_dir_fallback_cwd().join("logs");
        Self::start_in_dir(base, app_name, cap)
    }

    /// Starts the sink in a specific directory.
    ///
    /// This function:
    /// 1. Creates the target directory if it is missing.
    /// 2. Generates a unique filename based on the timestamp and process ID (PID).
    /// 3. Spawns the background writer thread.
    ///
    /// # Arguments
    ///
    /// * `dir` - The directory where the log file will be created.
    /// * `app_name` - Optional prefix for the log filename.
    /// * `cap` - Capacity of the line queue (backpressure buffer).
    pub fn start_in_dir<D: AsRef<Path>>(dir: D, app_name: Option<&str>, cap: usize) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let ts = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let pid = std::process::id();

        let fname = match app_name {
            Some(name) => format!("{name}-{ts}-pid{pid}.log"),
            None => format!("{ts}-pid{pid}.log"),
        };
        let file_path = dir.join(fname);

        let (tx, rx) = mpsc::sync_channel::<FileCommand>(cap.max(1));
        let worker_path = file_path.clone();

        let worker = thread::Builder::new()
            .name("veneer-file-sink".into())
            .spawn(move || write_lines(&worker_path, &rx))
            .ok();

        Self {
            tx: Some(tx),
            worker,
            file_path,
        }
    }

    /// Returns the path of the active log file.
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Enqueues a line without blocking the calling thread.
    ///
    /// # Errors
    ///
    /// - [`SinkError::QueueFull`] when the bounded queue is at capacity (the line is dropped).
    /// - [`SinkError::Disconnected`] when the writer thread is gone.
    pub fn try_write(&self, level: LogLevel, text: impl Into<String>) -> Result<(), SinkError> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(SinkError::Disconnected);
        };
        tx.try_send(FileCommand::Line {
            level,
            text: text.into(),
        })
        .map_err(|e| match e {
            TrySendError::Full(_) => SinkError::QueueFull,
            TrySendError::Disconnected(_) => SinkError::Disconnected,
        })
    }
}

impl LogSink for FileSink {
    #[inline]
    fn deliver(&self, record: &LogRecord) -> Result<(), SinkError> {
        self.try_write(record.level, record.message.as_str())
    }

    /// Blocks until every line queued before this call is on disk.
    fn flush(&self) -> Result<(), SinkError> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(SinkError::Disconnected);
        };
        let (ack_tx, ack_rx) = mpsc::sync_channel(1);
        tx.send(FileCommand::Flush(ack_tx))
            .map_err(|_| SinkError::Disconnected)?;
        match ack_rx.recv_timeout(FLUSH_TIMEOUT) {
            Ok(outcome) => outcome.map_err(SinkError::Io),
            Err(RecvTimeoutError::Timeout) => Err(SinkError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "file writer did not confirm the flush",
            ))),
            Err(RecvTimeoutError::Disconnected) => Err(SinkError::Disconnected),
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Closing the channel ends the writer loop, which flushes on exit.
        self.tx.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

/// Writer loop: target file -> temp file -> discard (never panics).
fn write_lines(path: &Path, rx: &mpsc::Receiver<FileCommand>) {
    let writer: Box<dyn Write + Send> =
        if let Ok(f) = OpenOptions::new().create(true).append(true).open(path) {
            Box::new(f)
        } else {
            let fallback = std::env::temp_dir().join("veneer-fallback.log");
            match OpenOptions::new().create(true).append(true).open(&fallback) {
                Ok(f) => Box::new(f),
                Err(_) => Box::new(io::sink()),
            }
        };

    let mut out = BufWriter::new(writer);
    let mut lines_written: u32 = 0;

    while let Ok(command) = rx.recv() {
        match command {
            FileCommand::Line { level, text } => {
                let _ = writeln!(&mut out, "[{level}] {text}");
                lines_written = lines_written.wrapping_add(1);

                if lines_written.is_multiple_of(FLUSH_BATCH_SIZE) {
                    let _ = out.flush();
                }
            }
            FileCommand::Flush(ack) => {
                let _ = ack.send(out.flush());
            }
        }
    }

    let _ = out.flush();
}

/// Locates the directory of the executable (target/{debug,release}),
/// or falls back to the current working directory on error.
fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Expands tilde (`~`) in file paths to the user's home directory.
pub(crate) fn expand_path(path_str: &str) -> PathBuf {
    if path_str.starts_with('~') {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from);

        if let Some(mut home_path) = home {
            if path_str == "~" {
                return home_path;
            }
            if let Some(rest) = path_str
                .strip_prefix("~/")
                .or_else(|| path_str.strip_prefix("~\\"))
            {
                home_path.push(rest);
                return home_path;
            }
        }
    }
    PathBuf::from(path_str)
}
