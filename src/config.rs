use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::log::{
    BuildMode, ConfigError, ConsoleSink, FileSink, LevelMask, Logger, LoggerError, SyslogSink,
    file_sink::DEFAULT_QUEUE_CAPACITY,
};

/// Section holding the logger settings.
pub const LOGGING_SECTION: &str = "Logging";

/// INI-style configuration: global `key = value` pairs followed by
/// `[section]` blocks. Lines starting with `#` are comments and values may be
/// wrapped in double quotes.
#[derive(Debug, Default)]
pub struct Config {
    pub globals: HashMap<String, String>,
    pub sections: HashMap<String, HashMap<String, String>>,
}

impl Config {
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut globals = HashMap::new();
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current_section: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                current_section = Some(name.trim().to_string());
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_string();
                let value = value.trim().trim_matches('"').to_string();

                match &current_section {
                    None => {
                        globals.insert(key, value);
                    }
                    Some(sec) => {
                        sections.entry(sec.clone()).or_default().insert(key, value);
                    }
                }
            }
        }
        Config { globals, sections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|sec| sec.get(key))
            .map(|s| s.as_str())
    }

    #[must_use]
    pub fn get_non_empty(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key).filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn get_global(&self, key: &str) -> Option<&str> {
        self.globals.get(key).map(|s| s.as_str())
    }

    /// Section value, else global value, both ignoring empty strings.
    #[must_use]
    pub fn lookup(&self, section: &str, key: &str) -> Option<&str> {
        self.get_non_empty(section, key)
            .or_else(|| self.get_global(key).filter(|s| !s.is_empty()))
    }
}

/// Where the console sink writes, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
    Off,
}

/// Settings of the `[Logging]` section.
///
/// ```ini
/// [Logging]
/// level = "info|warn|error"
/// build_mode = release
/// console = stderr
/// syslog = true
/// syslog_ident = myapp
/// file = true
/// file_dir = ~/.myapp/logs
/// file_name = myapp
/// queue_capacity = 4096
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: LevelMask,
    pub build_mode: BuildMode,
    pub console: ConsoleTarget,
    pub syslog: bool,
    pub syslog_ident: String,
    pub file: bool,
    pub file_dir: Option<String>,
    pub file_name: Option<String>,
    pub queue_capacity: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelMask::default(),
            build_mode: BuildMode::current(),
            console: ConsoleTarget::Stdout,
            syslog: false,
            syslog_ident: program_name(),
            file: false,
            file_dir: None,
            file_name: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl LoggerConfig {
    /// Reads `path` and extracts the `[Logging]` section.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or a value is invalid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_config(&Config::load(path)?)
    }

    /// Missing keys keep their defaults; keys outside the section act as
    /// fallbacks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] or [`ConfigError::InvalidValue`]
    /// for values that cannot be interpreted.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut out = Self::default();
        let get = |key: &str| config.lookup(LOGGING_SECTION, key);

        if let Some(level) = get("level") {
            out.level = level.parse()?;
        }
        if let Some(mode) = get("build_mode") {
            out.build_mode = match mode.to_ascii_lowercase().as_str() {
                "debug" => BuildMode::Debug,
                "release" => BuildMode::Release,
                _ => return Err(invalid("build_mode", mode)),
            };
        }
        if let Some(console) = get("console") {
            out.console = match console.to_ascii_lowercase().as_str() {
                "stdout" | "true" | "on" => ConsoleTarget::Stdout,
                "stderr" => ConsoleTarget::Stderr,
                "off" | "false" | "none" => ConsoleTarget::Off,
                _ => return Err(invalid("console", console)),
            };
        }
        if let Some(syslog) = get("syslog") {
            out.syslog = parse_bool("syslog", syslog)?;
        }
        if let Some(ident) = get("syslog_ident") {
            out.syslog_ident = ident.to_string();
        }
        if let Some(file) = get("file") {
            out.file = parse_bool("file", file)?;
        }
        out.file_dir = get("file_dir").map(str::to_string);
        out.file_name = get("file_name").map(str::to_string);
        if let Some(cap) = get("queue_capacity") {
            out.queue_capacity = cap
                .parse::<usize>()
                .ok()
                .filter(|c| *c > 0)
                .ok_or_else(|| invalid("queue_capacity", cap))?;
        }

        Ok(out)
    }

    /// Registers the configured sinks on `logger`: console, system log, file.
    ///
    /// # Errors
    ///
    /// Propagates sink construction failures.
    pub fn install_sinks(&self, logger: &Logger) -> Result<(), LoggerError> {
        match self.console {
            ConsoleTarget::Stdout => {
                logger.add_sink(ConsoleSink::stdout());
            }
            ConsoleTarget::Stderr => {
                logger.add_sink(ConsoleSink::stderr());
            }
            ConsoleTarget::Off => {}
        }
        if self.syslog {
            logger.add_sink(SyslogSink::new(&self.syslog_ident)?);
        }
        if self.file {
            logger.add_sink(FileSink::from_config(self));
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn program_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .unwrap_or_else(|| "veneer".to_string())
}
