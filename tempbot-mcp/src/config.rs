//! Client configuration: YAML file plus environment overrides

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the config file
pub const CONFIG_PATH_VAR: &str = "TEMPBOT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "tempbot.yml";
pub const DEFAULT_LOG_FILE: &str = "tempbot.log";

const LOG_LEVEL_VAR: &str = "TEMPBOT_LOG_LEVEL";
const LOG_OUTPUT_VAR: &str = "TEMPBOT_LOG_OUTPUT";
const LOG_FORMAT_VAR: &str = "TEMPBOT_LOG_FORMAT";
const LOG_FILE_VAR: &str = "TEMPBOT_LOG_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(LogLevel::Error),
            "WARN" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "DEBUG" => Ok(LogLevel::Debug),
            "TRACE" => Ok(LogLevel::Trace),
            _ => Err(()),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogOutput {
    #[default]
    Console,
    File,
    ConsoleAndFile,
}

impl LogOutput {
    pub fn to_console(&self) -> bool {
        matches!(self, LogOutput::Console | LogOutput::ConsoleAndFile)
    }

    pub fn to_file(&self) -> bool {
        matches!(self, LogOutput::File | LogOutput::ConsoleAndFile)
    }
}

impl FromStr for LogOutput {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONSOLE" => Ok(LogOutput::Console),
            "FILE" => Ok(LogOutput::File),
            "CONSOLE_AND_FILE" => Ok(LogOutput::ConsoleAndFile),
            _ => Err(()),
        }
    }
}

/// `Dev` adds target, file and line to every event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Dev,
    #[default]
    Prod,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEV" => Ok(LogFormat::Dev),
            "PROD" => Ok(LogFormat::Prod),
            _ => Err(()),
        }
    }
}

/// Keys as they appear in the YAML file; unknown keys are ignored
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    log_level: Option<String>,
    log_output: Option<String>,
    log_format: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub log_level: LogLevel,
    pub log_output: LogOutput,
    pub log_format: LogFormat,
    pub log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            log_level: LogLevel::default(),
            log_output: LogOutput::default(),
            log_format: LogFormat::default(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl ClientConfig {
    /// Load from `$TEMPBOT_CONFIG` (or `tempbot.yml`) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let content = read_config_file(&config_path())?;
        Self::from_yaml(&content, |key| env::var(key).ok())
    }

    /// Parse YAML text and apply overrides from `lookup`
    pub fn from_yaml(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::from_sources(parse_raw(content)?, lookup)
    }

    fn from_sources(raw: RawConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let pick = |key: &str, var: &str, file_value: Option<String>| {
            lookup(var).or(file_value).map(|value| (key.to_string(), value))
        };

        let mut config = ClientConfig::default();
        if let Some((key, value)) = pick("log_level", LOG_LEVEL_VAR, raw.log_level) {
            config.log_level = parse_value(key, value)?;
        }
        if let Some((key, value)) = pick("log_output", LOG_OUTPUT_VAR, raw.log_output) {
            config.log_output = parse_value(key, value)?;
        }
        if let Some((key, value)) = pick("log_format", LOG_FORMAT_VAR, raw.log_format) {
            config.log_format = parse_value(key, value)?;
        }
        if let Some((_, value)) = pick("log_file", LOG_FILE_VAR, raw.log_file) {
            config.log_file = PathBuf::from(value);
        }
        Ok(config)
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level={:?} output={:?} format={:?} file={}",
            self.log_level,
            self.log_output,
            self.log_format,
            self.log_file.display()
        )
    }
}

pub fn config_path() -> PathBuf {
    env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        // a missing file means defaults
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_raw(content: &str) -> Result<RawConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(RawConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

fn parse_value<T: FromStr>(key: String, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
