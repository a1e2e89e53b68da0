//! Logging configuration: level, console target, JSON file output

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Targets
// ─────────────────────────────────────────────────────────────────────────────

/// Log file rotation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// Single file, never rotated
    Never,
}

impl LogRotation {
    /// Unknown values fall back to daily
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

/// Stream the human-readable console log goes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Console {
    /// Server mode
    #[default]
    Stdout,
    /// `lookup` always uses this: stdout carries the report
    Stderr,
}

impl Console {
    /// Unknown values fall back to stdout
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "stderr" => Self::Stderr,
            _ => Self::Stdout,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Effective logging settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Level for this crate's targets (RUST_LOG overrides the whole filter)
    pub level: String,
    pub console: Console,
    /// ANSI colors on the console layer
    pub color: bool,
    /// JSON lines to rolling files, in addition to the console
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name prefix: "fcoc-llicencies" -> "fcoc-llicencies.2025-01-15"
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console: Console::Stdout,
            color: true,
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::Daily,
            file_prefix: "fcoc-llicencies".to_string(),
        }
    }
}

/// `[logging]` section as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub console: Option<String>,
    pub color: Option<bool>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Apply a parsed `[logging]` section over the defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let mut config = Self::default();
        let Some(file) = file else {
            return config;
        };

        if let Some(level) = file.level {
            config.level = level;
        }
        if let Some(console) = file.console {
            config.console = Console::parse(&console);
        }
        if let Some(color) = file.color {
            config.color = color;
        }
        if let Some(enabled) = file.file_enabled {
            config.file_enabled = enabled;
        }
        if let Some(dir) = file.file_dir {
            config.file_dir = PathBuf::from(dir);
        }
        if let Some(rotation) = file.file_rotation {
            config.file_rotation = LogRotation::parse(&rotation);
        }
        if let Some(prefix) = file.file_prefix {
            config.file_prefix = prefix;
        }
        config
    }

    /// Settings for the `lookup` subcommand: console log moves to stderr
    pub fn for_cli(&self) -> Self {
        Self {
            console: Console::Stderr,
            ..self.clone()
        }
    }
}
