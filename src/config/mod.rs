//! Configuration for the lookup server
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/fcoc-llicencies/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::licensing::client::{ApiConfig, DEFAULT_API_URL, DEFAULT_TOKEN_ENV};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;


pub use observability::{Console, FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:8501";
const DEFAULT_LOGO: &str = "logo_fcoc_2q.png";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the web form listens on
    pub bind_addr: SocketAddr,

    /// Licensing API endpoint (without query string)
    pub api_url: String,

    /// Environment variable holding the API bearer token
    pub token_env: String,

    /// Upstream request timeout; unset keeps the HTTP client default
    pub request_timeout_secs: Option<u64>,

    /// Logo image served at /logo.png
    pub logo_path: PathBuf,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            api_url: DEFAULT_API_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            request_timeout_secs: None,
            logo_path: PathBuf::from(DEFAULT_LOGO),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub api_url: Option<String>,
    pub token_env: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub logo_path: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/fcoc-llicencies/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| {
            p.join(".config")
                .join("fcoc-llicencies")
                .join("config.toml")
        })
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        if let Err(e) = std::fs::write(&path, Self::default().to_toml()) {
            tracing::debug!("Could not write config template {}: {}", path.display(), e);
        }
    }

    /// Parse a config file. A missing file yields the empty file config; an
    /// unreadable or malformed one is an error.
    pub(crate) fn load_file_config(path: &Path) -> Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file {}", path.display())),
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        // Bind address: env > file > default
        let bind_raw = env("FCOC_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("Invalid bind address {:?}", bind_raw))?;

        // API URL: env > file > default
        let api_url = env("FCOC_API_URL")
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // Token variable name: file > default (the token itself never lives in the file)
        let token_env = file
            .token_env
            .unwrap_or_else(|| DEFAULT_TOKEN_ENV.to_string());

        // Logo: env > file > default
        let logo_path = env("FCOC_LOGO")
            .or(file.logo_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOGO));

        let logging = LoggingConfig::from_file(file.logging);

        Ok(Self {
            bind_addr,
            api_url,
            token_env,
            request_timeout_secs: file.request_timeout_secs,
            logo_path,
            logging,
        })
    }

    /// Settings for the licensing API transport
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            token_env: self.token_env.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Whether the token variable is currently set (never reads it out)
    pub fn token_present(&self) -> bool {
        std::env::var_os(&self.token_env).is_some_and(|v| !v.is_empty())
    }
}
