//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the configuration as a commented TOML file
    pub fn to_toml(&self) -> String {
        let timeout = match self.request_timeout_secs {
            Some(secs) => format!("request_timeout_secs = {}", secs),
            None => "# request_timeout_secs = 30".to_string(),
        };

        format!(
            r#"# fcoc-llicencies configuration

# Web form bind address (env: FCOC_BIND)
bind_addr = {bind:?}

# Licensing API endpoint (env: FCOC_API_URL)
api_url = {api_url:?}

# Environment variable holding the API bearer token.
# The token itself is never stored in this file.
token_env = {token_env:?}

# Upstream request timeout in seconds (unset: HTTP client default)
{timeout}

# Logo image served at /logo.png (env: FCOC_LOGO)
logo_path = {logo:?}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level:?}
console = "{log_console}"  # stdout, stderr (lookup always uses stderr)
color = {log_color}
# JSON file logging (in addition to stdout)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir:?}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix:?}
"#,
            bind = self.bind_addr.to_string(),
            api_url = self.api_url,
            token_env = self.token_env,
            timeout = timeout,
            logo = self.logo_path.display().to_string(),
            log_level = self.logging.level,
            log_console = self.logging.console.as_str(),
            log_color = self.logging.color,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string(),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
