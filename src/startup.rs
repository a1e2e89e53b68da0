// Startup module - displays banner and configuration status
//
// Printed before the server starts:
// - Version info and branding
// - Configuration source
// - Upstream endpoint and token status
// - Listening address

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// One line of the status list
struct StatusLine {
    name: &'static str,
    ok: bool,
    detail: String,
}

fn status_lines(config: &Config) -> Vec<StatusLine> {
    let token_present = config.token_present();
    vec![
        StatusLine {
            name: "upstream",
            ok: true,
            detail: config.api_url.clone(),
        },
        StatusLine {
            name: "token",
            ok: token_present,
            detail: if token_present {
                format!("${} set", config.token_env)
            } else {
                format!("${} not set (lookups will return no licenses)", config.token_env)
            },
        },
        StatusLine {
            name: "logo",
            ok: config.logo_path.exists(),
            detail: config.logo_path.display().to_string(),
        },
        StatusLine {
            name: "file log",
            ok: config.logging.file_enabled,
            detail: if config.logging.file_enabled {
                config.logging.file_dir.display().to_string()
            } else {
                "disabled".to_string()
            },
        },
    ]
}

/// Print the startup banner and status
pub fn print_startup(config: &Config) {
    use colors::*;

    // Banner
    println!();
    println!("  {BOLD}{CYAN}Consulta llicencia FCOC{RESET} {DIM}v{VERSION}{RESET}");
    println!();

    // Config file status
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    for line in status_lines(config) {
        let mark = if line.ok {
            format!("{GREEN}✓{RESET}")
        } else {
            format!("{YELLOW}○{RESET}")
        };
        println!("    {} {:<10} {DIM}{}{RESET}", mark, line.name, line.detail);
    }
    println!();

    println!(
        "  {MAGENTA}▸{RESET} Web form on {BOLD}http://{}{RESET}",
        config.bind_addr
    );
    println!();
}

/// Log the same status through tracing (ends up in the file log too)
pub fn log_startup(config: &Config) {
    for line in status_lines(config) {
        if line.ok {
            tracing::info!("{}: {}", line.name, line.detail);
        } else {
            tracing::warn!("{}: {}", line.name, line.detail);
        }
    }
}
