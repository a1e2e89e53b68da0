// CLI module - command-line argument parsing and handlers
//
// With no subcommand the web form is served. Subcommands:
// - lookup <TIPUS> <DOCUMENT>: print the report for one document
// - config --show: Display effective configuration
// - config --path: Show config file path

use crate::config::{Config, VERSION};
use crate::licensing::{self, LicenseClient};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

/// FCOC license lookup
#[derive(Parser)]
#[command(name = "fcoc-llicencies")]
#[command(version = VERSION)]
#[command(about = "Consulta de llicències FCOC", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up the licenses of one document and print the report
    Lookup {
        /// Document type: DNI/NIE, PASSAPORT or CATSALUT
        #[arg(value_name = "TIPUS")]
        tipus: String,

        /// Document value
        #[arg(value_name = "DOCUMENT")]
        document: String,
    },

    /// Inspect configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Run a lookup and print the report. A blank document prints nothing.
///
/// Blocks on the network; call from a blocking context.
pub fn run_lookup(config: &Config, tipus: &str, document: &str) -> Result<()> {
    let client = LicenseClient::http(&config.api_config())
        .context("Failed to create licensing API client")?;

    if let Some(report) = licensing::consult_report(&client, tipus, document) {
        print!("{}", report);
    }
    Ok(())
}

/// Handle `config` subcommand flags
pub fn handle_config(show: bool, path: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show()
    } else {
        // No flag provided, show help
        println!("Usage: fcoc-llicencies config [--show|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --path    Show config file path");
        Ok(())
    }
}

fn handle_config_path() -> Result<()> {
    let path = Config::config_path().context("Could not determine config path")?;
    println!("{}", path.display());
    Ok(())
}

fn handle_config_show() -> Result<()> {
    let config = Config::from_env()?;

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
    println!(
        "# Token (${}): {}",
        config.token_env,
        if config.token_present() { "set" } else { "not set" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lookup() {
        let cli = Cli::try_parse_from(["fcoc-llicencies", "lookup", "DNI/NIE", "12345678Z"]).unwrap();
        match cli.command {
            Some(Commands::Lookup { tipus, document }) => {
                assert_eq!(tipus, "DNI/NIE");
                assert_eq!(document, "12345678Z");
            }
            _ => panic!("expected lookup subcommand"),
        }
    }

    #[test]
    fn test_parse_no_subcommand_serves() {
        let cli = Cli::try_parse_from(["fcoc-llicencies"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_config_flags() {
        let cli = Cli::try_parse_from(["fcoc-llicencies", "config", "--show"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                show: true,
                path: false
            })
        ));
    }

    #[test]
    fn test_lookup_requires_document() {
        assert!(Cli::try_parse_from(["fcoc-llicencies", "lookup", "DNI/NIE"]).is_err());
    }
}
