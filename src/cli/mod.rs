//! CLI module for ocr-router
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the orchestrator
//! - `backends` - Inspect configured OCR backends
//! - `health` - Probe every backend once and report
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! ocr-router serve
//!
//! # Probe backends once
//! ocr-router health --json
//!
//! # Generate shell completions
//! ocr-router completions bash > ~/.bash_completion.d/ocr-router
//! ```

pub mod backends;
pub mod completions;
pub mod config;
pub mod health;
pub mod output;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ocr-router - OCR backend orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "ocr-router",
    version,
    about = "Routes OCR uploads to health-checked DeepSeek and Mineru backends"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the orchestrator
    Serve(ServeArgs),
    /// Inspect configured backends
    #[command(subcommand)]
    Backends(BackendsCommands),
    /// Probe all backends once and show their health
    Health(HealthArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "ocr-router.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "OCR_ROUTER_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "OCR_ROUTER_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "OCR_ROUTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable the background health monitor
    #[arg(long)]
    pub no_health_check: bool,
}

#[derive(Subcommand, Debug)]
pub enum BackendsCommands {
    /// List configured backends
    List(BackendsListArgs),
}

#[derive(Args, Debug)]
pub struct BackendsListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Filter by capability (image, pdf)
    #[arg(long)]
    pub capability: Option<String>,

    /// Path to configuration file
    #[arg(short, long, default_value = "ocr-router.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "ocr-router.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "ocr-router.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["ocr-router", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, PathBuf::from("ocr-router.toml"));
                assert!(!args.no_health_check);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["ocr-router", "serve", "-p", "9000"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.port, Some(9000)),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_config() {
        let cli = Cli::try_parse_from(["ocr-router", "serve", "-c", "custom.toml"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.config, PathBuf::from("custom.toml")),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_no_health_check() {
        let cli = Cli::try_parse_from(["ocr-router", "serve", "--no-health-check"]).unwrap();
        match cli.command {
            Commands::Serve(args) => assert!(args.no_health_check),
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_backends_list_json() {
        let cli = Cli::try_parse_from(["ocr-router", "backends", "list", "--json"]).unwrap();
        match cli.command {
            Commands::Backends(BackendsCommands::List(args)) => {
                assert!(args.json);
                assert!(args.capability.is_none());
            }
            _ => panic!("Expected Backends List command"),
        }
    }

    #[test]
    fn test_cli_parse_health() {
        let cli = Cli::try_parse_from(["ocr-router", "health"]).unwrap();
        assert!(matches!(cli.command, Commands::Health(_)));
    }

    #[test]
    fn test_cli_rejects_unknown_shell() {
        assert!(Cli::try_parse_from(["ocr-router", "completions", "cmd"]).is_err());
    }
}
