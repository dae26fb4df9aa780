//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::ServeCommand;
use std::ffi::OsString;

/// HTTP server that resets the demo agents
#[derive(Debug, Parser, Clone)]
#[command(name = "demo-reset")]
#[command(version)]
#[command(about = "An HTTP server that resets the demo agents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Start the reset server
    Serve(ServeCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["demo-reset", "serve"]).unwrap();
        let Command::Serve(cmd) = cli.command;
        assert_eq!(cmd.port, 9999);
        assert!(cmd.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_serve_short_port_flag() {
        let cli = Cli::try_parse_from(["demo-reset", "-v", "serve", "-p", "8080"]).unwrap();
        let Command::Serve(cmd) = cli.command;
        assert_eq!(cmd.port, 8080);
        assert!(cli.verbose);
    }

    #[test]
    fn test_serve_config_flag() {
        let cli = Cli::try_parse_from(["demo-reset", "serve", "--port", "1234", "--config", "reset.yaml"])
            .unwrap();
        let Command::Serve(cmd) = cli.command;
        assert_eq!(cmd.port, 1234);
        assert_eq!(cmd.config.as_deref(), Some("reset.yaml"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(Cli::try_parse_from(["demo-reset", "serve", "-p", "not-a-port"]).is_err());
        assert!(Cli::try_parse_from(["demo-reset", "serve", "-p", "70000"]).is_err());
    }
}
