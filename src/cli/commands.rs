//! CLI command definitions

use clap::Args;

/// Start the reset server
#[derive(Debug, Args, Clone)]
pub struct ServeCommand {
    /// Port to listen for HTTP requests on
    #[arg(short, long, default_value_t = 9999)]
    pub port: u16,

    /// Path to a YAML file describing the reset steps (built-in steps when omitted)
    #[arg(short, long)]
    pub config: Option<String>,
}
