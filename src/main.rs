use anyhow::{Context, Result};
use demo_reset::cli::commands::ServeCommand;
use demo_reset::cli::output::{style, CHECK, CROSS, INFO, ROCKET, format_steps};
use demo_reset::cli::{Cli, Command};
use demo_reset::{server, ResetConfig, ResetService, SubprocessRunner};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();
    fmt()
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to set logging subscriber")?;

    // Execute command
    let result = match &cli.command {
        Command::Serve(cmd) => serve(cmd).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", CROSS, style(format!("{:#}", e)).red());
        std::process::exit(1);
    }

    Ok(())
}

async fn serve(cmd: &ServeCommand) -> Result<()> {
    let config = match &cmd.config {
        Some(path) => ResetConfig::from_file(path)
            .with_context(|| format!("Failed to load reset config from {}", path))?,
        None => ResetConfig::default(),
    };

    println!("{} Reset steps:", INFO);
    for line in format_steps(&config) {
        println!("{}", line);
    }

    let pipeline = config.to_pipeline(Arc::new(SubprocessRunner::new()));
    let service = ResetService::new(pipeline, config.deadline());

    let listener = TcpListener::bind(("0.0.0.0", cmd.port))
        .await
        .with_context(|| format!("Failed to start the server on port {}", cmd.port))?;

    println!(
        "{} Listening on port {}",
        ROCKET,
        style(cmd.port).cyan()
    );

    server::serve(listener, service, config.shutdown_timeout(), shutdown_signal()).await?;

    println!("{} Server stopped", CHECK);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
