//! rift -- tail CloudWatch log streams and SQS queues to the terminal.

mod cli;
mod commands;
mod error;
mod logging;
mod metrics_server;

use std::process::ExitCode;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use rift_core::config::RiftConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "rift failed");
            eprintln!("rift: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = RiftConfig::load_or_default(&cli.config).await?;
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
        config.validate()?;
    }

    let debug_mode = logging::debug_requested(cli.debug);
    logging::init_tracing(&config.general, debug_mode)
        .map_err(|e| CliError::Config(e.to_string()))?;
    info!(config = %cli.config.display(), debug_mode, "rift starting");

    if config.metrics.enabled {
        metrics_server::install_metrics_recorder(&config.metrics)
            .map_err(|e| CliError::Init(e.to_string()))?;
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    match cli.command {
        Commands::LogTail(args) => commands::log_tail::execute(args, &config, cancel).await,
        Commands::QueueTail(args) => commands::queue_tail::execute(args, &config, cancel).await,
    }
}

/// Cancel the shared token on Ctrl-C so the poller stops and the stream drains.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, stopping");
                cancel.cancel();
            }
            Err(e) => warn!(error = %e, "failed to listen for interrupt signal"),
        }
    });
}
