//! `rift log-tail` command handler

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use rift_core::config::RiftConfig;
use rift_core::types::{SourceConfig, SourceKind};
use rift_tail::{CloudWatchLogsClient, LogStreamSettings, LogStreamSource, TailPipeline};

use super::{drive, formatter_config, validate_source};
use crate::cli::LogTailArgs;
use crate::error::CliError;

/// Execute the `log-tail` command.
///
/// # Errors
///
/// Returns `CliError::Config` for blank flags or a bad pattern, `CliError::Init`
/// when no stream matches or the schema cannot be loaded, and `CliError::Runtime`
/// when the initial stream lookup fails remotely.
pub async fn execute(
    args: LogTailArgs,
    config: &RiftConfig,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let source_config = SourceConfig::log_stream(
        args.remote.region.as_str(),
        args.remote.profile.as_str(),
        args.group.as_str(),
        args.stream_prefix.as_str(),
    )
    .with_forever(args.output.live);
    validate_source(&source_config)?;

    let settings = LogStreamSettings::from_core(&config.log_stream);
    let formatter = formatter_config(&args.output);
    let pipeline =
        TailPipeline::from_config(&formatter, SourceKind::LogStream, args.stream_prefix.as_str())?;

    info!(
        group = %args.group,
        prefix = %args.stream_prefix,
        live = args.output.live,
        "resolving log stream"
    );
    let client = Arc::new(
        CloudWatchLogsClient::connect(&args.remote.region, &args.remote.profile).await,
    );

    let source = tokio::select! {
        result = LogStreamSource::connect(client, &source_config, settings) => result?,
        _ = cancel.cancelled() => {
            info!("interrupted before the log stream was resolved");
            return Ok(());
        }
    };
    info!(stream = source.stream_name(), "tailing log stream");

    drive(source, pipeline, cancel).await?;
    Ok(())
}
