//! `rift queue-tail` command handler

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use rift_core::config::RiftConfig;
use rift_core::types::{SourceConfig, SourceKind};
use rift_tail::{QueueSettings, QueueSource, SqsQueueClient, TailPipeline};

use super::{drive, formatter_config, validate_source};
use crate::cli::QueueTailArgs;
use crate::error::CliError;

/// Execute the `queue-tail` command.
///
/// Messages are read with a zero visibility timeout and never deleted.
pub async fn execute(
    args: QueueTailArgs,
    config: &RiftConfig,
    cancel: CancellationToken,
) -> Result<(), CliError> {
    let source_config = SourceConfig::queue(
        args.remote.region.as_str(),
        args.remote.profile.as_str(),
        args.queue_name.as_str(),
    )
    .with_forever(args.output.live);
    validate_source(&source_config)?;

    let settings = QueueSettings::from_core(&config.queue);
    let formatter = formatter_config(&args.output);
    let pipeline =
        TailPipeline::from_config(&formatter, SourceKind::Queue, args.queue_name.as_str())?;

    info!(queue = %args.queue_name, live = args.output.live, "resolving queue");
    let client =
        Arc::new(SqsQueueClient::connect(&args.remote.region, &args.remote.profile).await);

    let source = tokio::select! {
        result = QueueSource::connect(client, &source_config, settings) => result?,
        _ = cancel.cancelled() => {
            info!("interrupted before the queue was resolved");
            return Ok(());
        }
    };
    info!(url = source.queue_url(), "tailing queue");

    drive(source, pipeline, cancel).await?;
    Ok(())
}
