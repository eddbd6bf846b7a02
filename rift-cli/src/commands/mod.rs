//! Command handlers -- one module per subcommand
//!
//! Both handlers follow the same order: validate flags, build the formatter
//! (pattern compile + schema load), resolve the remote source, then drive the
//! entry stream to stdout until it closes.

pub mod log_tail;
pub mod queue_tail;

use std::io;

use tokio_util::sync::CancellationToken;
use tracing::info;

use rift_core::types::SourceConfig;
use rift_tail::config::SchemaRef;
use rift_tail::{FormatterConfig, OutputMode, StreamSource, TailPipeline, TailStats};

use crate::cli::OutputArgs;
use crate::error::CliError;

/// Build the immutable formatter configuration from output flags.
pub(crate) fn formatter_config(output: &OutputArgs) -> FormatterConfig {
    let mode = if output.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };
    let schema = output
        .schema_file
        .as_ref()
        .map(|path| SchemaRef::new(path).with_message_type(output.message_type.clone()));

    FormatterConfig::new(mode)
        .with_pattern(output.grep_pattern.clone())
        .with_only_matching(output.only_matching)
        .with_schema(schema)
}

/// Validate required source fields before any remote call is made.
pub(crate) fn validate_source(config: &SourceConfig) -> Result<(), CliError> {
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Start the source and render its entries to stdout until the stream closes.
pub(crate) async fn drive<S: StreamSource>(
    mut source: S,
    mut pipeline: TailPipeline,
    cancel: CancellationToken,
) -> Result<TailStats, CliError> {
    let stream = source.start(cancel);
    let mut stdout = io::stdout();
    let stats = pipeline.run(stream, &mut stdout).await?;

    info!(
        source = %source.kind(),
        identifier = source.identifier(),
        rendered = stats.rendered,
        "tail finished"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn output_args() -> OutputArgs {
        OutputArgs {
            json: false,
            live: false,
            grep_pattern: None,
            only_matching: false,
            schema_file: None,
            message_type: "LogEvent".to_owned(),
        }
    }

    #[test]
    fn test_formatter_config_defaults_to_text() {
        let config = formatter_config(&output_args());
        assert_eq!(config.mode, OutputMode::Text);
        assert!(config.pattern.is_none());
        assert!(config.schema.is_none());
    }

    #[test]
    fn test_formatter_config_carries_schema_and_pattern() {
        let args = OutputArgs {
            json: true,
            grep_pattern: Some("ERROR".to_owned()),
            schema_file: Some(PathBuf::from("/tmp/log.proto")),
            message_type: "acme.Audit".to_owned(),
            ..output_args()
        };
        let config = formatter_config(&args);
        assert_eq!(config.mode, OutputMode::Json);
        assert_eq!(config.pattern.as_deref(), Some("ERROR"));
        let schema = config.schema.expect("schema set");
        assert_eq!(schema.path, PathBuf::from("/tmp/log.proto"));
        assert_eq!(schema.message_type, "acme.Audit");
    }

    #[test]
    fn test_validate_source_names_empty_field() {
        let config = SourceConfig::queue("us-east-1", " ", "jobs");
        let err = validate_source(&config).expect_err("blank profile");
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("profile"));
    }
}
