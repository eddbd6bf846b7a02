//! Logging initialization for rift.
//!
//! Diagnostics always go to stderr so that stdout carries rendered entries only.
//! The `[general]` section of `RiftConfig` selects level and format; debug mode
//! (`--debug` or `DEBUG=debug`) switches to verbose file:line output.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rift_core::config::GeneralConfig;

/// Environment variable that enables debug mode when set to `debug`.
const DEBUG_ENV: &str = "DEBUG";

/// Returns true when debug mode was requested by flag or environment.
pub fn debug_requested(flag: bool) -> bool {
    flag || std::env::var(DEBUG_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("debug"))
}

/// Resolve the effective filter directive.
///
/// `RUST_LOG` wins; otherwise debug mode forces `debug`, else the configured level.
fn build_filter(config: &GeneralConfig, debug: bool) -> EnvFilter {
    let level = if debug { "debug" } else { config.log_level.as_str() };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Formats
///
/// * debug mode - targets, file and line numbers
/// * `"json"` - machine-parseable JSON lines
/// * `"text"` - terse compact lines without timestamps
pub fn init_tracing(config: &GeneralConfig, debug: bool) -> Result<()> {
    let env_filter = build_filter(config, debug);

    if debug {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize debug tracing subscriber: {}", e))?;
        return Ok(());
    }

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e)
                })?;
        }
        "text" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .without_time()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    anyhow::anyhow!("failed to initialize text tracing subscriber: {}", e)
                })?;
        }
        _ => {
            return Err(anyhow::anyhow!(
                "unknown log format '{}', expected 'json' or 'text'",
                config.log_format
            ));
        }
    }

    Ok(())
}
