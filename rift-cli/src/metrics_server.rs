//! Prometheus metrics endpoint.
//!
//! When `[metrics] enabled = true`, the poll loop and pipeline counters
//! (`rift_*_total`) are exposed through the HTTP listener built into
//! `metrics-exporter-prometheus`. Without a recorder every `counter!` call is a no-op.

use std::net::SocketAddr;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

use rift_core::config::MetricsConfig;

/// Parse and check the listen address without touching global state.
fn listen_addr(config: &MetricsConfig) -> Result<SocketAddr> {
    if config.endpoint != "/metrics" {
        return Err(anyhow::anyhow!(
            "unsupported metrics endpoint '{}': only '/metrics' is currently supported",
            config.endpoint
        ));
    }

    format!("{}:{}", config.listen_addr, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid metrics listen address: {}", e))
}

/// Install the global metrics recorder and start the HTTP listener.
///
/// Must be called at most once per process.
///
/// # Errors
///
/// - Invalid listen address or endpoint path
/// - Socket binding fails or a recorder is already installed
pub fn install_metrics_recorder(config: &MetricsConfig) -> Result<()> {
    let addr = listen_addr(config)?;

    if addr.ip().is_unspecified() {
        warn!(
            listen_addr = %addr,
            "metrics endpoint is exposed on all interfaces"
        );
    }

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics recorder: {}", e))?;

    rift_core::metrics::describe_all();

    info!(listen_addr = %addr, "metrics endpoint active");
    Ok(())
}
