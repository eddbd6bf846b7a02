//! Integration tests for how `rift` resolves its configuration.
//!
//! Covers the optional rift.toml file, env overrides and the settings
//! handed to each stream source.

use std::fs;
use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

use rift_core::config::RiftConfig;
use rift_tail::{LogStreamSettings, QueueSettings};

#[tokio::test]
#[serial]
async fn test_missing_config_file_uses_defaults() {
    // Given: A path that does not exist
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rift.toml");

    // When: Loading with fallback
    let config = RiftConfig::load_or_default(&config_path)
        .await
        .expect("absent file should fall back to defaults");

    // Then: Source settings use the built-in intervals
    let log = LogStreamSettings::from_core(&config.log_stream);
    assert_eq!(log.lookback, Duration::from_secs(20));
    assert_eq!(log.poll_interval, Duration::from_secs(2));

    let queue = QueueSettings::from_core(&config.queue);
    assert_eq!(queue.poll_interval, Duration::from_secs(10));
    assert_eq!(queue.resolve_attempts, 10);
}

#[tokio::test]
#[serial]
async fn test_config_file_tunes_queue_source() {
    // Given: A config file with a smaller batch and faster polling
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rift.toml");
    fs::write(
        &config_path,
        r#"
[general]
log_level = "debug"

[queue]
batch_size = 5
poll_interval_secs = 3
"#,
    )
    .expect("should write config");

    // When: Loading the config
    let config = RiftConfig::load_or_default(&config_path)
        .await
        .expect("valid config should load");

    // Then: Queue settings reflect the file, untouched fields keep defaults
    let queue = QueueSettings::from_core(&config.queue);
    assert_eq!(queue.batch_size, 5);
    assert_eq!(queue.poll_interval, Duration::from_secs(3));
    assert_eq!(queue.channel_capacity, 10);
    assert_eq!(config.general.log_level, "debug");
}

#[tokio::test]
#[serial]
async fn test_env_override_wins_over_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rift.toml");
    fs::write(&config_path, "[log_stream]\nlookback_secs = 60\n").expect("should write config");

    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("RIFT_LOG_STREAM_LOOKBACK_SECS", "90") };
    let result = RiftConfig::load_or_default(&config_path).await;
    unsafe { std::env::remove_var("RIFT_LOG_STREAM_LOOKBACK_SECS") };

    let config = result.expect("config should load");
    let log = LogStreamSettings::from_core(&config.log_stream);
    assert_eq!(log.lookback, Duration::from_secs(90));
}

#[tokio::test]
#[serial]
async fn test_out_of_range_batch_size_is_rejected() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rift.toml");
    fs::write(&config_path, "[queue]\nbatch_size = 25\n").expect("should write config");

    let err = RiftConfig::load_or_default(&config_path)
        .await
        .expect_err("batch size above the API limit should fail");
    assert!(err.to_string().contains("batch_size"));
}

#[tokio::test]
#[serial]
async fn test_malformed_config_is_rejected() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write config");

    let result = RiftConfig::load_or_default(&config_path).await;
    assert!(result.is_err(), "malformed TOML should fail to load");
}

#[tokio::test]
#[serial]
async fn test_unparsable_env_override_is_rejected() {
    // Given: No config file and a non-numeric env override
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("rift.toml");

    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("RIFT_QUEUE_POLL_INTERVAL_SECS", "soon") };
    let result = RiftConfig::load_or_default(&config_path).await;
    unsafe { std::env::remove_var("RIFT_QUEUE_POLL_INTERVAL_SECS") };

    // Then: Loading fails and names the offending variable instead of silently keeping defaults
    let err = result.expect_err("non-numeric interval should fail");
    let message = err.to_string();
    assert!(message.contains("RIFT_QUEUE_POLL_INTERVAL_SECS"));
    assert!(message.contains("soon"));
}
