//! rift.toml 통합 설정 테스트
//!
//! - rift.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use rift_core::config::RiftConfig;
use rift_core::error::{ConfigError, RiftError};

// =============================================================================
// rift.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../rift.toml.example");
    let config = RiftConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "text");
    assert_eq!(config.log_stream.lookback_secs, 20);
    assert_eq!(config.log_stream.poll_interval_secs, 2);
    assert_eq!(config.queue.batch_size, 10);
    assert_eq!(config.queue.poll_interval_secs, 10);
    assert_eq!(config.queue.resolve_attempts, 10);
    assert!(!config.metrics.enabled);
    assert_eq!(config.metrics.port, 9100);
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../rift.toml.example");
    let config = RiftConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

// =============================================================================
// 파일 로딩
// =============================================================================

#[tokio::test]
#[serial]
async fn load_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("rift.toml");
    fs::write(&path, "[queue]\npoll_interval_secs = 3\n").expect("should write config");

    let config = RiftConfig::load(&path).await.expect("should load");
    assert_eq!(config.queue.poll_interval_secs, 3);
    assert_eq!(config.queue.batch_size, 10);
    assert_eq!(config.log_stream.lookback_secs, 20);
}

#[tokio::test]
#[serial]
async fn env_overrides_take_priority_over_file() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("rift.toml");
    fs::write(&path, "[log_stream]\nlookback_secs = 30\n").expect("should write config");

    // SAFETY: serial 테스트로 실행되어 환경변수 조작이 다른 테스트와 겹치지 않습니다.
    unsafe { std::env::set_var("RIFT_LOG_STREAM_LOOKBACK_SECS", "45") };
    let result = RiftConfig::load(&path).await;
    unsafe { std::env::remove_var("RIFT_LOG_STREAM_LOOKBACK_SECS") };

    let config = result.expect("should load");
    assert_eq!(config.log_stream.lookback_secs, 45);
}

#[tokio::test]
#[serial]
async fn invalid_value_in_file_is_rejected() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("rift.toml");
    fs::write(&path, "[queue]\nbatch_size = 50\n").expect("should write config");

    let err = RiftConfig::load(&path).await.expect_err("should fail");
    match err {
        RiftError::Config(ConfigError::InvalidValue { field, .. }) => {
            assert_eq!(field, "queue.batch_size");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn malformed_file_fails_to_parse() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[general\nlog_level = \"info\"\n").expect("should write config");

    let err = RiftConfig::load(&path).await.expect_err("should fail");
    assert!(matches!(
        err,
        RiftError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[tokio::test]
#[serial]
async fn empty_file_uses_defaults() {
    let dir = TempDir::new().expect("should create temp dir");
    let path = dir.path().join("empty.toml");
    fs::write(&path, "").expect("should write config");

    let config = RiftConfig::load(&path).await.expect("should load");
    assert_eq!(config.general.log_level, "info");
}
