//! 설정 관리 -- rift.toml 파싱 및 런타임 설정
//!
//! [`RiftConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`RIFT_QUEUE_BATCH_SIZE=5` 형식)
//! 3. 설정 파일 (`rift.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), rift_core::error::RiftError> {
//! use rift_core::config::RiftConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = RiftConfig::load("rift.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = RiftConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, RiftError};

/// 큐 API가 한 번에 반환할 수 있는 최대 메시지 수
pub const MAX_QUEUE_BATCH_SIZE: i32 = 10;

/// Rift 통합 설정
///
/// `rift.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiftConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 스트림 소스 설정
    #[serde(default)]
    pub log_stream: LogStreamConfig,
    /// 큐 소스 설정
    #[serde(default)]
    pub queue: QueueConfig,
    /// 메트릭 엔드포인트 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl RiftConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RiftError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 파일이 있으면 [`load`](Self::load)와 같고, 없으면 기본값에 환경변수만 적용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, RiftError> {
        match Self::load(path.as_ref()).await {
            Err(RiftError::Config(ConfigError::FileNotFound { .. })) => {
                let mut config = Self::default();
                config.apply_env_overrides()?;
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RiftError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RiftError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                RiftError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, RiftError> {
        toml::from_str(toml_str).map_err(|e| {
            RiftError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `RIFT_{SECTION}_{FIELD}`
    /// 예: `RIFT_LOG_STREAM_LOOKBACK_SECS=60`
    ///
    /// 값을 해석할 수 없으면 해당 환경변수 이름을 담은 에러를 반환합니다.
    /// 이 단계는 로깅 초기화 전에 실행되므로 경고 대신 에러로 알립니다.
    pub fn apply_env_overrides(&mut self) -> Result<(), RiftError> {
        // General
        override_string(&mut self.general.log_level, "RIFT_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "RIFT_GENERAL_LOG_FORMAT");

        // Log stream
        override_parsed(
            &mut self.log_stream.lookback_secs,
            "RIFT_LOG_STREAM_LOOKBACK_SECS",
        )?;
        override_parsed(
            &mut self.log_stream.poll_interval_secs,
            "RIFT_LOG_STREAM_POLL_INTERVAL_SECS",
        )?;
        override_parsed(
            &mut self.log_stream.channel_capacity,
            "RIFT_LOG_STREAM_CHANNEL_CAPACITY",
        )?;

        // Queue
        override_parsed(&mut self.queue.batch_size, "RIFT_QUEUE_BATCH_SIZE")?;
        override_parsed(
            &mut self.queue.poll_interval_secs,
            "RIFT_QUEUE_POLL_INTERVAL_SECS",
        )?;
        override_parsed(
            &mut self.queue.channel_capacity,
            "RIFT_QUEUE_CHANNEL_CAPACITY",
        )?;
        override_parsed(
            &mut self.queue.resolve_attempts,
            "RIFT_QUEUE_RESOLVE_ATTEMPTS",
        )?;
        override_parsed(
            &mut self.queue.retry_backoff_ms,
            "RIFT_QUEUE_RETRY_BACKOFF_MS",
        )?;

        // Metrics
        override_parsed(&mut self.metrics.enabled, "RIFT_METRICS_ENABLED")?;
        override_string(&mut self.metrics.listen_addr, "RIFT_METRICS_LISTEN_ADDR");
        override_parsed(&mut self.metrics.port, "RIFT_METRICS_PORT")?;

        Ok(())
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), RiftError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        if self.log_stream.lookback_secs == 0 {
            return Err(invalid("log_stream.lookback_secs", "must be greater than 0"));
        }
        if self.log_stream.poll_interval_secs == 0 {
            return Err(invalid(
                "log_stream.poll_interval_secs",
                "must be greater than 0",
            ));
        }
        if self.log_stream.channel_capacity == 0 {
            return Err(invalid(
                "log_stream.channel_capacity",
                "must be greater than 0",
            ));
        }

        if !(1..=MAX_QUEUE_BATCH_SIZE).contains(&self.queue.batch_size) {
            return Err(invalid(
                "queue.batch_size",
                format!("must be between 1 and {MAX_QUEUE_BATCH_SIZE}"),
            ));
        }
        if self.queue.poll_interval_secs == 0 {
            return Err(invalid("queue.poll_interval_secs", "must be greater than 0"));
        }
        if self.queue.channel_capacity == 0 {
            return Err(invalid("queue.channel_capacity", "must be greater than 0"));
        }
        if self.queue.resolve_attempts == 0 {
            return Err(invalid("queue.resolve_attempts", "must be greater than 0"));
        }

        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(invalid("metrics.port", "must be greater than 0"));
            }
            if self.metrics.endpoint != "/metrics" {
                return Err(invalid("metrics.endpoint", "only '/metrics' is supported"));
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> RiftError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (text, json)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "text".to_owned(),
        }
    }
}

/// 로그 스트림 소스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogStreamConfig {
    /// 조회 구간: "지금"으로부터 거슬러 올라가는 시간 (초)
    pub lookback_secs: u64,
    /// 라이브 모드 폴링 간격 (초)
    pub poll_interval_secs: u64,
    /// 엔트리 채널 용량
    pub channel_capacity: usize,
}

impl Default for LogStreamConfig {
    fn default() -> Self {
        Self {
            lookback_secs: 20,
            poll_interval_secs: 2,
            channel_capacity: 100,
        }
    }
}

/// 큐 소스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// 한 번에 요청할 최대 메시지 수 (1-10)
    pub batch_size: i32,
    /// 폴링 간격 (초)
    pub poll_interval_secs: u64,
    /// 엔트리 채널 용량
    pub channel_capacity: usize,
    /// 큐 주소 해석 최대 시도 횟수
    pub resolve_attempts: u32,
    /// 재시도 백오프 기본 간격 (밀리초, 시도 횟수에 비례해 증가)
    pub retry_backoff_ms: u64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_QUEUE_BATCH_SIZE,
            poll_interval_secs: 10,
            channel_capacity: 10,
            resolve_attempts: 10,
            retry_backoff_ms: 500,
        }
    }
}

/// 메트릭 설정
///
/// 활성화하면 CLI가 Prometheus 레코더를 설치하고 `listen_addr:port`에서
/// 스크레이프 엔드포인트를 제공합니다. 비활성 상태에서는 모든 카운터가 무시됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 엔드포인트 활성화 여부
    pub enabled: bool,
    /// 바인딩 주소
    pub listen_addr: String,
    /// 포트
    pub port: u16,
    /// 스크레이프 경로
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
            endpoint: "/metrics".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_parsed<T>(target: &mut T, env_key: &str) -> Result<(), RiftError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(val) = std::env::var(env_key) {
        *target = val.parse::<T>().map_err(|e| {
            invalid(
                env_key,
                format!("cannot parse '{val}' as {}: {e}", std::any::type_name::<T>()),
            )
        })?;
    }
    Ok(())
}
