//! tail 파이프라인 설정
//!
//! 소스별 폴링 설정([`LogStreamSettings`], [`QueueSettings`])은 core의
//! [`RiftConfig`](rift_core::config::RiftConfig) 섹션에서 파생되고,
//! [`FormatterConfig`]는 실행마다 CLI 인자로 한 번 구성됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use rift_core::config::RiftConfig;
//! use rift_tail::config::LogStreamSettings;
//!
//! let core_config = RiftConfig::default();
//! let settings = LogStreamSettings::from_core(&core_config.log_stream);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rift_core::config::{LogStreamConfig, MAX_QUEUE_BATCH_SIZE, QueueConfig};

use crate::error::TailError;

/// 스키마 파일에서 기본으로 찾는 메시지 타입 이름
pub const DEFAULT_MESSAGE_TYPE: &str = "LogEvent";

/// 로그 스트림 소스 폴링 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStreamSettings {
    /// 매 조회의 시작 시점: "지금 - lookback"
    pub lookback: Duration,
    /// 라이브 모드 폴링 간격
    pub poll_interval: Duration,
    /// 엔트리 채널 용량
    pub channel_capacity: usize,
}

impl Default for LogStreamSettings {
    fn default() -> Self {
        Self::from_core(&LogStreamConfig::default())
    }
}

impl LogStreamSettings {
    /// core의 `LogStreamConfig`에서 설정을 생성합니다.
    pub fn from_core(core: &LogStreamConfig) -> Self {
        Self {
            lookback: Duration::from_secs(core.lookback_secs),
            poll_interval: Duration::from_secs(core.poll_interval_secs),
            channel_capacity: core.channel_capacity,
        }
    }

    /// 설정 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TailError> {
        if self.lookback.is_zero() {
            return Err(config_error("lookback", "must be greater than 0"));
        }
        if self.channel_capacity == 0 {
            return Err(config_error("channel_capacity", "must be greater than 0"));
        }
        Ok(())
    }
}

/// 큐 소스 폴링 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueSettings {
    /// 한 번에 요청할 최대 메시지 수
    pub batch_size: i32,
    /// 폴링 간격
    pub poll_interval: Duration,
    /// 엔트리 채널 용량
    pub channel_capacity: usize,
    /// 큐 주소 해석 최대 시도 횟수
    pub resolve_attempts: u32,
    /// 재시도 백오프 기본 간격 (n번째 재시도는 `retry_backoff * n` 대기)
    pub retry_backoff: Duration,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self::from_core(&QueueConfig::default())
    }
}

impl QueueSettings {
    /// core의 `QueueConfig`에서 설정을 생성합니다.
    pub fn from_core(core: &QueueConfig) -> Self {
        Self {
            batch_size: core.batch_size,
            poll_interval: Duration::from_secs(core.poll_interval_secs),
            channel_capacity: core.channel_capacity,
            resolve_attempts: core.resolve_attempts,
            retry_backoff: Duration::from_millis(core.retry_backoff_ms),
        }
    }

    /// 설정 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TailError> {
        if !(1..=MAX_QUEUE_BATCH_SIZE).contains(&self.batch_size) {
            return Err(config_error(
                "batch_size",
                format!("must be between 1 and {MAX_QUEUE_BATCH_SIZE}"),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(config_error("channel_capacity", "must be greater than 0"));
        }
        if self.resolve_attempts == 0 {
            return Err(config_error("resolve_attempts", "must be greater than 0"));
        }
        Ok(())
    }
}

/// 출력 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// 색상 태그가 붙은 사람용 한 줄
    #[default]
    Text,
    /// 한 줄에 JSON 객체 하나
    Json,
}

/// 스키마 파일 참조
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRef {
    /// `.proto` 파일 경로
    pub path: PathBuf,
    /// 디코딩할 메시지 타입 이름 (정규화된 이름 또는 단순 이름)
    pub message_type: String,
}

impl SchemaRef {
    /// 기본 메시지 타입(`LogEvent`)으로 스키마 참조를 생성합니다.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            message_type: DEFAULT_MESSAGE_TYPE.to_owned(),
        }
    }

    /// 메시지 타입 이름을 지정합니다.
    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = message_type.into();
        self
    }
}

/// 렌더러 설정
///
/// 실행마다 한 번 구성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterConfig {
    /// 출력 모드
    pub mode: OutputMode,
    /// grep 패턴 (정규식). None이면 필터링하지 않음
    pub pattern: Option<String>,
    /// 텍스트 모드에서 매칭된 부분만 출력
    pub only_matching: bool,
    /// 스키마 파일. None이면 내장 필드 세트 사용
    pub schema: Option<SchemaRef>,
}

impl FormatterConfig {
    /// 출력 모드를 지정하여 설정을 생성합니다.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// grep 패턴을 설정합니다. 빈 문자열은 패턴 없음으로 취급합니다.
    pub fn with_pattern(mut self, pattern: Option<String>) -> Self {
        self.pattern = pattern.filter(|p| !p.is_empty());
        self
    }

    /// only-matching 모드를 설정합니다.
    pub fn with_only_matching(mut self, only_matching: bool) -> Self {
        self.only_matching = only_matching;
        self
    }

    /// 스키마 파일을 설정합니다.
    pub fn with_schema(mut self, schema: Option<SchemaRef>) -> Self {
        self.schema = schema;
        self
    }
}

fn config_error(field: &str, reason: impl Into<String>) -> TailError {
    TailError::Config {
        field: field.to_owned(),
        reason: reason.into(),
    }
}
