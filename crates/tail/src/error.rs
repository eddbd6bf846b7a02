//! tail 파이프라인 에러 타입
//!
//! [`TailError`]는 소스 초기화, 폴링, 디코딩, 렌더링 중 발생하는 모든 에러를 표현합니다.
//! `From<TailError> for RiftError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use rift_core::error::{ConfigError, DecodeError, RiftError, SourceError};

/// tail 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TailError {
    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// lookback 구간 안에서 접두어가 일치하는 스트림이 없음
    #[error("no log stream in group '{group}' matches prefix '{prefix}'")]
    StreamNotFound {
        /// 로그 그룹
        group: String,
        /// 스트림 이름 접두어
        prefix: String,
    },

    /// 재시도 예산을 모두 소진했지만 큐 주소를 해석하지 못함
    #[error("queue '{queue}' could not be resolved after {attempts} attempts: {reason}")]
    QueueUnresolved {
        /// 큐 이름
        queue: String,
        /// 시도 횟수
        attempts: u32,
        /// 마지막 실패 사유
        reason: String,
    },

    /// 원격 API 호출 실패
    #[error("remote call {operation} failed: {reason}")]
    Remote {
        /// API 오퍼레이션 이름
        operation: String,
        /// 실패 사유
        reason: String,
    },

    /// 스키마 파일 로딩 실패
    #[error("schema load error: {path}: {reason}")]
    SchemaLoad {
        /// 스키마 파일 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 단일 엔트리 디코딩 실패
    #[error("decode error: {format}: {reason}")]
    Decode {
        /// 디코더 형식 (builtin, schema)
        format: String,
        /// 실패 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl TailError {
    /// 소스 초기화 단계의 에러인지 확인합니다.
    pub fn is_init_failure(&self) -> bool {
        matches!(
            self,
            Self::StreamNotFound { .. } | Self::QueueUnresolved { .. } | Self::SchemaLoad { .. }
        )
    }
}

impl From<TailError> for RiftError {
    fn from(err: TailError) -> Self {
        match err {
            TailError::Config { field, reason } => {
                RiftError::Config(ConfigError::InvalidValue { field, reason })
            }
            TailError::Regex(e) => RiftError::Config(ConfigError::InvalidValue {
                field: "grep-pattern".to_owned(),
                reason: e.to_string(),
            }),
            TailError::Remote { operation, reason } => {
                RiftError::Source(SourceError::Remote { operation, reason })
            }
            TailError::Decode { format, reason } => {
                RiftError::Decode(DecodeError::Malformed { format, reason })
            }
            TailError::SchemaLoad { .. } => {
                RiftError::Decode(DecodeError::SchemaUnavailable(err.to_string()))
            }
            TailError::Io(e) => RiftError::Io(e),
            TailError::StreamNotFound { .. } | TailError::QueueUnresolved { .. } => {
                RiftError::Source(SourceError::InitFailed(err.to_string()))
            }
        }
    }
}
