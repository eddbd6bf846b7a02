//! 에러 타입 -- 도메인별 에러 정의

/// Rift 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum RiftError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 원격 소스 에러 (초기화, 폴링, 채널)
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// 페이로드 디코딩 에러
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 원격 소스 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 소스 초기화 실패 (스트림 미발견, 큐 주소 해석 실패 등)
    #[error("source init failed: {0}")]
    InitFailed(String),

    /// 원격 API 호출 실패
    #[error("remote call {operation} failed: {reason}")]
    Remote { operation: String, reason: String },
}

/// 디코딩 에러
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// 페이로드가 형식에 맞지 않음
    #[error("malformed {format} payload: {reason}")]
    Malformed { format: String, reason: String },

    /// 스키마를 사용할 수 없음
    #[error("schema unavailable: {0}")]
    SchemaUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_names_field() {
        let err: RiftError = ConfigError::InvalidValue {
            field: "queue.batch_size".to_owned(),
            reason: "must be between 1 and 10".to_owned(),
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("queue.batch_size"));
        assert!(msg.starts_with("config error"));
    }

    #[test]
    fn remote_error_display() {
        let err = SourceError::Remote {
            operation: "GetLogEvents".to_owned(),
            reason: "throttled".to_owned(),
        };
        assert_eq!(err.to_string(), "remote call GetLogEvents failed: throttled");
    }

    #[test]
    fn decode_error_converts() {
        let err: RiftError = DecodeError::Malformed {
            format: "json".to_owned(),
            reason: "expected value".to_owned(),
        }
        .into();
        assert!(matches!(err, RiftError::Decode(_)));
    }
}
