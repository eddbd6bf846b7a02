//! 파이프라인 trait -- 모듈 확장 포인트 정의

use crate::error::RiftError;
use crate::types::DecodedEvent;

/// 페이로드 디코더 trait
///
/// 원시 페이로드를 순서가 보존된 필드 맵으로 변환합니다.
/// 새로운 페이로드 형식을 지원하려면 이 trait을 구현합니다.
///
/// 디코더의 출력에는 색상 등 표현 관련 정보가 포함되지 않아야 합니다.
pub trait EventDecoder: Send + Sync {
    /// 디코더 형식 이름 (builtin, schema 등)
    fn format_name(&self) -> &str;

    /// 원시 바이트를 디코딩된 이벤트로 변환
    fn decode(&self, raw: &[u8]) -> Result<DecodedEvent, RiftError>;
}
