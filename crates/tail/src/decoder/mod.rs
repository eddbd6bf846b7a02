//! 페이로드 디코더 -- 원시 페이로드를 순서가 보존된 필드 맵으로 변환합니다.
//!
//! # 디코더 종류
//! - [`BuiltinDecoder`]: 고정 필드 세트(time, request_id, environment, level, msg)를
//!   JSON 객체에서 읽습니다. 스키마 파일이 없을 때 사용됩니다.
//! - [`SchemaDecoder`]: `.proto` 파일에서 메시지 타입을 한 번 로드하고,
//!   JSON 페이로드를 해당 타입의 모든 필드로 디코딩합니다.
//!
//! 두 디코더 모두 [`EventDecoder`] trait을 구현하며, 출력 값에는 색상 태그가
//! 포함되지 않습니다.

pub mod builtin;
pub mod schema;

pub use builtin::BuiltinDecoder;
pub use schema::SchemaDecoder;

use serde_json::Value;

use rift_core::pipeline::EventDecoder;

use crate::config::SchemaRef;
use crate::error::TailError;

/// 설정에 맞는 디코더를 생성합니다.
///
/// 스키마가 지정되면 파일을 로드하며, 로드 실패는 그대로 반환됩니다.
pub fn build_decoder(schema: Option<&SchemaRef>) -> Result<Box<dyn EventDecoder>, TailError> {
    match schema {
        Some(schema) => Ok(Box::new(SchemaDecoder::load(schema)?)),
        None => Ok(Box::new(BuiltinDecoder::new())),
    }
}

/// JSON 값을 필드 문자열로 변환합니다.
///
/// 문자열은 따옴표 없이, null은 빈 문자열로, 나머지는 JSON 텍스트로 표현합니다.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
