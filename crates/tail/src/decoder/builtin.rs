//! 내장 필드 세트 디코더
//!
//! 페이로드를 JSON 객체로 파싱하고 [`BUILTIN_FIELDS`] 순서대로 값을 꺼냅니다.
//! 누락된 필드는 빈 문자열이 됩니다. 필드 이름은 snake_case와 camelCase
//! (`requestId`) 표기를 모두 받습니다.

use serde_json::{Map, Value};

use rift_core::error::{DecodeError, RiftError};
use rift_core::pipeline::EventDecoder;
use rift_core::types::{BUILTIN_FIELDS, DecodedEvent, FIELD_REQUEST_ID};

use super::value_to_string;

const FORMAT_NAME: &str = "builtin";

/// 내장 필드 세트 디코더
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinDecoder;

impl BuiltinDecoder {
    /// 새 디코더를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl EventDecoder for BuiltinDecoder {
    fn format_name(&self) -> &str {
        FORMAT_NAME
    }

    fn decode(&self, raw: &[u8]) -> Result<DecodedEvent, RiftError> {
        let value: Value = serde_json::from_slice(raw).map_err(|e| malformed(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(malformed("payload is not a JSON object"));
        };

        let mut event = DecodedEvent::new();
        for field in BUILTIN_FIELDS {
            let value = lookup(&object, field).map(value_to_string).unwrap_or_default();
            event.insert(field, value);
        }
        Ok(event)
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).or_else(|| {
        if field == FIELD_REQUEST_ID {
            object.get("requestId")
        } else {
            None
        }
    })
}

fn malformed(reason: impl Into<String>) -> RiftError {
    DecodeError::Malformed {
        format: FORMAT_NAME.to_owned(),
        reason: reason.into(),
    }
    .into()
}
