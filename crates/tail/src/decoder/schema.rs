//! `.proto` 스키마 기반 디코더
//!
//! 스키마 파일은 실행마다 한 번 컴파일되며, 이후 모든 디코딩이 같은 메시지
//! 디스크립터를 읽기 전용으로 공유합니다. 페이로드는 protobuf JSON 매핑으로
//! 해석되고, 메시지 타입의 모든 필드가 선언 순서대로 문자열로 변환됩니다.
//! 값이 없는 필드는 기본값으로 채워집니다.

use std::path::Path;

use prost_reflect::{DescriptorPool, DynamicMessage, MessageDescriptor, SerializeOptions};
use serde_json::Value;
use tracing::{debug, info};

use rift_core::error::{DecodeError, RiftError};
use rift_core::pipeline::EventDecoder;
use rift_core::types::DecodedEvent;

use super::value_to_string;
use crate::config::SchemaRef;
use crate::error::TailError;

const FORMAT_NAME: &str = "schema";

/// 동적 스키마 디코더
#[derive(Debug, Clone)]
pub struct SchemaDecoder {
    descriptor: MessageDescriptor,
    options: SerializeOptions,
}

impl SchemaDecoder {
    /// 스키마 파일을 컴파일하고 메시지 타입을 찾습니다.
    ///
    /// 메시지 타입은 정규화된 이름(`acme.v1.LogEvent`)이나 단순 이름(`LogEvent`)으로
    /// 지정할 수 있습니다.
    pub fn load(schema: &SchemaRef) -> Result<Self, TailError> {
        let pool = compile(&schema.path)?;
        let descriptor = find_message(&pool, &schema.message_type).ok_or_else(|| {
            schema_error(
                &schema.path,
                format!("message type '{}' not found", schema.message_type),
            )
        })?;

        info!(
            path = %schema.path.display(),
            message = descriptor.full_name(),
            fields = descriptor.fields().len(),
            "schema loaded"
        );
        Ok(Self::from_descriptor(descriptor))
    }

    /// 이미 확보한 메시지 디스크립터로 디코더를 생성합니다.
    pub fn from_descriptor(descriptor: MessageDescriptor) -> Self {
        Self {
            descriptor,
            options: SerializeOptions::new()
                .use_proto_field_name(true)
                .skip_default_fields(false),
        }
    }

    /// 디코딩 대상 메시지 타입의 정규화된 이름
    pub fn message_name(&self) -> &str {
        self.descriptor.full_name()
    }
}

impl EventDecoder for SchemaDecoder {
    fn format_name(&self) -> &str {
        FORMAT_NAME
    }

    fn decode(&self, raw: &[u8]) -> Result<DecodedEvent, RiftError> {
        let mut deserializer = serde_json::Deserializer::from_slice(raw);
        let message = DynamicMessage::deserialize(self.descriptor.clone(), &mut deserializer)
            .map_err(|e| malformed(e.to_string()))?;
        deserializer.end().map_err(|e| malformed(e.to_string()))?;

        let value = message
            .serialize_with_options(serde_json::value::Serializer, &self.options)
            .map_err(|e| malformed(e.to_string()))?;
        let Value::Object(object) = value else {
            return Err(malformed("message did not serialize to an object"));
        };

        let event = self
            .descriptor
            .fields()
            .map(|field| {
                let value = object
                    .get(field.name())
                    .map(value_to_string)
                    .unwrap_or_default();
                (field.name().to_owned(), value)
            })
            .collect();
        Ok(event)
    }
}

fn compile(path: &Path) -> Result<DescriptorPool, TailError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| schema_error(path, "path has no file name"))?;
    let include = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    debug!(include = %include.display(), "compiling schema file");

    let mut compiler =
        protox::Compiler::new([include]).map_err(|e| schema_error(path, e.to_string()))?;
    compiler
        .open_file(file_name)
        .map_err(|e| schema_error(path, e.to_string()))?;
    Ok(compiler.descriptor_pool())
}

fn find_message(pool: &DescriptorPool, name: &str) -> Option<MessageDescriptor> {
    pool.get_message_by_name(name)
        .or_else(|| pool.all_messages().find(|message| message.name() == name))
}

fn schema_error(path: &Path, reason: impl Into<String>) -> TailError {
    TailError::SchemaLoad {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn malformed(reason: impl Into<String>) -> RiftError {
    DecodeError::Malformed {
        format: FORMAT_NAME.to_owned(),
        reason: reason.into(),
    }
    .into()
}
