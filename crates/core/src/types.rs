//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 소스 설정, 원격 API에서 수신한 원시 엔트리, 디코딩된 이벤트를 정의합니다.

use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 내장 스키마 필드: 타임스탬프
pub const FIELD_TIME: &str = "time";
/// 내장 스키마 필드: 요청 ID
pub const FIELD_REQUEST_ID: &str = "request_id";
/// 내장 스키마 필드: 실행 환경
pub const FIELD_ENVIRONMENT: &str = "environment";
/// 내장 스키마 필드: 로그 레벨
pub const FIELD_LEVEL: &str = "level";
/// 내장 스키마 필드: 메시지
pub const FIELD_MSG: &str = "msg";

/// 내장 스키마의 필드 목록 (출력 순서)
pub const BUILTIN_FIELDS: [&str; 5] = [
    FIELD_TIME,
    FIELD_REQUEST_ID,
    FIELD_ENVIRONMENT,
    FIELD_LEVEL,
    FIELD_MSG,
];

/// 원격 소스 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// 로그 그룹 내 스트림
    LogStream,
    /// 메시지 큐
    Queue,
}

impl SourceKind {
    /// 구조화 출력에 주입되는 소스 식별자 필드 이름
    pub fn identifier_field(&self) -> &'static str {
        match self {
            Self::LogStream => "stream",
            Self::Queue => "queue",
        }
    }

    /// 메트릭 레이블 등에 쓰는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LogStream => "log_stream",
            Self::Queue => "queue",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 소스가 읽을 대상
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceTarget {
    /// 그룹 내에서 접두어가 일치하는 첫 스트림
    LogStream {
        group: String,
        stream_prefix: String,
    },
    /// 이름으로 주소를 해석할 큐
    Queue { queue_name: String },
}

impl SourceTarget {
    /// 대상의 소스 종류
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::LogStream { .. } => SourceKind::LogStream,
            Self::Queue { .. } => SourceKind::Queue,
        }
    }

    /// 사용자가 지정한 대상 식별자 (스트림 접두어 또는 큐 이름)
    pub fn identifier(&self) -> &str {
        match self {
            Self::LogStream { stream_prefix, .. } => stream_prefix,
            Self::Queue { queue_name } => queue_name,
        }
    }
}

/// 소스 설정
///
/// Stream Source 생성 시 한 번 전달되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 원격 API 리전
    pub region: String,
    /// 자격 증명 프로필 이름
    pub profile: String,
    /// 읽을 대상
    pub target: SourceTarget,
    /// true면 취소될 때까지 계속 폴링, false면 한 번 읽고 종료
    pub forever: bool,
}

impl SourceConfig {
    /// 로그 스트림 소스 설정을 생성합니다.
    pub fn log_stream(
        region: impl Into<String>,
        profile: impl Into<String>,
        group: impl Into<String>,
        stream_prefix: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            profile: profile.into(),
            target: SourceTarget::LogStream {
                group: group.into(),
                stream_prefix: stream_prefix.into(),
            },
            forever: false,
        }
    }

    /// 큐 소스 설정을 생성합니다.
    pub fn queue(
        region: impl Into<String>,
        profile: impl Into<String>,
        queue_name: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            profile: profile.into(),
            target: SourceTarget::Queue {
                queue_name: queue_name.into(),
            },
            forever: false,
        }
    }

    /// 라이브(무한 폴링) 모드를 설정합니다.
    pub fn with_forever(mut self, forever: bool) -> Self {
        self.forever = forever;
        self
    }

    /// 필수 필드가 비어 있지 않은지 검증합니다.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut required: Vec<(&str, &str)> =
            vec![("region", self.region.as_str()), ("profile", self.profile.as_str())];
        match &self.target {
            SourceTarget::LogStream {
                group,
                stream_prefix,
            } => {
                required.push(("group", group.as_str()));
                required.push(("stream-prefix", stream_prefix.as_str()));
            }
            SourceTarget::Queue { queue_name } => {
                required.push(("queue-name", queue_name.as_str()))
            }
        }

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "must not be empty".to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// 원시 엔트리의 소스별 메타데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryMarker {
    /// 로그 스트림 이벤트 (밀리초 단위 epoch)
    Log { timestamp_ms: Option<i64> },
    /// 큐 메시지
    Queue {
        message_id: Option<String>,
        attributes: Vec<(String, String)>,
    },
}

/// 원격 API에서 수신한 원시 엔트리
///
/// 폴링 루프가 생성하여 채널에 넣고, Pipeline Driver가 한 번 소비합니다.
#[derive(Debug, Clone)]
pub struct RawEntry {
    /// 원시 페이로드
    pub payload: Bytes,
    /// 소스가 부여한 메타데이터
    pub marker: EntryMarker,
}

impl RawEntry {
    /// 로그 스트림 이벤트로부터 엔트리를 생성합니다.
    pub fn log(payload: impl Into<Bytes>, timestamp_ms: Option<i64>) -> Self {
        Self {
            payload: payload.into(),
            marker: EntryMarker::Log { timestamp_ms },
        }
    }

    /// 큐 메시지로부터 엔트리를 생성합니다.
    pub fn queue(payload: impl Into<Bytes>, message_id: Option<String>) -> Self {
        Self {
            payload: payload.into(),
            marker: EntryMarker::Queue {
                message_id,
                attributes: Vec::new(),
            },
        }
    }

    /// 메시지 속성을 추가합니다. 로그 이벤트에는 영향이 없습니다.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let EntryMarker::Queue { attributes, .. } = &mut self.marker {
            attributes.push((key.into(), value.into()));
        }
        self
    }

    /// 큐 메시지 ID (로그 이벤트는 `None`)
    pub fn message_id(&self) -> Option<&str> {
        match &self.marker {
            EntryMarker::Queue { message_id, .. } => message_id.as_deref(),
            EntryMarker::Log { .. } => None,
        }
    }

    /// 페이로드를 텍스트로 반환합니다. 잘못된 UTF-8은 대체 문자로 바뀝니다.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// 소스가 부여한 타임스탬프 (로그 이벤트만)
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match &self.marker {
            EntryMarker::Log {
                timestamp_ms: Some(ms),
                ..
            } => DateTime::from_timestamp_millis(*ms),
            _ => None,
        }
    }
}

/// 디코딩된 이벤트 -- 필드 이름 → 문자열 값의 순서 보존 맵
///
/// 값에는 색상 태그가 절대 포함되지 않습니다. 색상은 텍스트 렌더링 시점에만 적용됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedEvent {
    fields: Vec<(String, String)>,
}

impl DecodedEvent {
    /// 빈 이벤트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드를 설정합니다. 같은 이름이 있으면 값을 교체하고 위치는 유지합니다.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 필드 값을 조회하고, 없으면 빈 문자열을 반환합니다.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// 삽입 순서대로 필드를 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 필드 수
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 필드가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for DecodedEvent {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut event = Self::new();
        for (k, v) in iter {
            event.insert(k, v);
        }
        event
    }
}

impl Serialize for DecodedEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_config_validate_names_empty_field() {
        let config = SourceConfig::log_stream("us-west-2", "default", "/svc/app", "");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("stream-prefix"));

        let config = SourceConfig::queue("", "default", "jobs");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("region"));
    }

    #[test]
    fn source_target_identifier() {
        let config = SourceConfig::log_stream("us-west-2", "default", "/svc/app", "web-1");
        assert_eq!(config.target.identifier(), "web-1");
        assert_eq!(config.target.kind(), SourceKind::LogStream);
        assert!(!config.forever);

        let config = SourceConfig::queue("us-west-2", "default", "jobs").with_forever(true);
        assert_eq!(config.target.identifier(), "jobs");
        assert_eq!(config.target.kind().identifier_field(), "queue");
        assert!(config.forever);
    }

    #[test]
    fn raw_entry_text_and_timestamp() {
        let entry = RawEntry::log(Bytes::from_static(b"{\"msg\":\"hi\"}"), Some(1_700_000_000_000));
        assert_eq!(entry.text(), "{\"msg\":\"hi\"}");
        let ts = entry.timestamp().unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_000);
        assert!(entry.message_id().is_none());
    }

    #[test]
    fn queue_entry_has_no_timestamp() {
        let entry = RawEntry::queue("body", Some("m-1".to_owned())).with_attribute("team", "core");
        assert!(entry.timestamp().is_none());
        assert_eq!(entry.message_id(), Some("m-1"));
        match entry.marker {
            EntryMarker::Queue { attributes, .. } => {
                assert_eq!(attributes, vec![("team".to_owned(), "core".to_owned())]);
            }
            _ => panic!("expected queue marker"),
        }
    }

    #[test]
    fn decoded_event_preserves_insertion_order() {
        let mut event = DecodedEvent::new();
        event.insert("level", "info");
        event.insert("msg", "started");
        event.insert("level", "warn");

        let names: Vec<&str> = event.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["level", "msg"]);
        assert_eq!(event.get("level"), Some("warn"));
        assert_eq!(event.get_or_empty("missing"), "");
        assert_eq!(event.len(), 2);
    }

    #[test]
    fn decoded_event_serializes_as_object() {
        let event: DecodedEvent = vec![
            ("time".to_owned(), "t".to_owned()),
            ("msg".to_owned(), "m".to_owned()),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"time":"t","msg":"m"}"#);
    }
}
