//! 이벤트 렌더러 -- 디코딩된 이벤트를 터미널 출력 줄로 변환합니다.
//!
//! # 출력 모드
//! - 텍스트: `소스 시각 request_id: .. environment: .. level: .. msg: ..` 한 줄.
//!   소스와 시각은 cyan, request_id는 green, level은 값에 따라
//!   error=red, info=green, warn=yellow, 그 외=white로 표시합니다.
//!   값 안의 개행과 제어 문자는 `\n`, `\r`, `\u{1b}` 형태로 이스케이프되어
//!   한 엔트리가 항상 한 줄을 유지합니다.
//! - JSON: 소스 식별자 필드(`stream` 또는 `queue`)와 디코딩된 모든 필드를 담은
//!   JSON 객체 한 줄. 디코딩된 필드 이름이 소스 식별자와 겹치면 소스 식별자가
//!   우선합니다. 색상 태그는 절대 포함되지 않습니다.
//!
//! 색상은 렌더링 시점에만 적용되며 [`DecodedEvent`]에 저장된 값은 항상 태그가 없습니다.

use std::borrow::Cow;

use chrono::SecondsFormat;
use colored::{ColoredString, Colorize};
use serde_json::{Map, Value};
use tracing::warn;

use rift_core::types::{
    DecodedEvent, FIELD_ENVIRONMENT, FIELD_LEVEL, FIELD_MSG, FIELD_REQUEST_ID, FIELD_TIME,
    RawEntry, SourceKind,
};

use crate::config::{FormatterConfig, OutputMode};
use crate::error::TailError;
use crate::filter::Filter;

/// 이벤트 렌더러
///
/// 실행마다 한 번 생성되며 grep 패턴도 이때 한 번만 컴파일됩니다.
#[derive(Debug, Clone)]
pub struct EventRenderer {
    mode: OutputMode,
    only_matching: bool,
    filter: Filter,
    source_field: &'static str,
}

impl EventRenderer {
    /// 렌더러 설정과 소스 종류로 렌더러를 생성합니다.
    ///
    /// JSON 모드에서 only-matching은 무시됩니다.
    pub fn new(config: &FormatterConfig, kind: SourceKind) -> Result<Self, TailError> {
        let filter = Filter::new(config.pattern.as_deref())?;

        let mut only_matching = config.only_matching;
        if only_matching && config.mode == OutputMode::Json {
            warn!("--only-matching has no effect with --json, ignoring");
            only_matching = false;
        }
        if only_matching && !filter.is_active() {
            warn!("--only-matching requires --grep-pattern, ignoring");
            only_matching = false;
        }

        Ok(Self {
            mode: config.mode,
            only_matching,
            filter,
            source_field: kind.identifier_field(),
        })
    }

    /// 출력 모드
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// 원시 페이로드 텍스트가 grep 필터를 통과하는지 확인합니다.
    pub fn accepts(&self, raw: &str) -> bool {
        self.filter.accepts(raw)
    }

    /// 이벤트를 출력 줄 목록으로 렌더링합니다.
    ///
    /// 보통 한 줄이며, only-matching 텍스트 모드에서는 일치한 부분마다 한 줄입니다.
    pub fn render(
        &self,
        source: &str,
        event: &DecodedEvent,
        entry: &RawEntry,
    ) -> Result<Vec<String>, TailError> {
        match self.mode {
            OutputMode::Json => Ok(vec![self.render_json(source, event, entry)?]),
            OutputMode::Text if self.only_matching => {
                Ok(self.render_matches(source, &entry.text()))
            }
            OutputMode::Text => Ok(vec![render_text(source, event, entry)]),
        }
    }

    fn render_json(
        &self,
        source: &str,
        event: &DecodedEvent,
        entry: &RawEntry,
    ) -> Result<String, TailError> {
        let mut object = Map::with_capacity(event.len() + 1);
        for (name, value) in event.iter() {
            let value = if name == FIELD_TIME {
                event_time(event, entry).into_owned()
            } else {
                value.to_owned()
            };
            object.insert(name.to_owned(), Value::String(value));
        }
        // 페이로드의 같은 이름 필드가 출처를 덮어쓰지 않도록 마지막에 넣음
        object.insert(self.source_field.to_owned(), Value::from(source));

        serde_json::to_string(&object).map_err(|e| TailError::Decode {
            format: "json".to_owned(),
            reason: e.to_string(),
        })
    }

    fn render_matches(&self, source: &str, raw: &str) -> Vec<String> {
        self.filter
            .find_all(raw)
            .into_iter()
            .map(|m| format!("{} {}", (&*single_line(source)).cyan(), single_line(m)))
            .collect()
    }
}

fn render_text(source: &str, event: &DecodedEvent, entry: &RawEntry) -> String {
    let time = event_time(event, entry);
    let level = event.get_or_empty(FIELD_LEVEL);
    format!(
        "{} {} request_id: {} environment: {} level: {} msg: {}",
        (&*single_line(source)).cyan(),
        (&*single_line(&time)).cyan(),
        (&*single_line(event.get_or_empty(FIELD_REQUEST_ID))).green(),
        single_line(event.get_or_empty(FIELD_ENVIRONMENT)),
        level_color(&single_line(level)),
        single_line(event.get_or_empty(FIELD_MSG)),
    )
}

/// 텍스트 모드 값에서 탭을 제외한 제어 문자를 이스케이프합니다.
///
/// 제어 문자가 없으면 복사하지 않습니다.
fn single_line(value: &str) -> Cow<'_, str> {
    if !value.chars().any(|c| c.is_control() && c != '\t') {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        if c.is_control() && c != '\t' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// 레벨 값에 따라 색상 태그를 붙입니다. 대소문자는 구분하지 않습니다.
pub fn level_color(level: &str) -> ColoredString {
    match level.to_ascii_lowercase().as_str() {
        "error" => level.red(),
        "info" => level.green(),
        "warn" => level.yellow(),
        _ => level.white(),
    }
}

/// 이벤트의 시각 필드. 비어 있으면 소스가 부여한 타임스탬프(RFC 3339)를 씁니다.
fn event_time<'a>(event: &'a DecodedEvent, entry: &RawEntry) -> Cow<'a, str> {
    match event.get(FIELD_TIME) {
        Some(time) if !time.is_empty() => Cow::Borrowed(time),
        _ => entry
            .timestamp()
            .map(|ts| Cow::Owned(ts.to_rfc3339_opts(SecondsFormat::Millis, true)))
            .unwrap_or(Cow::Borrowed("")),
    }
}
