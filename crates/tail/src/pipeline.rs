//! Pipeline Driver -- 엔트리 스트림을 소비하여 필터링, 디코딩, 렌더링합니다.
//!
//! # 처리 순서
//! ```text
//! EntryStream -> Filter(원시 텍스트) -> EventDecoder -> EventRenderer -> Write
//! ```
//!
//! 엔트리는 도착 순서대로 하나씩 처리됩니다. 디코딩 실패는 경고 로그를 남기고
//! 해당 엔트리만 건너뛰며, 스트림이 닫히면 드라이버도 종료됩니다.

use std::io::Write;

use metrics::counter;
use tracing::{debug, info, warn};

use rift_core::metrics as m;
use rift_core::pipeline::EventDecoder;
use rift_core::types::{RawEntry, SourceKind};

use crate::config::FormatterConfig;
use crate::decoder::build_decoder;
use crate::error::TailError;
use crate::render::EventRenderer;
use crate::source::EntryStream;

/// 실행 중 처리 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TailStats {
    /// 채널에서 받은 엔트리 수
    pub received: u64,
    /// 출력된 엔트리 수
    pub rendered: u64,
    /// grep 필터에 걸러진 엔트리 수
    pub filtered: u64,
    /// 디코딩 실패로 건너뛴 엔트리 수
    pub decode_errors: u64,
}

/// 한 엔트리의 처리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 출력됨
    Rendered,
    /// 필터에 걸러짐
    Filtered,
    /// 디코딩 실패로 건너뜀
    Skipped,
}

/// tail 파이프라인 드라이버
///
/// # 사용 예시
/// ```ignore
/// let mut pipeline = TailPipeline::from_config(&formatter, SourceKind::Queue, "jobs")?;
/// let stats = pipeline.run(stream, &mut std::io::stdout()).await?;
/// ```
pub struct TailPipeline {
    decoder: Box<dyn EventDecoder>,
    renderer: EventRenderer,
    source_id: String,
    stats: TailStats,
}

impl TailPipeline {
    /// 디코더와 렌더러로 드라이버를 생성합니다.
    pub fn new(
        decoder: Box<dyn EventDecoder>,
        renderer: EventRenderer,
        source_id: impl Into<String>,
    ) -> Self {
        Self {
            decoder,
            renderer,
            source_id: source_id.into(),
            stats: TailStats::default(),
        }
    }

    /// 렌더러 설정으로 디코더와 렌더러를 구성합니다.
    ///
    /// 스키마 로드 실패와 잘못된 grep 패턴은 여기서 에러가 됩니다.
    pub fn from_config(
        config: &FormatterConfig,
        kind: SourceKind,
        source_id: impl Into<String>,
    ) -> Result<Self, TailError> {
        let renderer = EventRenderer::new(config, kind)?;
        let decoder = build_decoder(config.schema.as_ref())?;
        Ok(Self::new(decoder, renderer, source_id))
    }

    /// 현재까지의 통계
    pub fn stats(&self) -> TailStats {
        self.stats
    }

    /// 스트림이 닫힐 때까지 엔트리를 처리합니다.
    ///
    /// 출력 I/O 에러(예: 닫힌 파이프)가 나면 즉시 중단합니다.
    pub async fn run<W: Write>(
        &mut self,
        stream: EntryStream,
        out: &mut W,
    ) -> Result<TailStats, TailError> {
        info!(
            source = %self.source_id,
            decoder = self.decoder.format_name(),
            "pipeline driver started"
        );

        while let Some(entry) = stream.recv().await {
            self.process(&entry, out)?;
        }

        info!(
            received = self.stats.received,
            rendered = self.stats.rendered,
            filtered = self.stats.filtered,
            decode_errors = self.stats.decode_errors,
            "entry stream closed"
        );
        Ok(self.stats)
    }

    /// 엔트리 하나를 처리합니다.
    pub fn process<W: Write>(&mut self, entry: &RawEntry, out: &mut W) -> Result<Outcome, TailError> {
        self.stats.received += 1;
        counter!(m::ENTRIES_RECEIVED_TOTAL).increment(1);

        let raw = entry.text();
        if !self.renderer.accepts(&raw) {
            self.stats.filtered += 1;
            counter!(m::ENTRIES_FILTERED_TOTAL).increment(1);
            return Ok(Outcome::Filtered);
        }

        let event = match self.decoder.decode(&entry.payload) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    decoder = self.decoder.format_name(),
                    message_id = entry.message_id().unwrap_or("-"),
                    error = %e,
                    payload = %raw,
                    "failed to decode entry, skipping"
                );
                self.stats.decode_errors += 1;
                counter!(m::DECODE_ERRORS_TOTAL).increment(1);
                return Ok(Outcome::Skipped);
            }
        };

        let lines = self.renderer.render(&self.source_id, &event, entry)?;
        if lines.is_empty() {
            // only-matching에서 비어 있지 않은 일치가 하나도 없으면 출력 없음
            self.stats.filtered += 1;
            counter!(m::ENTRIES_FILTERED_TOTAL).increment(1);
            return Ok(Outcome::Filtered);
        }
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        debug!(lines = lines.len(), "entry rendered");

        self.stats.rendered += 1;
        counter!(m::ENTRIES_RENDERED_TOTAL).increment(1);
        Ok(Outcome::Rendered)
    }
}
