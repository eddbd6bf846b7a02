#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`source`]: 원격 소스 폴링 루프와 엔트리 스트림 (로그 스트림, 큐)
//! - [`remote`]: 원격 API 클라이언트 trait과 AWS SDK 구현
//! - [`decoder`]: 내장 필드 세트 / `.proto` 스키마 기반 페이로드 디코더
//! - [`filter`]: 원시 텍스트에 적용하는 grep 필터
//! - [`render`]: 텍스트/JSON 출력 렌더러
//! - [`pipeline`]: 엔트리 스트림을 소비하는 Pipeline Driver
//! - [`config`]: 소스 폴링 설정과 렌더러 설정
//! - [`error`]: 도메인 에러 타입

pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod render;

pub mod decoder;
pub mod remote;
pub mod source;

// --- 주요 타입 re-export ---

// 설정
pub use config::{FormatterConfig, LogStreamSettings, OutputMode, QueueSettings, SchemaRef};

// 에러
pub use error::TailError;

// 소스
pub use source::{EntryStream, LogStreamSource, QueueSource, SourceState, StreamSource};

// 원격 클라이언트
pub use remote::{CloudWatchLogsClient, LogStoreClient, QueueClient, SqsQueueClient};

// 디코더
pub use decoder::{BuiltinDecoder, SchemaDecoder, build_decoder};

// 필터 / 렌더러 / 드라이버
pub use filter::Filter;
pub use pipeline::{Outcome, TailPipeline, TailStats};
pub use render::EventRenderer;
