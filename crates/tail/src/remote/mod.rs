//! 원격 API 추상화 -- 테스트 가능성을 위한 클라이언트 trait
//!
//! Stream Source는 원격 API를 직접 호출하지 않고 이 모듈의 trait을 통해 접근합니다.
//! 운영 코드는 AWS SDK 기반 구현([`CloudWatchLogsClient`], [`SqsQueueClient`])을,
//! 테스트는 mock 구현을 사용합니다.
//!
//! ```text
//!  LogStreamSource          QueueSource
//!        │                       │
//!        ▼                       ▼
//!  LogStoreClient (trait)   QueueClient (trait)
//!     │        │               │        │
//!     ▼        ▼               ▼        ▼
//!  CloudWatch  Mock           SQS      Mock
//! ```

pub mod cloudwatch;
pub mod sqs;

pub use cloudwatch::CloudWatchLogsClient;
pub use sqs::SqsQueueClient;

use std::future::Future;

use aws_config::{BehaviorVersion, Region, SdkConfig};

use rift_core::types::RawEntry;

use crate::error::TailError;

/// 로그 스토어 API 추상화
///
/// 모든 메서드는 `since_ms`(밀리초 epoch) 이후의 이벤트만 대상으로 합니다.
pub trait LogStoreClient: Send + Sync + 'static {
    /// 그룹 안에서 이름이 `prefix`로 시작하고 `since_ms` 이후 이벤트가 있는
    /// 첫 스트림의 이름을 찾습니다. 없으면 `None`.
    fn find_stream(
        &self,
        group: &str,
        prefix: &str,
        since_ms: i64,
    ) -> impl Future<Output = Result<Option<String>, TailError>> + Send;

    /// 스트림에서 `since_ms` 이후의 이벤트를 시간순으로 가져옵니다.
    fn fetch_events(
        &self,
        group: &str,
        stream: &str,
        since_ms: i64,
    ) -> impl Future<Output = Result<Vec<RawEntry>, TailError>> + Send;
}

/// 메시지 큐 API 추상화
pub trait QueueClient: Send + Sync + 'static {
    /// 큐 이름을 호출 가능한 주소(URL)로 해석합니다.
    fn resolve_queue(&self, name: &str) -> impl Future<Output = Result<String, TailError>> + Send;

    /// 최대 `max_messages`개의 메시지를 가시성 타임아웃 0으로 읽습니다.
    ///
    /// 메시지는 삭제되거나 숨겨지지 않으므로 다른 소비자도 계속 읽을 수 있습니다.
    fn receive(
        &self,
        queue_url: &str,
        max_messages: i32,
    ) -> impl Future<Output = Result<Vec<RawEntry>, TailError>> + Send;
}

/// 리전과 공유 자격 증명 프로필로 AWS SDK 설정을 로드합니다.
pub async fn load_sdk_config(region: &str, profile: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_owned()))
        .profile_name(profile)
        .load()
        .await
}
