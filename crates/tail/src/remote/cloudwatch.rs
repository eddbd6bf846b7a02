//! CloudWatch Logs 기반 [`LogStoreClient`] 구현

use aws_sdk_cloudwatchlogs::Client;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use tracing::debug;

use rift_core::types::RawEntry;

use super::{LogStoreClient, load_sdk_config};
use crate::error::TailError;

/// CloudWatch Logs 클라이언트
///
/// 내부 SDK 클라이언트는 복제 비용이 낮아 태스크 간 공유에 문제가 없습니다.
#[derive(Clone, Debug)]
pub struct CloudWatchLogsClient {
    client: Client,
}

impl CloudWatchLogsClient {
    /// 리전과 프로필로 클라이언트를 생성합니다.
    pub async fn connect(region: &str, profile: &str) -> Self {
        let config = load_sdk_config(region, profile).await;
        Self {
            client: Client::new(&config),
        }
    }
}

impl LogStoreClient for CloudWatchLogsClient {
    async fn find_stream(
        &self,
        group: &str,
        prefix: &str,
        since_ms: i64,
    ) -> Result<Option<String>, TailError> {
        let output = self
            .client
            .filter_log_events()
            .log_group_name(group)
            .log_stream_name_prefix(prefix)
            .start_time(since_ms)
            .limit(1)
            .send()
            .await
            .map_err(|e| TailError::Remote {
                operation: "FilterLogEvents".to_owned(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let stream = output
            .events()
            .iter()
            .find_map(|event| event.log_stream_name().map(str::to_owned));
        debug!(group, prefix, stream = ?stream, "filter log events completed");
        Ok(stream)
    }

    async fn fetch_events(
        &self,
        group: &str,
        stream: &str,
        since_ms: i64,
    ) -> Result<Vec<RawEntry>, TailError> {
        let output = self
            .client
            .get_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .start_time(since_ms)
            .start_from_head(true)
            .send()
            .await
            .map_err(|e| TailError::Remote {
                operation: "GetLogEvents".to_owned(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;

        let entries = output
            .events()
            .iter()
            .filter_map(|event| {
                let message = event.message()?;
                Some(RawEntry::log(message.to_owned(), event.timestamp()))
            })
            .collect();
        Ok(entries)
    }
}
