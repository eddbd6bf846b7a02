//! 로그 스트림 소스
//!
//! 연결 시 로그 그룹에서 이름이 접두어로 시작하고 lookback 구간 안에 이벤트가 있는
//! 첫 스트림을 찾아 고정합니다. 이후 매 반복마다 "지금 - lookback" 이후의
//! 이벤트를 처음부터 다시 읽으므로, 라이브 모드에서는 같은 이벤트가 여러 번
//! 전달될 수 있습니다 (at-least-once).

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use rift_core::types::{RawEntry, SourceConfig, SourceKind, SourceTarget};

use super::{
    EntryStream, PollSchedule, Poller, SourceRuntime, SourceState, StreamSource, lookback_start_ms,
};
use crate::config::LogStreamSettings;
use crate::error::TailError;
use crate::remote::LogStoreClient;

/// 로그 스트림 폴링 단위
struct LogPoller<C> {
    client: Arc<C>,
    group: String,
    stream: String,
    lookback: Duration,
}

impl<C: LogStoreClient> Poller for LogPoller<C> {
    async fn poll(&mut self) -> Result<Vec<RawEntry>, TailError> {
        let since_ms = lookback_start_ms(self.lookback);
        self.client
            .fetch_events(&self.group, &self.stream, since_ms)
            .await
    }
}

/// 로그 그룹 내 단일 스트림을 읽는 소스
pub struct LogStreamSource<C: LogStoreClient> {
    group: String,
    stream_prefix: String,
    stream_name: String,
    runtime: SourceRuntime<LogPoller<C>>,
}

impl<C: LogStoreClient> LogStreamSource<C> {
    /// 대상 스트림을 찾아 소스를 생성합니다.
    ///
    /// lookback 구간 안에 접두어가 일치하는 스트림이 없으면
    /// [`TailError::StreamNotFound`]를 반환합니다.
    pub async fn connect(
        client: Arc<C>,
        config: &SourceConfig,
        settings: LogStreamSettings,
    ) -> Result<Self, TailError> {
        config.validate().map_err(|e| TailError::Config {
            field: "source".to_owned(),
            reason: e.to_string(),
        })?;
        settings.validate()?;

        let SourceTarget::LogStream {
            group,
            stream_prefix,
        } = &config.target
        else {
            return Err(TailError::Config {
                field: "target".to_owned(),
                reason: "log stream source requires a log group and stream prefix".to_owned(),
            });
        };

        let since_ms = lookback_start_ms(settings.lookback);
        let stream_name = client
            .find_stream(group, stream_prefix, since_ms)
            .await?
            .ok_or_else(|| TailError::StreamNotFound {
                group: group.clone(),
                prefix: stream_prefix.clone(),
            })?;
        info!(group = %group, stream = %stream_name, "log stream resolved");

        let poller = LogPoller {
            client,
            group: group.clone(),
            stream: stream_name.clone(),
            lookback: settings.lookback,
        };
        let schedule = PollSchedule {
            kind: SourceKind::LogStream,
            forever: config.forever,
            interval: settings.poll_interval,
        };

        Ok(Self {
            group: group.clone(),
            stream_prefix: stream_prefix.clone(),
            stream_name,
            runtime: SourceRuntime::new(poller, schedule, settings.channel_capacity),
        })
    }

    /// 로그 그룹 이름
    pub fn group(&self) -> &str {
        &self.group
    }

    /// 연결 시 고정된 실제 스트림 이름
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }
}

impl<C: LogStoreClient> StreamSource for LogStreamSource<C> {
    fn kind(&self) -> SourceKind {
        SourceKind::LogStream
    }

    fn identifier(&self) -> &str {
        &self.stream_prefix
    }

    fn start(&mut self, cancel: CancellationToken) -> EntryStream {
        self.runtime.start(cancel)
    }

    fn stop(&self) {
        self.runtime.stop();
    }

    fn state(&self) -> SourceState {
        self.runtime.state()
    }
}
