//! 메시지 큐 소스
//!
//! 연결 시 큐 이름을 주소로 해석합니다. 해석은 선형 백오프로 재시도하며,
//! 재시도 예산을 모두 쓰면 [`TailError::QueueUnresolved`]로 실패합니다.
//! 메시지는 가시성 타임아웃 0으로 읽기 때문에 큐에서 삭제되거나 숨겨지지 않습니다.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rift_core::types::{RawEntry, SourceConfig, SourceKind, SourceTarget};

use super::{EntryStream, PollSchedule, Poller, SourceRuntime, SourceState, StreamSource};
use crate::config::QueueSettings;
use crate::error::TailError;
use crate::remote::QueueClient;

/// 큐 폴링 단위
struct QueuePoller<C> {
    client: Arc<C>,
    queue_url: String,
    batch_size: i32,
}

impl<C: QueueClient> Poller for QueuePoller<C> {
    async fn poll(&mut self) -> Result<Vec<RawEntry>, TailError> {
        self.client.receive(&self.queue_url, self.batch_size).await
    }
}

/// 이름으로 지정한 메시지 큐를 읽는 소스
pub struct QueueSource<C: QueueClient> {
    queue_name: String,
    queue_url: String,
    runtime: SourceRuntime<QueuePoller<C>>,
}

impl<C: QueueClient> QueueSource<C> {
    /// 큐 주소를 해석하여 소스를 생성합니다.
    pub async fn connect(
        client: Arc<C>,
        config: &SourceConfig,
        settings: QueueSettings,
    ) -> Result<Self, TailError> {
        config.validate().map_err(|e| TailError::Config {
            field: "source".to_owned(),
            reason: e.to_string(),
        })?;
        settings.validate()?;

        let SourceTarget::Queue { queue_name } = &config.target else {
            return Err(TailError::Config {
                field: "target".to_owned(),
                reason: "queue source requires a queue name".to_owned(),
            });
        };

        let queue_url = resolve_with_retry(client.as_ref(), queue_name, &settings).await?;

        let poller = QueuePoller {
            client,
            queue_url: queue_url.clone(),
            batch_size: settings.batch_size,
        };
        let schedule = PollSchedule {
            kind: SourceKind::Queue,
            forever: config.forever,
            interval: settings.poll_interval,
        };

        Ok(Self {
            queue_name: queue_name.clone(),
            queue_url,
            runtime: SourceRuntime::new(poller, schedule, settings.channel_capacity),
        })
    }

    /// 해석된 큐 주소
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

impl<C: QueueClient> StreamSource for QueueSource<C> {
    fn kind(&self) -> SourceKind {
        SourceKind::Queue
    }

    fn identifier(&self) -> &str {
        &self.queue_name
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

/// 큐 이름을 선형 백오프로 재시도하며 해석합니다.
///
/// n번째 재시도 전에 `retry_backoff * n`만큼 대기합니다.
async fn resolve_with_retry<C: QueueClient>(
    client: &C,
    queue_name: &str,
    settings: &QueueSettings,
) -> Result<String, TailError> {
    let mut last_error = String::new();

    for attempt in 0..settings.resolve_attempts {
        if attempt > 0 {
            let backoff = settings.retry_backoff * attempt;
            tokio::time::sleep(backoff).await;
        }

        match client.resolve_queue(queue_name).await {
            Ok(url) => {
                info!(queue = queue_name, url = %url, attempt = attempt + 1, "queue resolved");
                return Ok(url);
            }
            Err(e) => {
                warn!(
                    queue = queue_name,
                    attempt = attempt + 1,
                    max_attempts = settings.resolve_attempts,
                    error = %e,
                    "queue resolution failed"
                );
                last_error = e.to_string();
            }
        }
    }

    Err(TailError::QueueUnresolved {
        queue: queue_name.to_owned(),
        attempts: settings.resolve_attempts,
        reason: last_error,
    })
}
