//! Stream Source -- 원격 소스를 폴링하여 원시 엔트리를 채널로 전달합니다.
//!
//! # 소스 종류
//! - [`LogStreamSource`]: 로그 그룹 내 접두어가 일치하는 첫 스트림
//! - [`QueueSource`]: 이름으로 주소를 해석한 메시지 큐
//!
//! # 아키텍처
//! 각 소스는 `start()` 호출 시 자체 tokio 태스크에서 폴링 루프를 한 번만 실행하고,
//! 수집한 [`RawEntry`]를 bounded `mpsc` 채널로 전달합니다.
//! 루프가 끝나면 송신 측이 drop되어 채널이 닫히고, 소비자는 `None`을 받습니다.
//!
//! ```text
//!  start(cancel) ──► spawn(poll loop) ──► mpsc::Sender<RawEntry>
//!                                                │
//!  EntryStream (clone 가능) ◄────────────────────┘
//! ```
//!
//! # 종료 규칙
//! - 단발 모드: 첫 반복을 마치면 종료
//! - 라이브 모드: 반복마다 폴링 간격만큼 대기, 취소 또는 `stop()` 시 종료
//! - 폴링 중 원격 에러: 경고 로그 후 종료

pub mod log_stream;
pub mod queue;

pub use log_stream::LogStreamSource;
pub use queue::QueueSource;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use metrics::counter;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use rift_core::metrics as m;
use rift_core::types::{RawEntry, SourceKind};

use crate::error::TailError;

/// 소스 수명 주기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// 생성됨, 아직 시작하지 않음
    Created,
    /// 폴링 루프 실행 중
    Running,
    /// 폴링 루프 종료됨 (채널 닫힘)
    Stopped,
}

const STATE_CREATED: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_STOPPED: u8 = 2;

impl SourceState {
    fn from_u8(value: u8) -> Self {
        match value {
            STATE_CREATED => Self::Created,
            STATE_RUNNING => Self::Running,
            _ => Self::Stopped,
        }
    }
}

/// 원시 엔트리 수신 핸들
///
/// 같은 소스에서 얻은 핸들은 모두 하나의 채널을 공유합니다.
/// `Mutex`는 반복된 `start()` 호출이 clone 가능한 같은 핸들을 돌려주기 위해서만
/// 존재하며, 실제 소비자는 Pipeline Driver 하나입니다.
/// 폴링 루프가 종료되고 남은 엔트리를 모두 받으면 `recv()`는 `None`을 반환합니다.
#[derive(Debug, Clone)]
pub struct EntryStream {
    rx: Arc<Mutex<mpsc::Receiver<RawEntry>>>,
}

impl EntryStream {
    fn new(rx: mpsc::Receiver<RawEntry>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// 다음 엔트리를 기다립니다. 채널이 닫히면 `None`.
    pub async fn recv(&self) -> Option<RawEntry> {
        self.rx.lock().await.recv().await
    }

    /// 두 핸들이 같은 채널을 가리키는지 확인합니다.
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.rx, &other.rx)
    }
}

/// 원격 소스 공통 인터페이스
///
/// # 구현 예시
/// ```ignore
/// let cancel = CancellationToken::new();
/// let stream = source.start(cancel.clone());
/// while let Some(entry) = stream.recv().await {
///     println!("{}", entry.text());
/// }
/// ```
pub trait StreamSource: Send {
    /// 소스 종류
    fn kind(&self) -> SourceKind;

    /// 사용자가 지정한 대상 식별자 (스트림 접두어 또는 큐 이름)
    fn identifier(&self) -> &str;

    /// 폴링 루프를 시작하고 엔트리 스트림을 반환합니다.
    ///
    /// 두 번째 호출부터는 루프를 새로 만들지 않고 같은 스트림을 반환합니다.
    fn start(&mut self, cancel: CancellationToken) -> EntryStream;

    /// 실행 중인 폴링 루프에 종료를 요청합니다.
    fn stop(&self);

    /// 현재 수명 주기 상태
    fn state(&self) -> SourceState;
}

/// 한 번의 폴링 반복에서 원격 엔트리를 가져오는 단위
pub(crate) trait Poller: Send + 'static {
    fn poll(&mut self) -> impl Future<Output = Result<Vec<RawEntry>, TailError>> + Send;
}

/// 폴링 루프 실행 파라미터
#[derive(Debug, Clone)]
pub(crate) struct PollSchedule {
    pub kind: SourceKind,
    pub forever: bool,
    pub interval: Duration,
}

/// 소스 공통 런타임 -- 한 번만 시작되는 폴링 루프와 채널을 관리합니다.
pub(crate) struct SourceRuntime<P: Poller> {
    schedule: PollSchedule,
    poller: Option<P>,
    tx: Option<mpsc::Sender<RawEntry>>,
    stream: EntryStream,
    state: Arc<AtomicU8>,
    stop: CancellationToken,
}

impl<P: Poller> SourceRuntime<P> {
    pub(crate) fn new(poller: P, schedule: PollSchedule, channel_capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(channel_capacity.max(1));
        Self {
            schedule,
            poller: Some(poller),
            tx: Some(tx),
            stream: EntryStream::new(rx),
            state: Arc::new(AtomicU8::new(STATE_CREATED)),
            stop: CancellationToken::new(),
        }
    }

    pub(crate) fn start(&mut self, cancel: CancellationToken) -> EntryStream {
        let first = self
            .state
            .compare_exchange(
                STATE_CREATED,
                STATE_RUNNING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();

        if first {
            if let (Some(poller), Some(tx)) = (self.poller.take(), self.tx.take()) {
                let schedule = self.schedule.clone();
                let state = Arc::clone(&self.state);
                let stop = self.stop.clone();
                tokio::spawn(async move {
                    run_poll_loop(poller, tx, schedule, cancel, stop).await;
                    state.store(STATE_STOPPED, Ordering::Release);
                });
            }
        } else {
            debug!(source = %self.schedule.kind, "start called again, reusing existing stream");
        }

        self.stream.clone()
    }

    pub(crate) fn stop(&self) {
        self.stop.cancel();
    }

    pub(crate) fn state(&self) -> SourceState {
        SourceState::from_u8(self.state.load(Ordering::Acquire))
    }
}

/// 공유 폴링 루프
///
/// 루프가 반환되면 `tx`가 drop되어 채널이 닫힙니다.
async fn run_poll_loop<P: Poller>(
    mut poller: P,
    tx: mpsc::Sender<RawEntry>,
    schedule: PollSchedule,
    cancel: CancellationToken,
    stop: CancellationToken,
) {
    let source = schedule.kind.as_str();
    info!(source, forever = schedule.forever, "poll loop started");

    'poll: loop {
        if cancel.is_cancelled() || stop.is_cancelled() {
            debug!(source, "poll loop cancelled before fetch");
            break;
        }
        counter!(m::POLL_ITERATIONS_TOTAL, m::LABEL_SOURCE => source).increment(1);

        let result = tokio::select! {
            result = poller.poll() => result,
            _ = cancel.cancelled() => break,
            _ = stop.cancelled() => break,
        };

        let entries = match result {
            Ok(entries) => entries,
            Err(e) => {
                warn!(source, error = %e, "remote poll failed, ending stream");
                counter!(m::REMOTE_ERRORS_TOTAL, m::LABEL_SOURCE => source).increment(1);
                break;
            }
        };

        debug!(source, count = entries.len(), "poll iteration fetched entries");
        for entry in entries {
            if tx.send(entry).await.is_err() {
                debug!(source, "entry stream receiver dropped");
                break 'poll;
            }
            counter!(m::ENTRIES_PUSHED_TOTAL, m::LABEL_SOURCE => source).increment(1);
        }

        if !schedule.forever {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(schedule.interval) => {}
            _ = cancel.cancelled() => break,
            _ = stop.cancelled() => break,
        }
    }

    info!(source, "poll loop stopped");
}

/// `now - lookback`을 밀리초 epoch로 계산합니다.
pub(crate) fn lookback_start_ms(lookback: Duration) -> i64 {
    let lookback_ms = i64::try_from(lookback.as_millis()).unwrap_or(i64::MAX);
    chrono::Utc::now()
        .timestamp_millis()
        .saturating_sub(lookback_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedPoller {
        batches: VecDeque<Result<Vec<RawEntry>, TailError>>,
    }

    impl Poller for ScriptedPoller {
        async fn poll(&mut self) -> Result<Vec<RawEntry>, TailError> {
            self.batches.pop_front().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    fn runtime(
        batches: Vec<Result<Vec<RawEntry>, TailError>>,
        forever: bool,
    ) -> SourceRuntime<ScriptedPoller> {
        SourceRuntime::new(
            ScriptedPoller {
                batches: batches.into(),
            },
            PollSchedule {
                kind: SourceKind::Queue,
                forever,
                interval: Duration::from_secs(10),
            },
            4,
        )
    }

    #[tokio::test]
    async fn single_shot_closes_after_first_batch() {
        let mut rt = runtime(
            vec![
                Ok(vec![RawEntry::queue("a", None), RawEntry::queue("b", None)]),
                Ok(vec![RawEntry::queue("never", None)]),
            ],
            false,
        );
        assert_eq!(rt.state(), SourceState::Created);

        let stream = rt.start(CancellationToken::new());
        assert_eq!(stream.recv().await.unwrap().text(), "a");
        assert_eq!(stream.recv().await.unwrap().text(), "b");
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn start_twice_returns_same_stream() {
        let mut rt = runtime(vec![Ok(vec![RawEntry::queue("a", None)])], false);
        let first = rt.start(CancellationToken::new());
        let second = rt.start(CancellationToken::new());
        assert!(first.same_channel(&second));

        assert!(second.recv().await.is_some());
        assert!(first.recv().await.is_none());
    }

    #[tokio::test]
    async fn remote_error_ends_stream() {
        let mut rt = runtime(
            vec![Err(TailError::Remote {
                operation: "ReceiveMessage".to_owned(),
                reason: "throttled".to_owned(),
            })],
            true,
        );
        let stream = rt.start(CancellationToken::new());
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn live_mode_stops_on_cancel() {
        let mut rt = runtime(vec![Ok(vec![RawEntry::queue("a", None)])], true);
        let cancel = CancellationToken::new();
        let stream = rt.start(cancel.clone());
        assert!(stream.recv().await.is_some());

        cancel.cancel();
        assert!(stream.recv().await.is_none());
        tokio::task::yield_now().await;
        assert_eq!(rt.state(), SourceState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn live_mode_stops_on_stop_signal() {
        let mut rt = runtime(Vec::new(), true);
        let stream = rt.start(CancellationToken::new());
        assert_eq!(rt.state(), SourceState::Running);

        rt.stop();
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn cancelled_before_start_yields_nothing() {
        let mut rt = runtime(vec![Ok(vec![RawEntry::queue("a", None)])], false);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let stream = rt.start(cancel);
        assert!(stream.recv().await.is_none());
    }

    #[test]
    fn lookback_start_is_in_the_past() {
        let now = chrono::Utc::now().timestamp_millis();
        let since = lookback_start_ms(Duration::from_secs(20));
        assert!(since <= now - 20_000);
        assert!(since > now - 60_000);
    }
}
