//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않은 경우 매크로 호출은 아무 동작도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `rift_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(rift_core::metrics::ENTRIES_RECEIVED_TOTAL, "source" => "queue").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 소스 종류 레이블 키 (log_stream, queue)
pub const LABEL_SOURCE: &str = "source";

// ─── 소스 메트릭 ────────────────────────────────────────────────────

/// 소스: 폴링 반복 횟수 (counter, label: source)
pub const POLL_ITERATIONS_TOTAL: &str = "rift_poll_iterations_total";

/// 소스: 원격 API 호출 실패 수 (counter, label: source)
pub const REMOTE_ERRORS_TOTAL: &str = "rift_remote_errors_total";

/// 소스: 채널에 넣은 엔트리 수 (counter, label: source)
pub const ENTRIES_PUSHED_TOTAL: &str = "rift_entries_pushed_total";

// ─── 파이프라인 메트릭 ──────────────────────────────────────────────

/// 파이프라인: 채널에서 받은 엔트리 수 (counter)
pub const ENTRIES_RECEIVED_TOTAL: &str = "rift_entries_received_total";

/// 파이프라인: 출력된 엔트리 수 (counter)
pub const ENTRIES_RENDERED_TOTAL: &str = "rift_entries_rendered_total";

/// 파이프라인: 필터에 걸러진 엔트리 수 (counter)
pub const ENTRIES_FILTERED_TOTAL: &str = "rift_entries_filtered_total";

/// 파이프라인: 디코딩 실패 수 (counter)
pub const DECODE_ERRORS_TOTAL: &str = "rift_decode_errors_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        POLL_ITERATIONS_TOTAL,
        "Total number of poll iterations run by stream sources"
    );
    describe_counter!(
        REMOTE_ERRORS_TOTAL,
        "Total number of failed remote API calls during polling"
    );
    describe_counter!(
        ENTRIES_PUSHED_TOTAL,
        "Total number of raw entries pushed onto the source channel"
    );
    describe_counter!(
        ENTRIES_RECEIVED_TOTAL,
        "Total number of raw entries received by the pipeline driver"
    );
    describe_counter!(
        ENTRIES_RENDERED_TOTAL,
        "Total number of entries rendered to stdout"
    );
    describe_counter!(
        ENTRIES_FILTERED_TOTAL,
        "Total number of entries rejected by the grep pattern"
    );
    describe_counter!(
        DECODE_ERRORS_TOTAL,
        "Total number of entries skipped because decoding failed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_METRIC_NAMES: &[&str] = &[
        POLL_ITERATIONS_TOTAL,
        REMOTE_ERRORS_TOTAL,
        ENTRIES_PUSHED_TOTAL,
        ENTRIES_RECEIVED_TOTAL,
        ENTRIES_RENDERED_TOTAL,
        ENTRIES_FILTERED_TOTAL,
        DECODE_ERRORS_TOTAL,
    ];

    #[test]
    fn metric_names_follow_convention() {
        for name in ALL_METRIC_NAMES {
            assert!(name.starts_with("rift_"), "{name} must start with rift_");
            assert!(name.ends_with("_total"), "{name} must be a _total counter");
        }
    }

    #[test]
    fn metric_names_are_unique() {
        let mut names = ALL_METRIC_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL_METRIC_NAMES.len());
    }

    #[test]
    fn describe_all_without_recorder_is_noop() {
        describe_all();
    }
}
