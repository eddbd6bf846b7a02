#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rift_tail::Filter;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 사용자가 입력할 수 있는 임의 패턴 (컴파일 실패 허용)
    pattern: String,
    /// 매칭 대상 원시 페이로드
    text: String,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(filter) = Filter::new(Some(&input.pattern)) else {
        return;
    };

    let parts = filter.find_all(&input.text);
    if filter.is_active() {
        // 일치 부분이 있으면 필터도 통과해야 합니다
        assert_eq!(!parts.is_empty(), filter.accepts(&input.text));
    } else {
        assert!(filter.accepts(&input.text));
    }
});
