#![no_main]

use libfuzzer_sys::fuzz_target;
use rift_core::pipeline::EventDecoder;
use rift_tail::BuiltinDecoder;

fuzz_target!(|data: &[u8]| {
    let decoder = BuiltinDecoder::new();
    if let Ok(event) = decoder.decode(data) {
        // 성공한 디코딩은 항상 내장 필드 세트를 모두 채웁니다
        assert_eq!(event.len(), rift_core::types::BUILTIN_FIELDS.len());
    }
});
