#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rift_core::pipeline::EventDecoder;
use rift_core::types::{RawEntry, SourceKind};
use rift_tail::{BuiltinDecoder, EventRenderer, FormatterConfig, OutputMode};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    json: bool,
    only_matching: bool,
    pattern: Option<String>,
    payload: Vec<u8>,
    timestamp_ms: Option<i64>,
}

fuzz_target!(|input: FuzzInput| {
    let mode = if input.json { OutputMode::Json } else { OutputMode::Text };
    let config = FormatterConfig::new(mode)
        .with_pattern(input.pattern)
        .with_only_matching(input.only_matching);
    let Ok(renderer) = EventRenderer::new(&config, SourceKind::LogStream) else {
        return;
    };

    let entry = RawEntry::log(input.payload, input.timestamp_ms);
    let Ok(event) = BuiltinDecoder::new().decode(&entry.payload) else {
        return;
    };

    let Ok(lines) = renderer.render("fuzz-stream", &event, &entry) else {
        return;
    };
    if input.json {
        // JSON 모드는 항상 파싱 가능한 객체 한 줄
        assert_eq!(lines.len(), 1);
        let value: serde_json::Value =
            serde_json::from_str(&lines[0]).expect("json mode must emit valid JSON");
        assert_eq!(value["stream"], "fuzz-stream");
    } else {
        // 텍스트 모드의 각 줄은 물리적으로도 한 줄
        assert!(lines.iter().all(|l| !l.contains(['\n', '\r'])));
    }
});
