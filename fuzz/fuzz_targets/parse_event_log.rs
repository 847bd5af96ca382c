#![no_main]

use libfuzzer_sys::fuzz_target;
use okr_core::event::parse_event_log;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(events) = parse_event_log(text) {
        for event in &events {
            let line = serde_json::to_string(event).expect("events serialize");
            let back = parse_event_log(&line).expect("serialized event parses");
            assert_eq!(back.len(), 1);
        }
    }
});
