#![no_main]

use libfuzzer_sys::fuzz_target;
use okr_core::Dataset;
use okr_core::dataset::DatasetFormat;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    for format in [DatasetFormat::Json, DatasetFormat::Yaml, DatasetFormat::Toml] {
        if let Ok(dataset) = Dataset::parse(text, format, "fuzz") {
            // Validation must classify any parsed document without panicking.
            let _ = dataset.validate();
        }
    }
});
