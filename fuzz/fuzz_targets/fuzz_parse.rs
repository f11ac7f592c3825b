#![no_main]

use gw_core::{GedcomError, ParserConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let lenient = ParserConfig {
        lenient_line_breaks: true,
        strict_custom_tags: true,
        ..ParserConfig::default()
    };
    for config in [ParserConfig::default(), lenient] {
        match gw_parser::parse_bytes_with_config(data, &config) {
            Ok(result) => {
                let _ = gw_parser::parse_evidence_json(&result);
            }
            Err(GedcomError::UnsupportedCharset { .. } | GedcomError::UnsupportedVersion { .. }) => {}
            Err(other) => panic!("unexpected fatal error: {other}"),
        }
    }
});
