#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(result) = gw_parser::parse_bytes(data) else {
        return;
    };
    let gedcom = &result.gedcom;
    let total = gedcom.individuals.len();
    for xref in gedcom.individuals.keys().take(32) {
        let up = gw_graph::ancestors(gedcom, xref.as_str());
        let down = gw_graph::descendants(gedcom, xref.as_str());
        assert!(up.len() <= total && down.len() <= total);
        let _ = gw_graph::siblings(gedcom, xref.as_str());
        let _ = gw_graph::spouses(gedcom, xref.as_str());
    }
    let _ = gw_parser::write_custom_facts(&gedcom.custom_facts, 0);
});
