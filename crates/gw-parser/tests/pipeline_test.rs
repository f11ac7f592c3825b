//! End-to-end tests: bytes in, resolved record graph and warnings out.

use gw_core::model::IndividualEventType;
use gw_core::{LinkState, ParserConfig, WarningCode};
use gw_parser::{Encoding, ParseResult, parse_bytes, parse_bytes_with_config, write_custom_facts};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .without_time()
        .with_test_writer()
        .try_init();
}

fn parse(text: &str) -> ParseResult {
    init_tracing();
    parse_bytes(text.as_bytes()).expect("parse should succeed")
}

const HEADER: &str = "0 HEAD\n1 SOUR test\n1 GEDC\n2 VERS 5.5.1\n2 FORM LINEAGE-LINKED\n1 CHAR UTF-8\n";

#[test]
fn cont_and_conc_rebuild_note_text() {
    let result = parse(&format!(
        "{HEADER}0 @N1@ NOTE The quick\n1 CONC  brown fox\n1 CONT jumps over\n1 CONC  the dog\n0 TRLR\n"
    ));
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let note = result.gedcom.note("@N1@").expect("note");
    assert_eq!(note.text, "The quick brown fox\njumps over the dog");
}

#[test]
fn level_skip_attaches_to_nearest_ancestor_with_warning() {
    let result = parse(&format!(
        "{HEADER}0 @I1@ INDI\n1 BIRT\n3 DATE 1 JAN 1900\n0 TRLR\n"
    ));
    let skips: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.code == WarningCode::LevelSkip)
        .collect();
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].line, Some(9));

    let person = result.gedcom.individual("@I1@").expect("person");
    let birth = person
        .events_of_type(IndividualEventType::Birth)
        .next()
        .expect("birth");
    assert_eq!(birth.detail.date.as_deref(), Some("1 JAN 1900"));
}

#[test]
fn family_declared_before_husband_resolves() {
    let result = parse(&format!(
        "{HEADER}0 @F1@ FAM\n1 HUSB @I1@\n1 WIFE @I2@\n0 @I1@ INDI\n1 SEX M\n0 @I2@ INDI\n1 SEX F\n1 FAMS @F1@\n0 TRLR\n"
    ));
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let husband = result.gedcom.individual("@I1@").expect("husband");
    assert!(husband.is_spouse_in("@F1@"));
    assert!(husband.spouse_of_families[0].family.is_resolved());

    let family = result.gedcom.family("@F1@").expect("family");
    let pointer = family.husband.as_ref().expect("husband pointer");
    assert_eq!(pointer.state, LinkState::Resolved);
    assert!(result.gedcom.resolve_individual(pointer).is_some());
    // I2 already listed the family, so the mirror is not duplicated.
    assert_eq!(
        result
            .gedcom
            .individual("@I2@")
            .expect("wife")
            .spouse_of_families
            .len(),
        1
    );
}

#[test]
fn unknown_tags_survive_as_custom_facts() {
    let result = parse(&format!(
        "{HEADER}0 @I1@ INDI\n1 NAME A /B/\n1 _MILT Navy\n2 DATE 1942\n2 _RANK Ensign\n3 _NOTE promoted\n0 TRLR\n"
    ));
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let person = result.gedcom.individual("@I1@").expect("person");
    let fact = &person.custom_facts[0];
    assert_eq!(fact.tag, "_MILT");
    assert_eq!(fact.value.as_deref(), Some("Navy"));
    assert_eq!(fact.child("DATE").and_then(|d| d.value.as_deref()), Some("1942"));
    let rank = fact.child("_RANK").expect("nested custom fact");
    assert_eq!(rank.children[0].value.as_deref(), Some("promoted"));

    assert_eq!(
        write_custom_facts(&person.custom_facts, 1),
        "1 _MILT Navy\n2 DATE 1942\n2 _RANK Ensign\n3 _NOTE promoted\n"
    );
}

#[test]
fn ansel_combining_mark_follows_its_base_letter() {
    init_tracing();
    let bytes = b"0 HEAD\n1 CHAR ANSEL\n1 GEDC\n2 VERS 5.5\n0 @I1@ INDI\n1 NAME Voil\xE1a /Test/\n0 TRLR\n";
    let result = parse_bytes(bytes).expect("parses");
    assert_eq!(result.encoding.encoding, Encoding::Ansel);
    let person = result.gedcom.individual("@I1@").expect("person");
    assert_eq!(person.names[0].value, "Voila\u{0300} /Test/");
}

#[test]
fn dangling_reference_is_a_single_warning() {
    let result = parse(&format!(
        "{HEADER}0 @I1@ INDI\n1 FAMC @F99@\n1 NAME Kept /Going/\n0 @I2@ INDI\n0 TRLR\n"
    ));
    let dangling: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.code == WarningCode::DanglingXref)
        .collect();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].line, Some(8));

    let person = result.gedcom.individual("@I1@").expect("person");
    assert_eq!(person.child_of_families[0].family.state, LinkState::Unresolved);
    assert_eq!(person.names.len(), 1);
    assert!(result.gedcom.individual("@I2@").is_some());
}

#[test]
fn utf16_with_bom_decodes() {
    init_tracing();
    let text = "0 HEAD\r\n1 CHAR UNICODE\r\n0 @I1@ INDI\r\n1 NAME Zo\u{eb} /Ng/\r\n0 TRLR\r\n";
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let result = parse_bytes(&bytes).expect("parses");
    assert_eq!(result.encoding.encoding, Encoding::Utf16Le);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let person = result.gedcom.individual("@I1@").expect("person");
    assert_eq!(person.names[0].value, "Zo\u{eb} /Ng/");
}

#[test]
fn strict_custom_tags_flag_unprefixed_tags() {
    init_tracing();
    let config = ParserConfig {
        strict_custom_tags: true,
        ..ParserConfig::default()
    };
    let text = format!("{HEADER}0 @I1@ INDI\n1 MILT Navy\n1 _OK yes\n0 TRLR\n");
    let result = parse_bytes_with_config(text.as_bytes(), &config).expect("parses");
    assert!(result.has_warning(WarningCode::NonStandardTag));
    assert_eq!(
        result
            .gedcom
            .individual("@I1@")
            .expect("person")
            .custom_facts
            .len(),
        2
    );
}

#[test]
fn graph_serializes_to_json() {
    let result = parse(&format!("{HEADER}0 @I1@ INDI\n1 SEX M\n0 TRLR\n"));
    let json = serde_json::to_value(&result.gedcom).expect("serializes");
    assert_eq!(json["individuals"]["@I1@"]["sex"]["Known"], "Male");
}

#[test]
fn ordinance_family_links_resolve_without_mirrors() {
    let result = parse(&format!(
        "{HEADER}0 @I1@ INDI\n1 SLGC\n2 FAMC @F1@\n1 BAPL\n2 FAMC @F9@\n0 @F1@ FAM\n1 SLGS\n2 NOTE @N1@\n0 @N1@ NOTE sealed\n0 TRLR\n"
    ));
    let dangling: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.code == WarningCode::DanglingXref)
        .collect();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].line, Some(11));

    let person = result.gedcom.individual("@I1@").expect("person");
    let sealed_to = person.lds_ordinances[0].family.as_ref().expect("family link");
    assert!(sealed_to.family.is_resolved());
    assert_eq!(
        person.lds_ordinances[1].family.as_ref().map(|link| link.family.state),
        Some(LinkState::Unresolved)
    );
    assert!(person.child_of_families.is_empty());
    assert!(result.gedcom.family("@F1@").expect("family").children.is_empty());
}

#[test]
fn record_pointing_at_itself_resolves() {
    let result = parse(&format!(
        "{HEADER}0 @I1@ INDI\n1 ALIA @I1@\n1 ASSO @I1@\n2 RELA Self\n0 @I1@ INDI\n1 ALIA @I1@\n0 TRLR\n"
    ));
    assert!(!result.has_warning(WarningCode::DanglingXref), "{:?}", result.warnings);
    assert!(result.has_warning(WarningCode::DuplicateXref));
    let person = result.gedcom.individual("@I1@").expect("person");
    assert_eq!(person.aliases.len(), 2);
    assert!(person.aliases.iter().all(|alias| alias.is_resolved()));
    assert!(person.associations[0].individual.is_resolved());
}

#[test]
fn ansel_mark_before_empty_conc_stays_in_value() {
    init_tracing();
    let bytes = b"0 HEAD\n1 CHAR ANSEL\n0 @N1@ NOTE Jos\xE2\n1 CONC\n0 TRLR\n";
    let result = parse_bytes(bytes).expect("parses");
    let note = result.gedcom.note("@N1@").expect("note");
    assert_eq!(note.text, "Jos\u{0301}");
    assert!(note.custom_facts.is_empty(), "{:?}", note.custom_facts);
}
