//! Traversal over graphs produced by the parser, including cyclic data.

use gw_graph::{ancestors, descendants, is_ancestor_of, siblings, spouses};
use gw_parser::parse_bytes;

fn xrefs(set: &std::collections::BTreeSet<gw_core::Xref>) -> Vec<&str> {
    set.iter().map(gw_core::Xref::as_str).collect()
}

/// A is a child of B, B a child of C, and C a child of A.
const PARENT_CYCLE: &str = "\
0 HEAD
1 GEDC
2 VERS 5.5.1
0 @A@ INDI
1 SEX M
1 FAMC @F1@
0 @B@ INDI
1 SEX M
1 FAMC @F2@
0 @C@ INDI
1 SEX M
1 FAMC @F3@
0 @F1@ FAM
1 HUSB @B@
0 @F2@ FAM
1 HUSB @C@
0 @F3@ FAM
1 HUSB @A@
0 TRLR
";

#[test]
fn parent_cycle_terminates_and_includes_start() {
    let result = parse_bytes(PARENT_CYCLE.as_bytes()).expect("parses");
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);

    assert_eq!(xrefs(&ancestors(&result.gedcom, "@A@")), vec!["@A@", "@B@", "@C@"]);
    assert_eq!(xrefs(&descendants(&result.gedcom, "@A@")), vec!["@A@", "@B@", "@C@"]);
    assert!(is_ancestor_of(&result.gedcom, "@A@", "@A@"));
}

#[test]
fn nuclear_family_relations() {
    let text = "\
0 @H@ INDI
1 SEX M
0 @W@ INDI
1 SEX F
0 @K1@ INDI
0 @K2@ INDI
0 @G@ INDI
1 FAMC @F0@
0 @F0@ FAM
1 CHIL @H@
0 @F1@ FAM
1 HUSB @H@
1 WIFE @W@
1 CHIL @K1@
1 CHIL @K2@
0 TRLR
";
    let result = parse_bytes(text.as_bytes()).expect("parses");
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    let gedcom = &result.gedcom;

    assert_eq!(xrefs(&spouses(gedcom, "@H@")), vec!["@W@"]);
    assert_eq!(xrefs(&siblings(gedcom, "@K1@")), vec!["@K2@"]);
    assert_eq!(xrefs(&siblings(gedcom, "@H@")), vec!["@G@"]);
    assert_eq!(xrefs(&descendants(gedcom, "@W@")), vec!["@K1@", "@K2@"]);
    assert_eq!(xrefs(&ancestors(gedcom, "@K2@")), vec!["@H@", "@W@"]);
    assert!(!is_ancestor_of(gedcom, "@G@", "@K1@"));
}
