//! Second pass over a mapped [`Gedcom`]: every pointer is checked against the record
//! arenas, then family and individual links are made to agree in both directions.

use std::collections::{BTreeMap, BTreeSet};

use gw_core::model::{FamilyChild, FamilySpouse, Individual, Sex};
use gw_core::{Gedcom, LinkState, ParseWarning, Pointer, RecordKind, WarningCode, Xref};
use tracing::{debug, trace};

type KnownXrefs = BTreeMap<RecordKind, BTreeSet<Xref>>;

/// Counts reported at the end of a resolver pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub resolved: usize,
    pub unresolved: usize,
    pub mirrored: usize,
}

/// One directed link read from the file: `from` names `to` in a pointer field.
#[derive(Debug)]
struct Edge {
    from: Xref,
    to: Xref,
    line: Option<usize>,
}

#[derive(Debug, Default)]
struct MirrorEdges {
    /// Family to individual, from `HUSB`/`WIFE`.
    family_spouses: Vec<Edge>,
    /// Family to individual, from `CHIL`.
    family_children: Vec<Edge>,
    /// Individual to family, from `FAMS`.
    spouse_of: Vec<Edge>,
    /// Individual to family, from `FAMC`.
    child_of: Vec<Edge>,
}

/// Resolves every pointer in place and completes mirror edges.
///
/// Dangling pointers stay in the graph as [`LinkState::Unresolved`] and produce
/// exactly one warning each. Declaration order does not matter because the set of
/// declared records is taken before any pointer is examined.
pub fn resolve(gedcom: &mut Gedcom, warnings: &mut Vec<ParseWarning>) -> ResolveStats {
    let known = known_xrefs(gedcom);
    let mut stats = resolve_pointers(gedcom, &known, warnings);
    let edges = collect_edges(gedcom);
    stats.mirrored = complete_mirrors(gedcom, edges, warnings);
    debug!(
        resolved = stats.resolved,
        unresolved = stats.unresolved,
        mirrored = stats.mirrored,
        "resolved cross-references"
    );
    stats
}

fn known_xrefs(gedcom: &Gedcom) -> KnownXrefs {
    BTreeMap::from([
        (RecordKind::Individual, gedcom.individuals.keys().cloned().collect()),
        (RecordKind::Family, gedcom.families.keys().cloned().collect()),
        (RecordKind::Multimedia, gedcom.multimedia.keys().cloned().collect()),
        (RecordKind::Note, gedcom.notes.keys().cloned().collect()),
        (RecordKind::Repository, gedcom.repositories.keys().cloned().collect()),
        (RecordKind::Source, gedcom.sources.keys().cloned().collect()),
        (RecordKind::Submitter, gedcom.submitters.keys().cloned().collect()),
        (
            RecordKind::Submission,
            gedcom.submission.iter().map(|s| s.xref.clone()).collect(),
        ),
    ])
}

fn warning(code: WarningCode, line: Option<usize>, message: String) -> ParseWarning {
    match line {
        Some(line) => ParseWarning::at_line(code, line, message),
        None => ParseWarning::new(code, message),
    }
}

fn resolve_pointers(
    gedcom: &mut Gedcom,
    known: &KnownXrefs,
    warnings: &mut Vec<ParseWarning>,
) -> ResolveStats {
    let mut stats = ResolveStats::default();
    gedcom.visit_pointers_mut(|kind, pointer| {
        let found = known
            .get(&kind)
            .is_some_and(|xrefs| xrefs.contains(pointer.xref.as_str()));
        if found {
            pointer.state = LinkState::Resolved;
            stats.resolved += 1;
            return;
        }
        pointer.state = LinkState::Unresolved;
        stats.unresolved += 1;
        warnings.push(warning(
            WarningCode::DanglingXref,
            pointer.line,
            format!(
                "{} pointer {} names no declared record",
                kind.as_str(),
                pointer.xref
            ),
        ));
    });
    stats
}

fn resolved_edge(from: &Xref, pointer: &Pointer) -> Option<Edge> {
    pointer.is_resolved().then(|| Edge {
        from: from.clone(),
        to: pointer.xref.clone(),
        line: pointer.line,
    })
}

fn collect_edges(gedcom: &Gedcom) -> MirrorEdges {
    let mut edges = MirrorEdges::default();
    for family in gedcom.families.values() {
        edges
            .family_spouses
            .extend(family.spouses().filter_map(|p| resolved_edge(&family.xref, p)));
        edges
            .family_children
            .extend(family.children.iter().filter_map(|p| resolved_edge(&family.xref, p)));
    }
    for person in gedcom.individuals.values() {
        edges.spouse_of.extend(
            person
                .spouse_of_families
                .iter()
                .filter_map(|link| resolved_edge(&person.xref, &link.family)),
        );
        edges.child_of.extend(
            person
                .child_of_families
                .iter()
                .filter_map(|link| resolved_edge(&person.xref, &link.family)),
        );
    }
    edges
}

fn complete_mirrors(
    gedcom: &mut Gedcom,
    edges: MirrorEdges,
    warnings: &mut Vec<ParseWarning>,
) -> usize {
    let mut added = 0;

    for edge in edges.family_spouses {
        if let Some(person) = gedcom.individuals.get_mut(&edge.to)
            && !person.is_spouse_in(edge.from.as_str())
        {
            trace!(individual = %edge.to, family = %edge.from, "added FAMS mirror");
            person.spouse_of_families.push(FamilySpouse {
                family: Pointer::resolved(edge.from),
                ..FamilySpouse::default()
            });
            added += 1;
        }
    }

    for edge in edges.family_children {
        if let Some(person) = gedcom.individuals.get_mut(&edge.to)
            && !person.is_child_of(edge.from.as_str())
        {
            trace!(individual = %edge.to, family = %edge.from, "added FAMC mirror");
            person.child_of_families.push(FamilyChild {
                family: Pointer::resolved(edge.from),
                ..FamilyChild::default()
            });
            added += 1;
        }
    }

    for edge in edges.child_of {
        if let Some(family) = gedcom.families.get_mut(&edge.to)
            && !family.has_child(edge.from.as_str())
        {
            trace!(individual = %edge.from, family = %edge.to, "added CHIL mirror");
            family.children.push(Pointer::resolved(edge.from));
            added += 1;
        }
    }

    for edge in edges.spouse_of {
        let sex = gedcom.individuals.get(&edge.from).and_then(Individual::sex);
        let Some(family) = gedcom.families.get_mut(&edge.to) else {
            continue;
        };
        if family.has_spouse(edge.from.as_str()) {
            continue;
        }
        let slot = match sex {
            Some(Sex::Male) => Some(&mut family.husband),
            Some(Sex::Female) => Some(&mut family.wife),
            Some(Sex::Unknown) | None => None,
        };
        match slot {
            Some(slot) if slot.is_none() => {
                trace!(individual = %edge.from, family = %edge.to, "added spouse mirror");
                *slot = Some(Pointer::resolved(edge.from));
                added += 1;
            }
            _ => warnings.push(warning(
                WarningCode::InconsistentLink,
                edge.line,
                format!(
                    "{} claims to be a spouse in {} but the family has no free matching role",
                    edge.from, edge.to
                ),
            )),
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::mapper::Mapper;
    use crate::tree_builder::build_tree;
    use crate::encoding::LogicalLine;
    use gw_core::{Gedcom, LinkState, ParseWarning, ParserConfig, WarningCode};

    fn resolved(text: &str) -> (Gedcom, Vec<ParseWarning>) {
        let config = ParserConfig::default();
        let lines: Vec<LogicalLine> = text
            .lines()
            .enumerate()
            .map(|(index, text)| LogicalLine {
                number: index + 1,
                text: text.to_string(),
            })
            .collect();
        let (tree, mut warnings) = build_tree(&lines, &config);
        let (mut gedcom, mapped) = Mapper::new(&tree, &config).map().expect("maps");
        warnings.extend(mapped);
        resolve(&mut gedcom, &mut warnings);
        (gedcom, warnings)
    }

    #[test]
    fn forward_reference_resolves_and_mirrors() {
        let (gedcom, warnings) = resolved(
            "0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I2@\n0 @I1@ INDI\n0 @I2@ INDI\n0 TRLR",
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        let family = gedcom.family("@F1@").expect("family");
        assert_eq!(family.husband.as_ref().map(|p| p.state), Some(LinkState::Resolved));
        assert!(gedcom.individual("@I1@").expect("husband").is_spouse_in("@F1@"));
        assert!(gedcom.individual("@I2@").expect("child").is_child_of("@F1@"));
    }

    #[test]
    fn individual_side_links_fill_family() {
        let (gedcom, warnings) = resolved(concat!(
            "0 @I1@ INDI\n1 SEX F\n1 FAMS @F1@\n",
            "0 @I2@ INDI\n1 FAMC @F1@\n",
            "0 @F1@ FAM\n",
            "0 TRLR",
        ));
        assert!(warnings.is_empty(), "{warnings:?}");
        let family = gedcom.family("@F1@").expect("family");
        assert!(family.wife.as_ref().is_some_and(|p| p.points_to("@I1@")));
        assert!(family.husband.is_none());
        assert!(family.has_child("@I2@"));
    }

    #[test]
    fn spouse_without_sex_cannot_be_placed() {
        let (gedcom, warnings) = resolved("0 @I1@ INDI\n1 FAMS @F1@\n0 @F1@ FAM\n0 TRLR");
        assert!(gedcom.family("@F1@").expect("family").husband.is_none());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::InconsistentLink);
        assert_eq!(warnings[0].line, Some(2));
    }

    #[test]
    fn dangling_pointer_warns_once_and_stays() {
        let (gedcom, warnings) =
            resolved("0 @F1@ FAM\n1 WIFE @I404@\n1 NOTE @N1@\n0 @N1@ NOTE x\n0 TRLR");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::DanglingXref);
        assert_eq!(warnings[0].line, Some(2));
        let family = gedcom.family("@F1@").expect("family");
        let wife = family.wife.as_ref().expect("stub kept");
        assert_eq!(wife.state, LinkState::Unresolved);
        assert!(wife.points_to("@I404@"));
    }

    #[test]
    fn pointer_to_wrong_record_kind_is_dangling() {
        let (_, warnings) = resolved("0 @F1@ FAM\n1 HUSB @N1@\n0 @N1@ NOTE x\n0 TRLR");
        assert_eq!(warnings[0].code, WarningCode::DanglingXref);
    }
}
