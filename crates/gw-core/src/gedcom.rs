use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::custom::CustomFact;
use crate::model::{
    Family, Header, Individual, Multimedia, NoteRecord, Repository, Source, Submission,
    Submitter, Trailer, VisitPointers,
};
use crate::xref::{Pointer, RecordKind, Xref};

/// The typed record graph. One arena per record kind, keyed by xref.
///
/// Records never own each other; links are [`Pointer`]s looked up through the
/// maps here, so reference cycles in the data are just cycles of ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Gedcom {
    pub header: Header,
    pub submission: Option<Submission>,
    pub individuals: BTreeMap<Xref, Individual>,
    pub families: BTreeMap<Xref, Family>,
    pub multimedia: BTreeMap<Xref, Multimedia>,
    pub notes: BTreeMap<Xref, NoteRecord>,
    pub repositories: BTreeMap<Xref, Repository>,
    pub sources: BTreeMap<Xref, Source>,
    pub submitters: BTreeMap<Xref, Submitter>,
    pub trailer: Option<Trailer>,
    /// Unknown level-0 records, in file order.
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordCounts {
    pub individuals: usize,
    pub families: usize,
    pub multimedia: usize,
    pub notes: usize,
    pub repositories: usize,
    pub sources: usize,
    pub submitters: usize,
    pub submissions: usize,
    pub custom_facts: usize,
}

impl RecordCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.individuals
            + self.families
            + self.multimedia
            + self.notes
            + self.repositories
            + self.sources
            + self.submitters
            + self.submissions
    }
}

impl Gedcom {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn individual(&self, xref: &str) -> Option<&Individual> {
        self.individuals.get(xref)
    }

    #[must_use]
    pub fn family(&self, xref: &str) -> Option<&Family> {
        self.families.get(xref)
    }

    #[must_use]
    pub fn source(&self, xref: &str) -> Option<&Source> {
        self.sources.get(xref)
    }

    #[must_use]
    pub fn note(&self, xref: &str) -> Option<&NoteRecord> {
        self.notes.get(xref)
    }

    #[must_use]
    pub fn repository(&self, xref: &str) -> Option<&Repository> {
        self.repositories.get(xref)
    }

    #[must_use]
    pub fn multimedia_record(&self, xref: &str) -> Option<&Multimedia> {
        self.multimedia.get(xref)
    }

    #[must_use]
    pub fn submitter(&self, xref: &str) -> Option<&Submitter> {
        self.submitters.get(xref)
    }

    /// Follows a pointer to an individual. Unresolved pointers yield `None`.
    #[must_use]
    pub fn resolve_individual(&self, pointer: &Pointer) -> Option<&Individual> {
        self.individual(pointer.xref.as_str())
    }

    #[must_use]
    pub fn resolve_family(&self, pointer: &Pointer) -> Option<&Family> {
        self.family(pointer.xref.as_str())
    }

    /// Whether a record of `kind` is declared under `xref`.
    #[must_use]
    pub fn contains(&self, kind: RecordKind, xref: &str) -> bool {
        match kind {
            RecordKind::Individual => self.individuals.contains_key(xref),
            RecordKind::Family => self.families.contains_key(xref),
            RecordKind::Multimedia => self.multimedia.contains_key(xref),
            RecordKind::Note => self.notes.contains_key(xref),
            RecordKind::Repository => self.repositories.contains_key(xref),
            RecordKind::Source => self.sources.contains_key(xref),
            RecordKind::Submitter => self.submitters.contains_key(xref),
            RecordKind::Submission => self
                .submission
                .as_ref()
                .is_some_and(|submission| submission.xref.as_str() == xref),
        }
    }

    #[must_use]
    pub fn counts(&self) -> RecordCounts {
        RecordCounts {
            individuals: self.individuals.len(),
            families: self.families.len(),
            multimedia: self.multimedia.len(),
            notes: self.notes.len(),
            repositories: self.repositories.len(),
            sources: self.sources.len(),
            submitters: self.submitters.len(),
            submissions: usize::from(self.submission.is_some()),
            custom_facts: self.custom_facts.len(),
        }
    }

    /// Visits every pointer in the graph in a stable order: header, submission,
    /// then each arena in xref order.
    pub fn visit_pointers_mut(&mut self, mut visit: impl FnMut(RecordKind, &mut Pointer)) {
        let visit: &mut dyn FnMut(RecordKind, &mut Pointer) = &mut visit;
        self.header.visit_pointers(visit);
        self.submission.visit_pointers(visit);
        for record in self.individuals.values_mut() {
            record.visit_pointers(visit);
        }
        for record in self.families.values_mut() {
            record.visit_pointers(visit);
        }
        for record in self.multimedia.values_mut() {
            record.visit_pointers(visit);
        }
        for record in self.notes.values_mut() {
            record.visit_pointers(visit);
        }
        for record in self.repositories.values_mut() {
            record.visit_pointers(visit);
        }
        for record in self.sources.values_mut() {
            record.visit_pointers(visit);
        }
        for record in self.submitters.values_mut() {
            record.visit_pointers(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Gedcom;
    use crate::model::{Family, Individual, Submission};
    use crate::xref::{LinkState, Pointer, RecordKind, Xref};

    fn sample() -> Gedcom {
        let mut gedcom = Gedcom::new();
        gedcom
            .individuals
            .insert(Xref::new("@I1@"), Individual::new("@I1@"));
        let mut family = Family::new("@F1@");
        family.husband = Some(Pointer::pending("@I1@", 3));
        family.wife = Some(Pointer::pending("@I9@", 4));
        gedcom.families.insert(Xref::new("@F1@"), family);
        gedcom
    }

    #[test]
    fn counts_and_lookup() {
        let gedcom = sample();
        let counts = gedcom.counts();
        assert_eq!(counts.individuals, 1);
        assert_eq!(counts.families, 1);
        assert_eq!(counts.total(), 2);
        assert!(gedcom.individual("@I1@").is_some());
        assert!(gedcom.contains(RecordKind::Family, "@F1@"));
        assert!(!gedcom.contains(RecordKind::Individual, "@I9@"));
    }

    #[test]
    fn visitor_can_mark_pointers() {
        let mut gedcom = sample();
        let individuals: Vec<String> = gedcom
            .individuals
            .keys()
            .map(|xref| xref.to_string())
            .collect();
        gedcom.visit_pointers_mut(|kind, pointer| {
            if kind == RecordKind::Individual {
                pointer.state = if individuals.iter().any(|x| pointer.points_to(x)) {
                    LinkState::Resolved
                } else {
                    LinkState::Unresolved
                };
            }
        });

        let family = gedcom.family("@F1@").expect("family present");
        assert_eq!(
            family.husband.as_ref().map(|p| p.state),
            Some(LinkState::Resolved)
        );
        assert_eq!(
            family.wife.as_ref().map(|p| p.state),
            Some(LinkState::Unresolved)
        );
    }

    #[test]
    fn submission_is_addressable_by_xref() {
        let mut gedcom = Gedcom::new();
        gedcom.submission = Some(Submission {
            xref: Xref::new("@SUB1@"),
            ..Submission::default()
        });
        assert!(gedcom.contains(RecordKind::Submission, "@SUB1@"));
        assert_eq!(gedcom.counts().submissions, 1);
    }
}
