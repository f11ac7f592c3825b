//! Substructures shared between record kinds.

use serde::{Deserialize, Serialize};

use super::enums::{
    AdoptedBy, Certainty, ChildLinkageStatus, Enumerated, FamilyEventType,
    IndividualAttributeType, IndividualEventType, LdsOrdinanceType, Pedigree, Restriction,
};
use super::VisitPointers;
use crate::custom::CustomFact;
use crate::xref::{Pointer, RecordKind};

/// `CHAN`: when a record was last modified.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ChangeDate {
    pub date: Option<String>,
    pub time: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub custom_facts: Vec<CustomFact>,
}

/// `REFN` with its optional `TYPE`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserReference {
    pub reference: String,
    pub kind: Option<String>,
    pub custom_facts: Vec<CustomFact>,
}

/// A note attached to a structure, either written inline or pointing at a note record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NoteStructure {
    Inline {
        text: String,
        citations: Vec<Citation>,
        custom_facts: Vec<CustomFact>,
    },
    Reference {
        note: Pointer,
        custom_facts: Vec<CustomFact>,
    },
}

impl NoteStructure {
    /// The inline text, if this note is not a pointer.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Inline { text, .. } => Some(text),
            Self::Reference { .. } => None,
        }
    }
}

/// `SOUR.DATA` on a citation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CitationData {
    pub entry_date: Option<String>,
    pub text: Vec<String>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourceCitation {
    pub source: Pointer,
    pub page: Option<String>,
    pub event_cited: Option<String>,
    pub role: Option<String>,
    pub data: Vec<CitationData>,
    pub certainty: Option<Enumerated<Certainty>>,
    pub notes: Vec<NoteStructure>,
    pub multimedia: Vec<MultimediaLink>,
    pub custom_facts: Vec<CustomFact>,
}

/// A citation written as free text instead of pointing at a source record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InlineCitation {
    pub description: String,
    pub text: Vec<String>,
    pub notes: Vec<NoteStructure>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Citation {
    WithSource(SourceCitation),
    WithoutSource(InlineCitation),
}

/// `FILE` inside a multimedia record or inline multimedia link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FileReference {
    pub path: String,
    pub format: Option<String>,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MultimediaLink {
    Reference {
        multimedia: Pointer,
        custom_facts: Vec<CustomFact>,
    },
    Inline {
        files: Vec<FileReference>,
        format: Option<String>,
        title: Option<String>,
        notes: Vec<NoteStructure>,
        custom_facts: Vec<CustomFact>,
    },
}

/// `ADDR` with its structured subfields. `text` holds the full address with
/// continuation lines joined by newlines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Address {
    pub text: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub custom_facts: Vec<CustomFact>,
}

/// An address together with the contact tags that sit beside it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Contact {
    pub address: Option<Address>,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub faxes: Vec<String>,
    pub websites: Vec<String>,
}

impl Contact {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.phones.is_empty()
            && self.emails.is_empty()
            && self.faxes.is_empty()
            && self.websites.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Place {
    pub name: String,
    pub form: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    /// `ROMN` spellings.
    pub romanized: Vec<NameVariation>,
    /// `FONE` spellings.
    pub phonetic: Vec<NameVariation>,
    pub custom_facts: Vec<CustomFact>,
}

/// `ROMN` or `FONE` under a place: the name in another script or by sound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NameVariation {
    pub value: String,
    /// `TYPE`, e.g. `pinyin` or `hangul`.
    pub kind: Option<String>,
    pub custom_facts: Vec<CustomFact>,
}

/// Fields every event and attribute can carry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct EventDetail {
    /// `TYPE`: free-text classification, required for `EVEN` and `FACT`.
    pub kind: Option<String>,
    /// Date string, kept as written.
    pub date: Option<String>,
    pub place: Option<Place>,
    pub contact: Contact,
    pub age: Option<String>,
    pub agency: Option<String>,
    pub religion: Option<String>,
    pub cause: Option<String>,
    pub restriction: Option<Enumerated<Restriction>>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub multimedia: Vec<MultimediaLink>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndividualEvent {
    pub kind: IndividualEventType,
    /// Line value, e.g. the `Y` in `1 DEAT Y`.
    pub value: Option<String>,
    pub detail: EventDetail,
    /// `FAMC` under `BIRT`, `CHR` or `ADOP`.
    pub family: Option<Pointer>,
    pub adopted_by: Option<Enumerated<AdoptedBy>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndividualAttribute {
    pub kind: IndividualAttributeType,
    pub value: Option<String>,
    pub detail: EventDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FamilyEvent {
    pub kind: FamilyEventType,
    pub value: Option<String>,
    pub husband_age: Option<String>,
    pub wife_age: Option<String>,
    pub detail: EventDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PersonalName {
    /// The full `NAME` value, surname delimited by slashes.
    pub value: String,
    pub kind: Option<String>,
    pub prefix: Option<String>,
    pub given: Option<String>,
    pub nickname: Option<String>,
    pub surname_prefix: Option<String>,
    pub surname: Option<String>,
    pub suffix: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub romanized: Vec<PersonalNameVariation>,
    pub phonetic: Vec<PersonalNameVariation>,
    pub custom_facts: Vec<CustomFact>,
}

/// `ROMN` or `FONE` under a personal name. Carries its own name pieces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PersonalNameVariation {
    pub value: String,
    pub kind: Option<String>,
    pub prefix: Option<String>,
    pub given: Option<String>,
    pub nickname: Option<String>,
    pub surname_prefix: Option<String>,
    pub surname: Option<String>,
    pub suffix: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub custom_facts: Vec<CustomFact>,
}

/// Fields shared by individual ordinances and spouse sealings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LdsOrdinanceDetail {
    pub date: Option<String>,
    /// `PLAC`, kept as plain text.
    pub place: Option<String>,
    /// `STAT`, e.g. `COMPLETED` or `DNS/CAN`.
    pub status: Option<String>,
    /// `TEMP`: temple code.
    pub temple: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub custom_facts: Vec<CustomFact>,
}

/// `BAPL`, `CONL`, `ENDL` or `SLGC` on an individual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LdsIndividualOrdinance {
    pub kind: LdsOrdinanceType,
    pub value: Option<String>,
    pub detail: LdsOrdinanceDetail,
    /// `FAMC`: the family a child was sealed to.
    pub family: Option<FamilyChild>,
}

/// `SLGS` on a family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LdsSpouseSealing {
    pub value: Option<String>,
    pub detail: LdsOrdinanceDetail,
}

impl PersonalName {
    /// `Surname, Given "Nick"` when the pieces are present, else the raw value.
    #[must_use]
    pub fn formatted(&self) -> String {
        if self.surname.is_none() && self.given.is_none() {
            return self.value.clone();
        }
        let mut out = format!(
            "{}, {}",
            self.surname.as_deref().unwrap_or_default(),
            self.given.as_deref().unwrap_or_default()
        );
        if let Some(nickname) = &self.nickname {
            out.push_str(&format!(" \"{nickname}\""));
        }
        out
    }
}

/// `FAMC` on an individual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FamilyChild {
    pub family: Pointer,
    pub pedigree: Option<Enumerated<Pedigree>>,
    pub status: Option<Enumerated<ChildLinkageStatus>>,
    pub notes: Vec<NoteStructure>,
    pub custom_facts: Vec<CustomFact>,
}

/// `FAMS` on an individual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct FamilySpouse {
    pub family: Pointer,
    pub notes: Vec<NoteStructure>,
    pub custom_facts: Vec<CustomFact>,
}

/// `ASSO` on an individual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Association {
    pub individual: Pointer,
    pub relation: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CallNumber {
    pub number: String,
    pub media_type: Option<String>,
}

/// `REPO` inside a source record. The pointer is optional because some files
/// only give call numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RepositoryCitation {
    pub repository: Option<Pointer>,
    pub call_numbers: Vec<CallNumber>,
    pub notes: Vec<NoteStructure>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RecordedEvent {
    pub types: String,
    pub date: Option<String>,
    pub place: Option<String>,
}

/// `DATA` inside a source record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourceData {
    pub events: Vec<RecordedEvent>,
    pub agency: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub custom_facts: Vec<CustomFact>,
}

impl VisitPointers for ChangeDate {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.notes.visit_pointers(visit);
    }
}

impl VisitPointers for NoteStructure {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        match self {
            Self::Inline { citations, .. } => citations.visit_pointers(visit),
            Self::Reference { note, .. } => visit(RecordKind::Note, note),
        }
    }
}

impl VisitPointers for Citation {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        match self {
            Self::WithSource(citation) => {
                visit(RecordKind::Source, &mut citation.source);
                citation.notes.visit_pointers(visit);
                citation.multimedia.visit_pointers(visit);
            }
            Self::WithoutSource(citation) => citation.notes.visit_pointers(visit),
        }
    }
}

impl VisitPointers for MultimediaLink {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        match self {
            Self::Reference { multimedia, .. } => visit(RecordKind::Multimedia, multimedia),
            Self::Inline { notes, .. } => notes.visit_pointers(visit),
        }
    }
}

impl VisitPointers for Place {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
    }
}

impl VisitPointers for EventDetail {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        if let Some(place) = &mut self.place {
            place.visit_pointers(visit);
        }
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
        self.multimedia.visit_pointers(visit);
    }
}

impl VisitPointers for IndividualEvent {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        if let Some(family) = &mut self.family {
            visit(RecordKind::Family, family);
        }
        self.detail.visit_pointers(visit);
    }
}

impl VisitPointers for IndividualAttribute {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.detail.visit_pointers(visit);
    }
}

impl VisitPointers for FamilyEvent {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.detail.visit_pointers(visit);
    }
}

impl VisitPointers for PersonalName {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
        self.romanized.visit_pointers(visit);
        self.phonetic.visit_pointers(visit);
    }
}

impl VisitPointers for PersonalNameVariation {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
    }
}

impl VisitPointers for LdsOrdinanceDetail {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
    }
}

impl VisitPointers for LdsIndividualOrdinance {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.detail.visit_pointers(visit);
        self.family.visit_pointers(visit);
    }
}

impl VisitPointers for LdsSpouseSealing {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.detail.visit_pointers(visit);
    }
}

impl VisitPointers for FamilyChild {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        visit(RecordKind::Family, &mut self.family);
        self.notes.visit_pointers(visit);
    }
}

impl VisitPointers for FamilySpouse {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        visit(RecordKind::Family, &mut self.family);
        self.notes.visit_pointers(visit);
    }
}

impl VisitPointers for Association {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        visit(RecordKind::Individual, &mut self.individual);
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
    }
}

impl VisitPointers for RepositoryCitation {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        if let Some(repository) = &mut self.repository {
            visit(RecordKind::Repository, repository);
        }
        self.notes.visit_pointers(visit);
    }
}

impl VisitPointers for SourceData {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.notes.visit_pointers(visit);
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Citation, FamilyChild, LdsIndividualOrdinance, LdsOrdinanceDetail, NoteStructure,
        PersonalName, PersonalNameVariation, SourceCitation,
    };
    use crate::model::LdsOrdinanceType;
    use crate::model::VisitPointers;
    use crate::xref::{Pointer, RecordKind};

    #[test]
    fn formatted_name_prefers_pieces() {
        let name = PersonalName {
            value: "John /Smith/".to_string(),
            given: Some("John".to_string()),
            surname: Some("Smith".to_string()),
            nickname: Some("Jack".to_string()),
            ..PersonalName::default()
        };
        assert_eq!(name.formatted(), "Smith, John \"Jack\"");

        let bare = PersonalName {
            value: "Mary /Jones/".to_string(),
            ..PersonalName::default()
        };
        assert_eq!(bare.formatted(), "Mary /Jones/");
    }

    #[test]
    fn visitor_reaches_nested_pointers() {
        let mut citation = Citation::WithSource(SourceCitation {
            source: Pointer::pending("@S1@", 4),
            notes: vec![NoteStructure::Reference {
                note: Pointer::pending("@N1@", 5),
                custom_facts: Vec::new(),
            }],
            ..SourceCitation::default()
        });

        let mut seen = Vec::new();
        citation.visit_pointers(&mut |kind, pointer| {
            seen.push((kind, pointer.xref.to_string()));
        });
        assert_eq!(
            seen,
            vec![
                (RecordKind::Source, "@S1@".to_string()),
                (RecordKind::Note, "@N1@".to_string()),
            ]
        );
    }

    #[test]
    fn visitor_reaches_ordinance_family_and_name_variations() {
        let mut ordinance = LdsIndividualOrdinance {
            kind: LdsOrdinanceType::ChildSealing,
            value: None,
            detail: LdsOrdinanceDetail {
                notes: vec![NoteStructure::Reference {
                    note: Pointer::pending("@N2@", 3),
                    custom_facts: Vec::new(),
                }],
                ..LdsOrdinanceDetail::default()
            },
            family: Some(FamilyChild {
                family: Pointer::pending("@F1@", 4),
                ..FamilyChild::default()
            }),
        };
        let mut seen = Vec::new();
        ordinance.visit_pointers(&mut |kind, pointer| {
            seen.push((kind, pointer.xref.to_string()));
        });
        assert_eq!(
            seen,
            vec![
                (RecordKind::Note, "@N2@".to_string()),
                (RecordKind::Family, "@F1@".to_string()),
            ]
        );

        let mut name = PersonalName {
            romanized: vec![PersonalNameVariation {
                citations: vec![Citation::WithSource(SourceCitation {
                    source: Pointer::pending("@S3@", 7),
                    ..SourceCitation::default()
                })],
                ..PersonalNameVariation::default()
            }],
            ..PersonalName::default()
        };
        let mut count = 0;
        name.visit_pointers(&mut |kind, _| {
            assert_eq!(kind, RecordKind::Source);
            count += 1;
        });
        assert_eq!(count, 1);
    }
}
