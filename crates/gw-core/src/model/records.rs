//! Level-0 records.

use serde::{Deserialize, Serialize};

use super::enums::{
    Enumerated, IndividualAttributeType, IndividualEventType, Restriction, Sex,
};
use super::structures::{
    Association, ChangeDate, Citation, Contact, FamilyChild, FamilyEvent, FamilySpouse,
    FileReference, IndividualAttribute, IndividualEvent, LdsIndividualOrdinance, LdsSpouseSealing,
    MultimediaLink, NoteStructure, PersonalName, RepositoryCitation, SourceData, UserReference,
};
use super::VisitPointers;
use crate::custom::CustomFact;
use crate::xref::{Pointer, RecordKind, Xref};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Corporation {
    pub name: String,
    pub contact: Contact,
}

/// `HEAD.SOUR.DATA`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HeaderSourceData {
    pub name: String,
    pub publication_date: Option<String>,
    pub copyright: Option<String>,
}

/// `HEAD.SOUR`: the program that wrote the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SourceSystem {
    pub system_id: String,
    pub version: Option<String>,
    pub product_name: Option<String>,
    pub corporation: Option<Corporation>,
    pub data: Option<HeaderSourceData>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GedcomVersion {
    pub version: Option<String>,
    pub form: Option<String>,
}

/// `HEAD.CHAR` as declared. The decoder acts on it before mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CharacterSet {
    pub name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Header {
    pub source_system: Option<SourceSystem>,
    pub destination: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub submitter: Option<Pointer>,
    pub submission: Option<Pointer>,
    pub file_name: Option<String>,
    pub copyright: Option<String>,
    pub gedcom_version: Option<GedcomVersion>,
    pub character_set: Option<CharacterSet>,
    pub language: Option<String>,
    pub place_form: Option<String>,
    pub note: Option<String>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Individual {
    pub xref: Xref,
    pub names: Vec<PersonalName>,
    pub sex: Option<Enumerated<Sex>>,
    pub restriction: Option<Enumerated<Restriction>>,
    pub events: Vec<IndividualEvent>,
    pub attributes: Vec<IndividualAttribute>,
    pub lds_ordinances: Vec<LdsIndividualOrdinance>,
    /// `FAMC`: families this individual is a child in.
    pub child_of_families: Vec<FamilyChild>,
    /// `FAMS`: families this individual is a spouse in.
    pub spouse_of_families: Vec<FamilySpouse>,
    pub submitters: Vec<Pointer>,
    pub associations: Vec<Association>,
    pub aliases: Vec<Pointer>,
    pub ancestor_interest: Vec<Pointer>,
    pub descendant_interest: Vec<Pointer>,
    pub permanent_record_number: Option<String>,
    pub ancestral_file_number: Option<String>,
    pub user_references: Vec<UserReference>,
    pub record_id: Option<String>,
    pub change_date: Option<ChangeDate>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub multimedia: Vec<MultimediaLink>,
    pub custom_facts: Vec<CustomFact>,
}

impl Individual {
    #[must_use]
    pub fn new(xref: impl Into<Xref>) -> Self {
        Self {
            xref: xref.into(),
            ..Self::default()
        }
    }

    /// Every name, formatted, joined with ` aka `.
    #[must_use]
    pub fn formatted_name(&self) -> String {
        self.names
            .iter()
            .map(PersonalName::formatted)
            .collect::<Vec<_>>()
            .join(" aka ")
    }

    pub fn events_of_type(
        &self,
        kind: IndividualEventType,
    ) -> impl Iterator<Item = &IndividualEvent> + '_ {
        self.events.iter().filter(move |event| event.kind == kind)
    }

    pub fn attributes_of_type(
        &self,
        kind: IndividualAttributeType,
    ) -> impl Iterator<Item = &IndividualAttribute> + '_ {
        self.attributes
            .iter()
            .filter(move |attribute| attribute.kind == kind)
    }

    #[must_use]
    pub fn sex(&self) -> Option<Sex> {
        self.sex.as_ref().and_then(Enumerated::known)
    }

    #[must_use]
    pub fn is_child_of(&self, family: &str) -> bool {
        self.child_of_families
            .iter()
            .any(|link| link.family.points_to(family))
    }

    #[must_use]
    pub fn is_spouse_in(&self, family: &str) -> bool {
        self.spouse_of_families
            .iter()
            .any(|link| link.family.points_to(family))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Family {
    pub xref: Xref,
    pub restriction: Option<Enumerated<Restriction>>,
    pub events: Vec<FamilyEvent>,
    pub lds_sealings: Vec<LdsSpouseSealing>,
    pub husband: Option<Pointer>,
    pub wife: Option<Pointer>,
    pub children: Vec<Pointer>,
    pub child_count: Option<String>,
    pub submitters: Vec<Pointer>,
    pub user_references: Vec<UserReference>,
    pub record_id: Option<String>,
    pub change_date: Option<ChangeDate>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub multimedia: Vec<MultimediaLink>,
    pub custom_facts: Vec<CustomFact>,
}

impl Family {
    #[must_use]
    pub fn new(xref: impl Into<Xref>) -> Self {
        Self {
            xref: xref.into(),
            ..Self::default()
        }
    }

    /// Husband then wife, whichever are present.
    pub fn spouses(&self) -> impl Iterator<Item = &Pointer> + '_ {
        self.husband.iter().chain(self.wife.iter())
    }

    #[must_use]
    pub fn has_spouse(&self, individual: &str) -> bool {
        self.spouses().any(|pointer| pointer.points_to(individual))
    }

    #[must_use]
    pub fn has_child(&self, individual: &str) -> bool {
        self.children
            .iter()
            .any(|pointer| pointer.points_to(individual))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Source {
    pub xref: Xref,
    pub data: Option<SourceData>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub abbreviation: Option<String>,
    pub publication: Option<String>,
    pub text: Option<String>,
    pub repositories: Vec<RepositoryCitation>,
    pub user_references: Vec<UserReference>,
    pub record_id: Option<String>,
    pub change_date: Option<ChangeDate>,
    pub notes: Vec<NoteStructure>,
    pub multimedia: Vec<MultimediaLink>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Repository {
    pub xref: Xref,
    pub name: Option<String>,
    pub contact: Contact,
    pub notes: Vec<NoteStructure>,
    pub user_references: Vec<UserReference>,
    pub record_id: Option<String>,
    pub change_date: Option<ChangeDate>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Multimedia {
    pub xref: Xref,
    pub files: Vec<FileReference>,
    /// 5.5 style `FORM` directly on the record.
    pub format: Option<String>,
    pub title: Option<String>,
    pub blob: Option<String>,
    /// `OBJE` pointer chaining a split 5.5 blob.
    pub continued_object: Option<Pointer>,
    pub user_references: Vec<UserReference>,
    pub record_id: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub citations: Vec<Citation>,
    pub change_date: Option<ChangeDate>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NoteRecord {
    pub xref: Xref,
    pub text: String,
    pub citations: Vec<Citation>,
    pub user_references: Vec<UserReference>,
    pub record_id: Option<String>,
    pub change_date: Option<ChangeDate>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Submitter {
    pub xref: Xref,
    pub name: Option<String>,
    pub contact: Contact,
    pub multimedia: Vec<MultimediaLink>,
    pub languages: Vec<String>,
    pub registered_rfn: Option<String>,
    pub record_id: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub change_date: Option<ChangeDate>,
    pub custom_facts: Vec<CustomFact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Submission {
    pub xref: Xref,
    pub submitter: Option<Pointer>,
    pub family_file: Option<String>,
    pub temple: Option<String>,
    pub ancestor_generations: Option<String>,
    pub descendant_generations: Option<String>,
    pub ordinance_process_flag: Option<String>,
    pub record_id: Option<String>,
    pub notes: Vec<NoteStructure>,
    pub change_date: Option<ChangeDate>,
    pub custom_facts: Vec<CustomFact>,
}

/// `TRLR`. Carries nothing but where it was seen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Trailer {
    pub line: usize,
}

fn visit_pointer_list(
    kind: RecordKind,
    pointers: &mut [Pointer],
    visit: &mut dyn FnMut(RecordKind, &mut Pointer),
) {
    for pointer in pointers {
        visit(kind, pointer);
    }
}

fn visit_optional(
    kind: RecordKind,
    pointer: &mut Option<Pointer>,
    visit: &mut dyn FnMut(RecordKind, &mut Pointer),
) {
    if let Some(pointer) = pointer {
        visit(kind, pointer);
    }
}

impl VisitPointers for Header {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        visit_optional(RecordKind::Submitter, &mut self.submitter, visit);
        visit_optional(RecordKind::Submission, &mut self.submission, visit);
    }
}

impl VisitPointers for Individual {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.names.visit_pointers(visit);
        self.events.visit_pointers(visit);
        self.attributes.visit_pointers(visit);
        self.lds_ordinances.visit_pointers(visit);
        self.child_of_families.visit_pointers(visit);
        self.spouse_of_families.visit_pointers(visit);
        visit_pointer_list(RecordKind::Submitter, &mut self.submitters, visit);
        self.associations.visit_pointers(visit);
        visit_pointer_list(RecordKind::Individual, &mut self.aliases, visit);
        visit_pointer_list(RecordKind::Submitter, &mut self.ancestor_interest, visit);
        visit_pointer_list(RecordKind::Submitter, &mut self.descendant_interest, visit);
        self.change_date.visit_pointers(visit);
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
        self.multimedia.visit_pointers(visit);
    }
}

impl VisitPointers for Family {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.events.visit_pointers(visit);
        self.lds_sealings.visit_pointers(visit);
        visit_optional(RecordKind::Individual, &mut self.husband, visit);
        visit_optional(RecordKind::Individual, &mut self.wife, visit);
        visit_pointer_list(RecordKind::Individual, &mut self.children, visit);
        visit_pointer_list(RecordKind::Submitter, &mut self.submitters, visit);
        self.change_date.visit_pointers(visit);
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
        self.multimedia.visit_pointers(visit);
    }
}

impl VisitPointers for Source {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.data.visit_pointers(visit);
        self.repositories.visit_pointers(visit);
        self.change_date.visit_pointers(visit);
        self.notes.visit_pointers(visit);
        self.multimedia.visit_pointers(visit);
    }
}

impl VisitPointers for Repository {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.notes.visit_pointers(visit);
        self.change_date.visit_pointers(visit);
    }
}

impl VisitPointers for Multimedia {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        visit_optional(RecordKind::Multimedia, &mut self.continued_object, visit);
        self.notes.visit_pointers(visit);
        self.citations.visit_pointers(visit);
        self.change_date.visit_pointers(visit);
    }
}

impl VisitPointers for NoteRecord {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.citations.visit_pointers(visit);
        self.change_date.visit_pointers(visit);
    }
}

impl VisitPointers for Submitter {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        self.multimedia.visit_pointers(visit);
        self.notes.visit_pointers(visit);
        self.change_date.visit_pointers(visit);
    }
}

impl VisitPointers for Submission {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        visit_optional(RecordKind::Submitter, &mut self.submitter, visit);
        self.notes.visit_pointers(visit);
        self.change_date.visit_pointers(visit);
    }
}
