//! Typed record graph produced by the tag mapper.

mod enums;
mod records;
mod structures;

pub use enums::{
    AdoptedBy, Certainty, ChildLinkageStatus, Enumerated, FamilyEventType,
    IndividualAttributeType, IndividualEventType, LdsOrdinanceType, Pedigree, Restriction, Sex,
    Vocabulary,
};
pub use records::{
    CharacterSet, Corporation, Family, GedcomVersion, Header, HeaderSourceData, Individual,
    Multimedia, NoteRecord, Repository, Source, SourceSystem, Submission, Submitter, Trailer,
};
pub use structures::{
    Address, Association, CallNumber, ChangeDate, Citation, CitationData, Contact,
    EventDetail, FamilyChild, FamilyEvent, FamilySpouse, FileReference, IndividualAttribute,
    IndividualEvent, InlineCitation, LdsIndividualOrdinance, LdsOrdinanceDetail, LdsSpouseSealing,
    MultimediaLink, NameVariation, NoteStructure, PersonalName, PersonalNameVariation, Place,
    RecordedEvent, RepositoryCitation, SourceCitation, SourceData, UserReference,
};

use crate::xref::{Pointer, RecordKind};

/// Walks every pointer field reachable from a value, reporting the kind of record
/// each one targets. The resolver uses this to check and mark links.
pub trait VisitPointers {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer));
}

impl<T: VisitPointers> VisitPointers for Vec<T> {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        for item in self {
            item.visit_pointers(visit);
        }
    }
}

impl<T: VisitPointers> VisitPointers for Option<T> {
    fn visit_pointers(&mut self, visit: &mut dyn FnMut(RecordKind, &mut Pointer)) {
        if let Some(item) = self {
            item.visit_pointers(visit);
        }
    }
}
