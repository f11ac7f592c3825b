use gw_core::model::{
    Association, EventDetail, FamilyChild, FamilySpouse, Individual, IndividualAttribute,
    IndividualAttributeType, IndividualEvent, IndividualEventType, LdsIndividualOrdinance,
    LdsOrdinanceDetail, LdsOrdinanceType, PersonalName, PersonalNameVariation, Vocabulary,
};
use gw_core::{CustomFact, NodeId, RecordKind, Xref};
use tracing::trace;

use super::Mapper;

impl Mapper<'_> {
    pub(super) fn individual(&mut self, xref: Xref, root: NodeId) {
        let mut person = match self.gedcom.individuals.remove(&xref) {
            Some(existing) => {
                self.duplicate_record(RecordKind::Individual, &xref, root);
                existing
            }
            None => Individual::new(xref.clone()),
        };

        let mut facts = std::mem::take(&mut person.custom_facts);
        for &child in self.children(root) {
            let tag = self.node(child).tag.as_str();
            match tag {
                "NAME" => person.names.push(self.personal_name(child)),
                "SEX" => self.single_enumerated(&mut person.sex, child, &mut facts),
                "RESN" => self.single_enumerated(&mut person.restriction, child, &mut facts),
                "FAMC" => {
                    if let Some(link) = self.family_child(child, &mut facts) {
                        person.child_of_families.push(link);
                    }
                }
                "FAMS" => {
                    if let Some(link) = self.family_spouse(child, &mut facts) {
                        person.spouse_of_families.push(link);
                    }
                }
                "ASSO" => {
                    if let Some(association) = self.association(child, &mut facts) {
                        person.associations.push(association);
                    }
                }
                "SUBM" => self.push_pointer(&mut person.submitters, child, &mut facts),
                "ALIA" => self.push_pointer(&mut person.aliases, child, &mut facts),
                "ANCI" => self.push_pointer(&mut person.ancestor_interest, child, &mut facts),
                "DESI" => self.push_pointer(&mut person.descendant_interest, child, &mut facts),
                "RFN" => self.single_text(&mut person.permanent_record_number, child, &mut facts),
                "AFN" => self.single_text(&mut person.ancestral_file_number, child, &mut facts),
                "REFN" => person.user_references.push(self.user_reference(child)),
                "RIN" => self.single_text(&mut person.record_id, child, &mut facts),
                "CHAN" => self.keep_first(&mut person.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                "NOTE" => person.notes.push(self.note_structure(child)),
                "SOUR" => person.citations.push(self.citation(child)),
                "OBJE" => person.multimedia.push(self.multimedia_link(child)),
                _ => {
                    if let Some(kind) = IndividualEventType::from_gedcom(tag) {
                        person.events.push(self.individual_event(kind, child));
                    } else if let Some(kind) = IndividualAttributeType::from_gedcom(tag) {
                        person.attributes.push(self.individual_attribute(kind, child));
                    } else if let Some(kind) = LdsOrdinanceType::from_gedcom(tag) {
                        person.lds_ordinances.push(self.lds_individual_ordinance(kind, child));
                    } else {
                        self.custom(child, &mut facts);
                    }
                }
            }
        }
        person.custom_facts = facts;

        trace!(xref = %xref, names = person.names.len(), events = person.events.len(), "individual");
        self.gedcom.individuals.insert(xref, person);
    }

    fn personal_name(&mut self, id: NodeId) -> PersonalName {
        let mut name = PersonalName {
            value: self.node(id).value.clone().unwrap_or_default(),
            ..PersonalName::default()
        };
        let facts = &mut name.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "TYPE" => self.single_text(&mut name.kind, child, facts),
                "NPFX" => self.single_text(&mut name.prefix, child, facts),
                "GIVN" => self.single_text(&mut name.given, child, facts),
                "NICK" => self.single_text(&mut name.nickname, child, facts),
                "SPFX" => self.single_text(&mut name.surname_prefix, child, facts),
                "SURN" => self.single_text(&mut name.surname, child, facts),
                "NSFX" => self.single_text(&mut name.suffix, child, facts),
                "NOTE" => name.notes.push(self.note_structure(child)),
                "SOUR" => name.citations.push(self.citation(child)),
                "ROMN" => name.romanized.push(self.personal_name_variation(child)),
                "FONE" => name.phonetic.push(self.personal_name_variation(child)),
                _ => self.custom(child, facts),
            }
        }
        name
    }

    fn personal_name_variation(&mut self, id: NodeId) -> PersonalNameVariation {
        let mut variation = PersonalNameVariation {
            value: self.node(id).value.clone().unwrap_or_default(),
            ..PersonalNameVariation::default()
        };
        let facts = &mut variation.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "TYPE" => self.single_text(&mut variation.kind, child, facts),
                "NPFX" => self.single_text(&mut variation.prefix, child, facts),
                "GIVN" => self.single_text(&mut variation.given, child, facts),
                "NICK" => self.single_text(&mut variation.nickname, child, facts),
                "SPFX" => self.single_text(&mut variation.surname_prefix, child, facts),
                "SURN" => self.single_text(&mut variation.surname, child, facts),
                "NSFX" => self.single_text(&mut variation.suffix, child, facts),
                "NOTE" => variation.notes.push(self.note_structure(child)),
                "SOUR" => variation.citations.push(self.citation(child)),
                _ => self.custom(child, facts),
            }
        }
        variation
    }

    fn lds_individual_ordinance(&mut self, kind: LdsOrdinanceType, id: NodeId) -> LdsIndividualOrdinance {
        let mut ordinance = LdsIndividualOrdinance {
            kind,
            value: self.node(id).value.clone(),
            detail: LdsOrdinanceDetail::default(),
            family: None,
        };
        for &child in self.children(id) {
            if self.lds_ordinance_field(&mut ordinance.detail, child) {
                continue;
            }
            let mut facts = std::mem::take(&mut ordinance.detail.custom_facts);
            if self.node(child).tag == "FAMC" {
                if ordinance.family.is_some() {
                    self.duplicate_tag(child, "FAMC");
                    facts.push(CustomFact::from_tree(self.tree, child));
                } else {
                    ordinance.family = self.family_child(child, &mut facts);
                }
            } else {
                self.custom(child, &mut facts);
            }
            ordinance.detail.custom_facts = facts;
        }
        ordinance
    }

    fn individual_event(&mut self, kind: IndividualEventType, id: NodeId) -> IndividualEvent {
        let mut event = IndividualEvent {
            kind,
            value: self.node(id).value.clone(),
            detail: EventDetail::default(),
            family: None,
            adopted_by: None,
        };
        let takes_family = matches!(
            kind,
            IndividualEventType::Birth
                | IndividualEventType::Christening
                | IndividualEventType::Adoption
        );
        for &child in self.children(id) {
            if self.event_detail_field(&mut event.detail, child) {
                continue;
            }
            let mut facts = std::mem::take(&mut event.detail.custom_facts);
            if takes_family && self.node(child).tag == "FAMC" {
                if event.family.is_some() {
                    self.duplicate_tag(child, "FAMC");
                    facts.push(CustomFact::from_tree(self.tree, child));
                } else if let Some(family) = self.link_target(child, &mut facts) {
                    event.family = Some(family);
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "ADOP" if kind == IndividualEventType::Adoption => {
                                self.single_enumerated(&mut event.adopted_by, grandchild, &mut facts);
                            }
                            _ => self.custom(grandchild, &mut facts),
                        }
                    }
                }
            } else {
                self.custom(child, &mut facts);
            }
            event.detail.custom_facts = facts;
        }
        event
    }

    fn individual_attribute(&mut self, kind: IndividualAttributeType, id: NodeId) -> IndividualAttribute {
        let mut attribute = IndividualAttribute {
            kind,
            value: self.node(id).value.clone(),
            detail: EventDetail::default(),
        };
        for &child in self.children(id) {
            if !self.event_detail_field(&mut attribute.detail, child) {
                let mut facts = std::mem::take(&mut attribute.detail.custom_facts);
                self.custom(child, &mut facts);
                attribute.detail.custom_facts = facts;
            }
        }
        attribute
    }

    fn family_child(&mut self, id: NodeId, person_facts: &mut Vec<CustomFact>) -> Option<FamilyChild> {
        let mut link = FamilyChild {
            family: self.link_target(id, person_facts)?,
            ..FamilyChild::default()
        };
        let facts = &mut link.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "PEDI" => self.single_enumerated(&mut link.pedigree, child, facts),
                "STAT" => self.single_enumerated(&mut link.status, child, facts),
                "NOTE" => link.notes.push(self.note_structure(child)),
                _ => self.custom(child, facts),
            }
        }
        Some(link)
    }

    fn family_spouse(&mut self, id: NodeId, person_facts: &mut Vec<CustomFact>) -> Option<FamilySpouse> {
        let mut link = FamilySpouse {
            family: self.link_target(id, person_facts)?,
            ..FamilySpouse::default()
        };
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "NOTE" => link.notes.push(self.note_structure(child)),
                _ => self.custom(child, &mut link.custom_facts),
            }
        }
        Some(link)
    }

    fn association(&mut self, id: NodeId, person_facts: &mut Vec<CustomFact>) -> Option<Association> {
        let mut association = Association {
            individual: self.link_target(id, person_facts)?,
            ..Association::default()
        };
        let facts = &mut association.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "RELA" => self.single_text(&mut association.relation, child, facts),
                "NOTE" => association.notes.push(self.note_structure(child)),
                "SOUR" => association.citations.push(self.citation(child)),
                _ => self.custom(child, facts),
            }
        }
        Some(association)
    }
}
