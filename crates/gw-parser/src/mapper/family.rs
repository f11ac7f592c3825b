use gw_core::model::{
    EventDetail, Family, FamilyEvent, FamilyEventType, LdsSpouseSealing, Vocabulary,
};
use gw_core::{NodeId, RecordKind, Xref};
use tracing::trace;

use super::Mapper;

impl Mapper<'_> {
    pub(super) fn family(&mut self, xref: Xref, root: NodeId) {
        let mut family = match self.gedcom.families.remove(&xref) {
            Some(existing) => {
                self.duplicate_record(RecordKind::Family, &xref, root);
                existing
            }
            None => Family::new(xref.clone()),
        };

        let mut facts = std::mem::take(&mut family.custom_facts);
        for &child in self.children(root) {
            let tag = self.node(child).tag.as_str();
            match tag {
                "HUSB" => self.single_pointer(&mut family.husband, child, &mut facts),
                "WIFE" => self.single_pointer(&mut family.wife, child, &mut facts),
                "CHIL" => self.push_pointer(&mut family.children, child, &mut facts),
                "NCHI" => self.single_text(&mut family.child_count, child, &mut facts),
                "SUBM" => self.push_pointer(&mut family.submitters, child, &mut facts),
                "RESN" => self.single_enumerated(&mut family.restriction, child, &mut facts),
                "REFN" => family.user_references.push(self.user_reference(child)),
                "RIN" => self.single_text(&mut family.record_id, child, &mut facts),
                "CHAN" => self.keep_first(&mut family.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                "NOTE" => family.notes.push(self.note_structure(child)),
                "SOUR" => family.citations.push(self.citation(child)),
                "OBJE" => family.multimedia.push(self.multimedia_link(child)),
                "SLGS" => family.lds_sealings.push(self.lds_spouse_sealing(child)),
                _ => match FamilyEventType::from_gedcom(tag) {
                    Some(kind) => family.events.push(self.family_event(kind, child)),
                    None => self.custom(child, &mut facts),
                },
            }
        }
        family.custom_facts = facts;

        trace!(xref = %xref, children = family.children.len(), "family");
        self.gedcom.families.insert(xref, family);
    }

    fn lds_spouse_sealing(&mut self, id: NodeId) -> LdsSpouseSealing {
        let mut sealing = LdsSpouseSealing {
            value: self.node(id).value.clone(),
            ..LdsSpouseSealing::default()
        };
        for &child in self.children(id) {
            if !self.lds_ordinance_field(&mut sealing.detail, child) {
                let mut facts = std::mem::take(&mut sealing.detail.custom_facts);
                self.custom(child, &mut facts);
                sealing.detail.custom_facts = facts;
            }
        }
        sealing
    }

    fn family_event(&mut self, kind: FamilyEventType, id: NodeId) -> FamilyEvent {
        let mut event = FamilyEvent {
            kind,
            value: self.node(id).value.clone(),
            husband_age: None,
            wife_age: None,
            detail: EventDetail::default(),
        };
        for &child in self.children(id) {
            if self.event_detail_field(&mut event.detail, child) {
                continue;
            }
            let mut facts = std::mem::take(&mut event.detail.custom_facts);
            let spouse_age = match self.node(child).tag.as_str() {
                "HUSB" => Some(&mut event.husband_age),
                "WIFE" => Some(&mut event.wife_age),
                _ => None,
            };
            match spouse_age {
                Some(slot) => {
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "AGE" => self.single_text(slot, grandchild, &mut facts),
                            _ => self.custom(grandchild, &mut facts),
                        }
                    }
                }
                None => self.custom(child, &mut facts),
            }
            event.detail.custom_facts = facts;
        }
        event
    }
}
