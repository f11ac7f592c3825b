use gw_core::model::{
    Address, ChangeDate, Citation, CitationData, Contact, EventDetail, FileReference,
    InlineCitation, LdsOrdinanceDetail, MultimediaLink, NameVariation, NoteStructure, Place,
    SourceCitation, UserReference,
};
use gw_core::{CustomFact, NodeId, Pointer, Xref};

use super::Mapper;

impl Mapper<'_> {
    pub(super) fn note_structure(&mut self, id: NodeId) -> NoteStructure {
        let node = self.node(id);
        let mut custom_facts = Vec::new();
        if let Some(value) = node.value.as_deref().map(str::trim)
            && Xref::looks_like_pointer(value)
        {
            for &child in self.children(id) {
                self.custom(child, &mut custom_facts);
            }
            return NoteStructure::Reference {
                note: Pointer::pending(value, node.line),
                custom_facts,
            };
        }

        let mut citations = Vec::new();
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "SOUR" => citations.push(self.citation(child)),
                _ => self.custom(child, &mut custom_facts),
            }
        }
        NoteStructure::Inline {
            text: node.value.clone().unwrap_or_default(),
            citations,
            custom_facts,
        }
    }

    pub(super) fn citation(&mut self, id: NodeId) -> Citation {
        let node = self.node(id);
        match node.value.as_deref().map(str::trim) {
            Some(value) if Xref::looks_like_pointer(value) => {
                let mut citation = SourceCitation {
                    source: Pointer::pending(value, node.line),
                    ..SourceCitation::default()
                };
                let facts = &mut citation.custom_facts;
                for &child in self.children(id) {
                    match self.node(child).tag.as_str() {
                        "PAGE" => self.single_text(&mut citation.page, child, facts),
                        "EVEN" => {
                            let mut event_facts = Vec::new();
                            for &grandchild in self.children(child) {
                                match self.node(grandchild).tag.as_str() {
                                    "ROLE" => self.single_text(
                                        &mut citation.role,
                                        grandchild,
                                        &mut event_facts,
                                    ),
                                    _ => self.custom(grandchild, &mut event_facts),
                                }
                            }
                            facts.extend(event_facts);
                            let cited = self.node(child).value.clone().unwrap_or_default();
                            if citation.event_cited.is_some() {
                                self.duplicate_tag(child, "EVEN");
                                facts.push(CustomFact::from_tree(self.tree, child));
                            } else {
                                citation.event_cited = Some(cited);
                            }
                        }
                        "DATA" => citation.data.push(self.citation_data(child)),
                        "QUAY" => self.single_enumerated(&mut citation.certainty, child, facts),
                        "NOTE" => citation.notes.push(self.note_structure(child)),
                        "OBJE" => citation.multimedia.push(self.multimedia_link(child)),
                        _ => self.custom(child, facts),
                    }
                }
                Citation::WithSource(citation)
            }
            _ => {
                let mut citation = InlineCitation {
                    description: node.value.clone().unwrap_or_default(),
                    ..InlineCitation::default()
                };
                for &child in self.children(id) {
                    match self.node(child).tag.as_str() {
                        "TEXT" => {
                            let text = self.scalar(child, &mut citation.custom_facts);
                            citation.text.push(text);
                        }
                        "NOTE" => citation.notes.push(self.note_structure(child)),
                        _ => self.custom(child, &mut citation.custom_facts),
                    }
                }
                Citation::WithoutSource(citation)
            }
        }
    }

    fn citation_data(&mut self, id: NodeId) -> CitationData {
        let mut data = CitationData::default();
        let facts = &mut data.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "DATE" => self.single_text(&mut data.entry_date, child, facts),
                "TEXT" => {
                    let text = self.scalar(child, facts);
                    data.text.push(text);
                }
                _ => self.custom(child, facts),
            }
        }
        data
    }

    pub(super) fn multimedia_link(&mut self, id: NodeId) -> MultimediaLink {
        let node = self.node(id);
        if let Some(value) = node.value.as_deref().map(str::trim)
            && Xref::looks_like_pointer(value)
        {
            let mut custom_facts = Vec::new();
            for &child in self.children(id) {
                self.custom(child, &mut custom_facts);
            }
            return MultimediaLink::Reference {
                multimedia: Pointer::pending(value, node.line),
                custom_facts,
            };
        }

        let mut files = Vec::new();
        let mut format = None;
        let mut title = None;
        let mut notes = Vec::new();
        let mut custom_facts = Vec::new();
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "FILE" => files.push(self.file_reference(child)),
                "FORM" => self.single_text(&mut format, child, &mut custom_facts),
                "TITL" => self.single_text(&mut title, child, &mut custom_facts),
                "NOTE" => notes.push(self.note_structure(child)),
                _ => self.custom(child, &mut custom_facts),
            }
        }
        MultimediaLink::Inline {
            files,
            format,
            title,
            notes,
            custom_facts,
        }
    }

    pub(super) fn file_reference(&mut self, id: NodeId) -> FileReference {
        let mut file = FileReference {
            path: self.node(id).value.clone().unwrap_or_default(),
            ..FileReference::default()
        };
        let facts = &mut file.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "FORM" => {
                    let mut form_facts = Vec::new();
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "TYPE" | "MEDI" => {
                                self.single_text(&mut file.media_type, grandchild, &mut form_facts);
                            }
                            _ => self.custom(grandchild, &mut form_facts),
                        }
                    }
                    facts.extend(form_facts);
                    let form = self.node(child).value.clone().unwrap_or_default();
                    if file.format.is_some() {
                        self.duplicate_tag(child, "FORM");
                        facts.push(CustomFact::from_tree(self.tree, child));
                    } else {
                        file.format = Some(form);
                    }
                }
                "TITL" => self.single_text(&mut file.title, child, facts),
                _ => self.custom(child, facts),
            }
        }
        file
    }

    pub(super) fn place(&mut self, id: NodeId) -> Place {
        let mut place = Place {
            name: self.node(id).value.clone().unwrap_or_default(),
            ..Place::default()
        };
        let facts = &mut place.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "FORM" => self.single_text(&mut place.form, child, facts),
                "MAP" => {
                    for &coordinate in self.children(child) {
                        match self.node(coordinate).tag.as_str() {
                            "LATI" => self.single_text(&mut place.latitude, coordinate, facts),
                            "LONG" => self.single_text(&mut place.longitude, coordinate, facts),
                            _ => self.custom(coordinate, facts),
                        }
                    }
                }
                "NOTE" => place.notes.push(self.note_structure(child)),
                "SOUR" => place.citations.push(self.citation(child)),
                "ROMN" => place.romanized.push(self.name_variation(child)),
                "FONE" => place.phonetic.push(self.name_variation(child)),
                _ => self.custom(child, facts),
            }
        }
        place
    }

    fn name_variation(&mut self, id: NodeId) -> NameVariation {
        let mut variation = NameVariation {
            value: self.node(id).value.clone().unwrap_or_default(),
            ..NameVariation::default()
        };
        let facts = &mut variation.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "TYPE" => self.single_text(&mut variation.kind, child, facts),
                _ => self.custom(child, facts),
            }
        }
        variation
    }

    /// Fills the fields every LDS ordinance shares. Returns false for any other tag.
    pub(super) fn lds_ordinance_field(&mut self, detail: &mut LdsOrdinanceDetail, id: NodeId) -> bool {
        let facts = &mut detail.custom_facts;
        match self.node(id).tag.as_str() {
            "DATE" => self.single_text(&mut detail.date, id, facts),
            "PLAC" => self.single_text(&mut detail.place, id, facts),
            "STAT" => self.single_text(&mut detail.status, id, facts),
            "TEMP" => self.single_text(&mut detail.temple, id, facts),
            "NOTE" => detail.notes.push(self.note_structure(id)),
            "SOUR" => detail.citations.push(self.citation(id)),
            _ => return false,
        }
        true
    }

    fn address(&mut self, id: NodeId) -> Address {
        let mut address = Address {
            text: self.node(id).value.clone(),
            ..Address::default()
        };
        let facts = &mut address.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "ADR1" => self.single_text(&mut address.line1, child, facts),
                "ADR2" => self.single_text(&mut address.line2, child, facts),
                "ADR3" => self.single_text(&mut address.line3, child, facts),
                "CITY" => self.single_text(&mut address.city, child, facts),
                "STAE" => self.single_text(&mut address.state, child, facts),
                "POST" => self.single_text(&mut address.postal_code, child, facts),
                "CTRY" => self.single_text(&mut address.country, child, facts),
                _ => self.custom(child, facts),
            }
        }
        address
    }

    /// Handles the address structure tags. Returns `false` for any other tag so the
    /// caller can try its own.
    pub(super) fn contact_field(
        &mut self,
        contact: &mut Contact,
        id: NodeId,
        custom_facts: &mut Vec<CustomFact>,
    ) -> bool {
        match self.node(id).tag.as_str() {
            "ADDR" => self.keep_first(&mut contact.address, id, custom_facts, |mapper, _| {
                mapper.address(id)
            }),
            "PHON" => {
                let phone = self.scalar(id, custom_facts);
                contact.phones.push(phone);
            }
            "EMAIL" => {
                let email = self.scalar(id, custom_facts);
                contact.emails.push(email);
            }
            "FAX" => {
                let fax = self.scalar(id, custom_facts);
                contact.faxes.push(fax);
            }
            "WWW" => {
                let website = self.scalar(id, custom_facts);
                contact.websites.push(website);
            }
            _ => return false,
        }
        true
    }

    /// Handles the tags every event and attribute shares. Returns `false` for any
    /// other tag.
    pub(super) fn event_detail_field(&mut self, detail: &mut EventDetail, id: NodeId) -> bool {
        let mut facts = std::mem::take(&mut detail.custom_facts);
        let handled = match self.node(id).tag.as_str() {
            "TYPE" => {
                self.single_text(&mut detail.kind, id, &mut facts);
                true
            }
            "DATE" => {
                self.single_text(&mut detail.date, id, &mut facts);
                true
            }
            "PLAC" => {
                self.keep_first(&mut detail.place, id, &mut facts, |mapper, _| mapper.place(id));
                true
            }
            "AGE" => {
                self.single_text(&mut detail.age, id, &mut facts);
                true
            }
            "AGNC" => {
                self.single_text(&mut detail.agency, id, &mut facts);
                true
            }
            "RELI" => {
                self.single_text(&mut detail.religion, id, &mut facts);
                true
            }
            "CAUS" => {
                self.single_text(&mut detail.cause, id, &mut facts);
                true
            }
            "RESN" => {
                self.single_enumerated(&mut detail.restriction, id, &mut facts);
                true
            }
            "NOTE" => {
                detail.notes.push(self.note_structure(id));
                true
            }
            "SOUR" => {
                detail.citations.push(self.citation(id));
                true
            }
            "OBJE" => {
                detail.multimedia.push(self.multimedia_link(id));
                true
            }
            _ => self.contact_field(&mut detail.contact, id, &mut facts),
        };
        detail.custom_facts = facts;
        handled
    }

    pub(super) fn change_date(&mut self, id: NodeId) -> ChangeDate {
        let mut change = ChangeDate::default();
        let facts = &mut change.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "DATE" => {
                    let mut date_facts = Vec::new();
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "TIME" => self.single_text(&mut change.time, grandchild, &mut date_facts),
                            _ => self.custom(grandchild, &mut date_facts),
                        }
                    }
                    facts.extend(date_facts);
                    if change.date.is_some() {
                        self.duplicate_tag(child, "DATE");
                        facts.push(CustomFact::from_tree(self.tree, child));
                    } else {
                        change.date = self.node(child).value.clone();
                    }
                }
                "NOTE" => change.notes.push(self.note_structure(child)),
                _ => self.custom(child, facts),
            }
        }
        change
    }

    pub(super) fn user_reference(&mut self, id: NodeId) -> UserReference {
        let mut reference = UserReference {
            reference: self.node(id).value.clone().unwrap_or_default(),
            ..UserReference::default()
        };
        let facts = &mut reference.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "TYPE" => self.single_text(&mut reference.kind, child, facts),
                _ => self.custom(child, facts),
            }
        }
        reference
    }
}
