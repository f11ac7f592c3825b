use gw_core::model::{
    CallNumber, Multimedia, NoteRecord, RecordedEvent, Repository, RepositoryCitation, Source,
    SourceData, Submission, Submitter,
};
use gw_core::{CustomFact, NodeId, RecordKind, Xref};

use super::Mapper;

impl Mapper<'_> {
    pub(super) fn source(&mut self, xref: Xref, root: NodeId) {
        let mut source = self
            .gedcom
            .sources
            .remove(&xref)
            .inspect(|_| self.duplicate_record(RecordKind::Source, &xref, root))
            .unwrap_or_else(|| Source {
                xref: xref.clone(),
                ..Source::default()
            });

        let mut facts = std::mem::take(&mut source.custom_facts);
        for &child in self.children(root) {
            match self.node(child).tag.as_str() {
                "DATA" => self.keep_first(&mut source.data, child, &mut facts, |mapper, _| {
                    mapper.source_data(child)
                }),
                "AUTH" => self.single_text(&mut source.author, child, &mut facts),
                "TITL" => self.single_text(&mut source.title, child, &mut facts),
                "ABBR" => self.single_text(&mut source.abbreviation, child, &mut facts),
                "PUBL" => self.single_text(&mut source.publication, child, &mut facts),
                "TEXT" => self.single_text(&mut source.text, child, &mut facts),
                "REPO" => {
                    if let Some(citation) = self.repository_citation(child, &mut facts) {
                        source.repositories.push(citation);
                    }
                }
                "REFN" => source.user_references.push(self.user_reference(child)),
                "RIN" => self.single_text(&mut source.record_id, child, &mut facts),
                "CHAN" => self.keep_first(&mut source.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                "NOTE" => source.notes.push(self.note_structure(child)),
                "OBJE" => source.multimedia.push(self.multimedia_link(child)),
                _ => self.custom(child, &mut facts),
            }
        }
        source.custom_facts = facts;
        self.gedcom.sources.insert(xref, source);
    }

    fn source_data(&mut self, id: NodeId) -> SourceData {
        let mut data = SourceData::default();
        let facts = &mut data.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "EVEN" => {
                    let mut event = RecordedEvent {
                        types: self.node(child).value.clone().unwrap_or_default(),
                        ..RecordedEvent::default()
                    };
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "DATE" => self.single_text(&mut event.date, grandchild, facts),
                            "PLAC" => self.single_text(&mut event.place, grandchild, facts),
                            _ => self.custom(grandchild, facts),
                        }
                    }
                    data.events.push(event);
                }
                "AGNC" => self.single_text(&mut data.agency, child, facts),
                "NOTE" => data.notes.push(self.note_structure(child)),
                _ => self.custom(child, facts),
            }
        }
        data
    }

    /// `REPO` under a source. An empty value is allowed; a value that is not a
    /// pointer keeps the whole structure as a custom fact on the source.
    fn repository_citation(
        &mut self,
        id: NodeId,
        source_facts: &mut Vec<CustomFact>,
    ) -> Option<RepositoryCitation> {
        let repository = match self.node(id).value {
            Some(_) => Some(self.link_target(id, source_facts)?),
            None => None,
        };
        let mut citation = RepositoryCitation {
            repository,
            ..RepositoryCitation::default()
        };
        let facts = &mut citation.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "CALN" => {
                    let mut call_number = CallNumber {
                        number: self.node(child).value.clone().unwrap_or_default(),
                        media_type: None,
                    };
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "MEDI" => self.single_text(&mut call_number.media_type, grandchild, facts),
                            _ => self.custom(grandchild, facts),
                        }
                    }
                    citation.call_numbers.push(call_number);
                }
                "NOTE" => citation.notes.push(self.note_structure(child)),
                _ => self.custom(child, facts),
            }
        }
        Some(citation)
    }

    pub(super) fn repository(&mut self, xref: Xref, root: NodeId) {
        let mut repository = self
            .gedcom
            .repositories
            .remove(&xref)
            .inspect(|_| self.duplicate_record(RecordKind::Repository, &xref, root))
            .unwrap_or_else(|| Repository {
                xref: xref.clone(),
                ..Repository::default()
            });

        let mut facts = std::mem::take(&mut repository.custom_facts);
        for &child in self.children(root) {
            if self.contact_field(&mut repository.contact, child, &mut facts) {
                continue;
            }
            match self.node(child).tag.as_str() {
                "NAME" => self.single_text(&mut repository.name, child, &mut facts),
                "NOTE" => repository.notes.push(self.note_structure(child)),
                "REFN" => repository.user_references.push(self.user_reference(child)),
                "RIN" => self.single_text(&mut repository.record_id, child, &mut facts),
                "CHAN" => self.keep_first(&mut repository.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                _ => self.custom(child, &mut facts),
            }
        }
        repository.custom_facts = facts;
        self.gedcom.repositories.insert(xref, repository);
    }

    pub(super) fn multimedia_record(&mut self, xref: Xref, root: NodeId) {
        let mut media = self
            .gedcom
            .multimedia
            .remove(&xref)
            .inspect(|_| self.duplicate_record(RecordKind::Multimedia, &xref, root))
            .unwrap_or_else(|| Multimedia {
                xref: xref.clone(),
                ..Multimedia::default()
            });

        let mut facts = std::mem::take(&mut media.custom_facts);
        for &child in self.children(root) {
            match self.node(child).tag.as_str() {
                "FILE" => media.files.push(self.file_reference(child)),
                "FORM" => self.single_text(&mut media.format, child, &mut facts),
                "TITL" => self.single_text(&mut media.title, child, &mut facts),
                "BLOB" => self.single_text(&mut media.blob, child, &mut facts),
                "OBJE" => self.single_pointer(&mut media.continued_object, child, &mut facts),
                "REFN" => media.user_references.push(self.user_reference(child)),
                "RIN" => self.single_text(&mut media.record_id, child, &mut facts),
                "NOTE" => media.notes.push(self.note_structure(child)),
                "SOUR" => media.citations.push(self.citation(child)),
                "CHAN" => self.keep_first(&mut media.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                _ => self.custom(child, &mut facts),
            }
        }
        media.custom_facts = facts;
        self.gedcom.multimedia.insert(xref, media);
    }

    pub(super) fn note_record(&mut self, xref: Xref, root: NodeId) {
        let mut note = self
            .gedcom
            .notes
            .remove(&xref)
            .inspect(|_| self.duplicate_record(RecordKind::Note, &xref, root))
            .unwrap_or_else(|| NoteRecord {
                xref: xref.clone(),
                ..NoteRecord::default()
            });
        if note.text.is_empty()
            && let Some(text) = &self.node(root).value
        {
            note.text.clone_from(text);
        }

        let mut facts = std::mem::take(&mut note.custom_facts);
        for &child in self.children(root) {
            match self.node(child).tag.as_str() {
                "SOUR" => note.citations.push(self.citation(child)),
                "REFN" => note.user_references.push(self.user_reference(child)),
                "RIN" => self.single_text(&mut note.record_id, child, &mut facts),
                "CHAN" => self.keep_first(&mut note.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                _ => self.custom(child, &mut facts),
            }
        }
        note.custom_facts = facts;
        self.gedcom.notes.insert(xref, note);
    }

    pub(super) fn submitter(&mut self, xref: Xref, root: NodeId) {
        let mut submitter = self
            .gedcom
            .submitters
            .remove(&xref)
            .inspect(|_| self.duplicate_record(RecordKind::Submitter, &xref, root))
            .unwrap_or_else(|| Submitter {
                xref: xref.clone(),
                ..Submitter::default()
            });

        let mut facts = std::mem::take(&mut submitter.custom_facts);
        for &child in self.children(root) {
            if self.contact_field(&mut submitter.contact, child, &mut facts) {
                continue;
            }
            match self.node(child).tag.as_str() {
                "NAME" => self.single_text(&mut submitter.name, child, &mut facts),
                "OBJE" => submitter.multimedia.push(self.multimedia_link(child)),
                "LANG" => {
                    let language = self.scalar(child, &mut facts);
                    submitter.languages.push(language);
                }
                "RFN" => self.single_text(&mut submitter.registered_rfn, child, &mut facts),
                "RIN" => self.single_text(&mut submitter.record_id, child, &mut facts),
                "NOTE" => submitter.notes.push(self.note_structure(child)),
                "CHAN" => self.keep_first(&mut submitter.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                _ => self.custom(child, &mut facts),
            }
        }
        submitter.custom_facts = facts;
        self.gedcom.submitters.insert(xref, submitter);
    }

    /// The single submission record. A second one under another xref is kept as
    /// a custom fact on the file.
    pub(super) fn submission(&mut self, xref: Xref, root: NodeId) {
        let mut submission = match self.gedcom.submission.take() {
            Some(existing) if existing.xref == xref => {
                self.duplicate_record(RecordKind::Submission, &xref, root);
                existing
            }
            Some(existing) => {
                self.gedcom.submission = Some(existing);
                self.duplicate_tag(root, "SUBN");
                self.gedcom
                    .custom_facts
                    .push(CustomFact::from_tree(self.tree, root));
                return;
            }
            None => Submission {
                xref,
                ..Submission::default()
            },
        };

        let mut facts = std::mem::take(&mut submission.custom_facts);
        for &child in self.children(root) {
            match self.node(child).tag.as_str() {
                "SUBM" => self.single_pointer(&mut submission.submitter, child, &mut facts),
                "FAMF" => self.single_text(&mut submission.family_file, child, &mut facts),
                "TEMP" => self.single_text(&mut submission.temple, child, &mut facts),
                "ANCE" => self.single_text(&mut submission.ancestor_generations, child, &mut facts),
                "DESC" => self.single_text(&mut submission.descendant_generations, child, &mut facts),
                "ORDI" => self.single_text(&mut submission.ordinance_process_flag, child, &mut facts),
                "RIN" => self.single_text(&mut submission.record_id, child, &mut facts),
                "NOTE" => submission.notes.push(self.note_structure(child)),
                "CHAN" => self.keep_first(&mut submission.change_date, child, &mut facts, |mapper, _| {
                    mapper.change_date(child)
                }),
                _ => self.custom(child, &mut facts),
            }
        }
        submission.custom_facts = facts;
        self.gedcom.submission = Some(submission);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::map;
    use gw_core::WarningCode;

    #[test]
    fn maps_source_with_repository_and_data() {
        let (gedcom, warnings) = map(concat!(
            "0 @S1@ SOUR\n",
            "1 DATA\n",
            "2 EVEN BIRT, DEAT\n",
            "3 DATE FROM 1850 TO 1900\n",
            "3 PLAC Cook County\n",
            "2 AGNC County clerk\n",
            "1 AUTH County clerk\n",
            "1 TITL Vital records\n",
            "2 CONC  of Cook County\n",
            "1 ABBR VR\n",
            "1 REPO @R1@\n",
            "2 CALN 929.3\n",
            "3 MEDI book\n",
            "1 REPO\n",
            "2 CALN microfilm 12\n",
            "0 @R1@ REPO\n",
            "1 NAME County Library\n",
            "1 ADDR 2 Elm St\n",
            "1 WWW example.org\n",
            "0 TRLR",
        ));
        assert!(warnings.is_empty(), "{warnings:?}");
        let source = gedcom.source("@S1@").expect("source");
        let data = source.data.as_ref().expect("data");
        assert_eq!(data.events[0].types, "BIRT, DEAT");
        assert_eq!(data.events[0].place.as_deref(), Some("Cook County"));
        assert_eq!(data.agency.as_deref(), Some("County clerk"));
        assert_eq!(source.title.as_deref(), Some("Vital records of Cook County"));
        assert_eq!(source.repositories.len(), 2);
        let first = &source.repositories[0];
        assert!(first.repository.as_ref().is_some_and(|p| p.points_to("@R1@")));
        assert_eq!(first.call_numbers[0].media_type.as_deref(), Some("book"));
        assert!(source.repositories[1].repository.is_none());

        let repository = gedcom.repository("@R1@").expect("repository");
        assert_eq!(repository.name.as_deref(), Some("County Library"));
        assert_eq!(repository.contact.websites, vec!["example.org".to_string()]);
    }

    #[test]
    fn maps_multimedia_note_and_submitter() {
        let (gedcom, warnings) = map(concat!(
            "0 @M1@ OBJE\n",
            "1 FILE scan.png\n",
            "2 FORM png\n",
            "1 TITL Scan\n",
            "0 @N1@ NOTE Long\n",
            "1 CONT note\n",
            "1 RIN 5\n",
            "0 @U1@ SUBM\n",
            "1 NAME Jane Doe\n",
            "1 LANG English\n",
            "1 LANG French\n",
            "1 EMAIL jane@example.org\n",
            "0 TRLR",
        ));
        assert!(warnings.is_empty(), "{warnings:?}");
        let media = gedcom.multimedia_record("@M1@").expect("media");
        assert_eq!(media.files[0].format.as_deref(), Some("png"));
        assert_eq!(media.title.as_deref(), Some("Scan"));
        let note = gedcom.note("@N1@").expect("note");
        assert_eq!(note.text, "Long\nnote");
        assert_eq!(note.record_id.as_deref(), Some("5"));
        let submitter = gedcom.submitter("@U1@").expect("submitter");
        assert_eq!(submitter.name.as_deref(), Some("Jane Doe"));
        assert_eq!(submitter.languages.len(), 2);
        assert_eq!(submitter.contact.emails, vec!["jane@example.org".to_string()]);
    }

    #[test]
    fn second_submission_is_custom_fact() {
        let (gedcom, warnings) = map("0 @A@ SUBN\n1 TEMP SLAKE\n0 @B@ SUBN\n0 TRLR");
        let submission = gedcom.submission.as_ref().expect("submission");
        assert_eq!(submission.xref.as_str(), "@A@");
        assert_eq!(submission.temple.as_deref(), Some("SLAKE"));
        assert_eq!(gedcom.custom_facts[0].xref.as_deref(), Some("@B@"));
        assert_eq!(warnings[0].code, WarningCode::DuplicateTag);
    }
}
