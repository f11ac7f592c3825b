use gw_core::model::{
    CharacterSet, Corporation, GedcomVersion, HeaderSourceData, SourceSystem,
};
use gw_core::{CustomFact, GedcomError, NodeId};

use super::Mapper;

/// Versions this reader understands. Anything else in `HEAD.GEDC.VERS` is refused.
const SUPPORTED_VERSIONS: [&str; 2] = ["5.5", "5.5.1"];

impl Mapper<'_> {
    pub(super) fn header(&mut self, root: NodeId) -> Result<(), GedcomError> {
        let mut header = std::mem::take(&mut self.gedcom.header);
        let facts = &mut header.custom_facts;
        for &child in self.children(root) {
            match self.node(child).tag.as_str() {
                "SOUR" => self.keep_first(&mut header.source_system, child, facts, |mapper, _| {
                    mapper.source_system(child)
                }),
                "DEST" => self.single_text(&mut header.destination, child, facts),
                "DATE" => {
                    if header.date.is_some() {
                        self.duplicate_tag(child, "DATE");
                        facts.push(CustomFact::from_tree(self.tree, child));
                        continue;
                    }
                    header.date = self.node(child).value.clone();
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "TIME" => self.single_text(&mut header.time, grandchild, facts),
                            _ => self.custom(grandchild, facts),
                        }
                    }
                }
                "SUBM" => self.single_pointer(&mut header.submitter, child, facts),
                "SUBN" => self.single_pointer(&mut header.submission, child, facts),
                "FILE" => self.single_text(&mut header.file_name, child, facts),
                "COPR" => self.single_text(&mut header.copyright, child, facts),
                "GEDC" => {
                    if header.gedcom_version.is_some() {
                        self.duplicate_tag(child, "GEDC");
                        facts.push(CustomFact::from_tree(self.tree, child));
                        continue;
                    }
                    header.gedcom_version = Some(self.gedcom_version(child, facts)?);
                }
                "CHAR" => self.keep_first(&mut header.character_set, child, facts, |mapper, facts| {
                    mapper.character_set(child, facts)
                }),
                "LANG" => self.single_text(&mut header.language, child, facts),
                "PLAC" => {
                    for &grandchild in self.children(child) {
                        match self.node(grandchild).tag.as_str() {
                            "FORM" => self.single_text(&mut header.place_form, grandchild, facts),
                            _ => self.custom(grandchild, facts),
                        }
                    }
                }
                "NOTE" => self.single_text(&mut header.note, child, facts),
                _ => self.custom(child, facts),
            }
        }
        self.gedcom.header = header;
        Ok(())
    }

    fn source_system(&mut self, id: NodeId) -> SourceSystem {
        let mut system = SourceSystem {
            system_id: self.node(id).value.clone().unwrap_or_default(),
            ..SourceSystem::default()
        };
        let facts = &mut system.custom_facts;
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "VERS" => self.single_text(&mut system.version, child, facts),
                "NAME" => self.single_text(&mut system.product_name, child, facts),
                "CORP" => self.keep_first(&mut system.corporation, child, facts, |mapper, facts| {
                    mapper.corporation(child, facts)
                }),
                "DATA" => self.keep_first(&mut system.data, child, facts, |mapper, facts| {
                    mapper.header_source_data(child, facts)
                }),
                _ => self.custom(child, facts),
            }
        }
        system
    }

    fn corporation(&mut self, id: NodeId, custom_facts: &mut Vec<CustomFact>) -> Corporation {
        let mut corporation = Corporation {
            name: self.node(id).value.clone().unwrap_or_default(),
            ..Corporation::default()
        };
        for &child in self.children(id) {
            if !self.contact_field(&mut corporation.contact, child, custom_facts) {
                self.custom(child, custom_facts);
            }
        }
        corporation
    }

    fn header_source_data(
        &mut self,
        id: NodeId,
        custom_facts: &mut Vec<CustomFact>,
    ) -> HeaderSourceData {
        let mut data = HeaderSourceData {
            name: self.node(id).value.clone().unwrap_or_default(),
            ..HeaderSourceData::default()
        };
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "DATE" => self.single_text(&mut data.publication_date, child, custom_facts),
                "COPR" => self.single_text(&mut data.copyright, child, custom_facts),
                _ => self.custom(child, custom_facts),
            }
        }
        data
    }

    /// `HEAD.GEDC`, refusing versions this reader does not implement. A header with
    /// no `VERS` at all is accepted.
    fn gedcom_version(
        &mut self,
        id: NodeId,
        custom_facts: &mut Vec<CustomFact>,
    ) -> Result<GedcomVersion, GedcomError> {
        let mut version = GedcomVersion::default();
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "VERS" => {
                    let node = self.node(child);
                    let declared = node.value.as_deref().unwrap_or_default().trim();
                    if !SUPPORTED_VERSIONS.contains(&declared) {
                        return Err(GedcomError::UnsupportedVersion {
                            version: declared.to_string(),
                            line: node.line,
                        });
                    }
                    self.single_text(&mut version.version, child, custom_facts);
                }
                "FORM" => self.single_text(&mut version.form, child, custom_facts),
                _ => self.custom(child, custom_facts),
            }
        }
        Ok(version)
    }

    fn character_set(&mut self, id: NodeId, custom_facts: &mut Vec<CustomFact>) -> CharacterSet {
        let mut charset = CharacterSet {
            name: self.node(id).value.clone().unwrap_or_default(),
            ..CharacterSet::default()
        };
        for &child in self.children(id) {
            match self.node(child).tag.as_str() {
                "VERS" => self.single_text(&mut charset.version, child, custom_facts),
                _ => self.custom(child, custom_facts),
            }
        }
        charset
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{map, map_with};
    use gw_core::{GedcomError, ParserConfig};

    #[test]
    fn maps_full_header() {
        let (gedcom, warnings) = map(concat!(
            "0 HEAD\n",
            "1 SOUR FTW\n",
            "2 VERS 5.0\n",
            "2 NAME Family Tree Writer\n",
            "2 CORP Acme Genealogy\n",
            "3 ADDR 1 Main St\n",
            "3 PHON 555-0100\n",
            "2 DATA Census 1900\n",
            "3 DATE 1 JAN 2000\n",
            "3 COPR Public domain\n",
            "1 DEST ANSTFILE\n",
            "1 DATE 2 FEB 2001\n",
            "2 TIME 10:11:12\n",
            "1 SUBM @U1@\n",
            "1 FILE family.ged\n",
            "1 COPR (c) Someone\n",
            "1 GEDC\n",
            "2 VERS 5.5.1\n",
            "2 FORM LINEAGE-LINKED\n",
            "1 CHAR UTF-8\n",
            "1 LANG English\n",
            "1 PLAC\n",
            "2 FORM City, County, State\n",
            "1 NOTE Exported\n",
            "2 CONT for testing\n",
            "0 @U1@ SUBM\n",
            "1 NAME Someone\n",
            "0 TRLR",
        ));
        assert!(warnings.is_empty(), "{warnings:?}");
        let header = &gedcom.header;
        let system = header.source_system.as_ref().expect("source system");
        assert_eq!(system.system_id, "FTW");
        assert_eq!(system.version.as_deref(), Some("5.0"));
        assert_eq!(system.product_name.as_deref(), Some("Family Tree Writer"));
        let corporation = system.corporation.as_ref().expect("corporation");
        assert_eq!(corporation.name, "Acme Genealogy");
        assert_eq!(corporation.contact.phones, vec!["555-0100".to_string()]);
        let data = system.data.as_ref().expect("data");
        assert_eq!(data.publication_date.as_deref(), Some("1 JAN 2000"));
        assert_eq!(header.destination.as_deref(), Some("ANSTFILE"));
        assert_eq!(header.date.as_deref(), Some("2 FEB 2001"));
        assert_eq!(header.time.as_deref(), Some("10:11:12"));
        assert!(header.submitter.as_ref().is_some_and(|p| p.points_to("@U1@")));
        assert_eq!(header.file_name.as_deref(), Some("family.ged"));
        let version = header.gedcom_version.as_ref().expect("version");
        assert_eq!(version.version.as_deref(), Some("5.5.1"));
        assert_eq!(version.form.as_deref(), Some("LINEAGE-LINKED"));
        assert_eq!(
            header.character_set.as_ref().map(|c| c.name.as_str()),
            Some("UTF-8")
        );
        assert_eq!(header.place_form.as_deref(), Some("City, County, State"));
        assert_eq!(header.note.as_deref(), Some("Exported\nfor testing"));
    }

    #[test]
    fn unsupported_version_is_fatal() {
        let result = map_with(
            "0 HEAD\n1 GEDC\n2 VERS 7.0\n0 TRLR",
            &ParserConfig::default(),
        );
        match result {
            Err(GedcomError::UnsupportedVersion { version, line }) => {
                assert_eq!(version, "7.0");
                assert_eq!(line, 3);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn version_5_5_and_missing_version_are_accepted() {
        assert!(map_with("0 HEAD\n1 GEDC\n2 VERS 5.5\n0 TRLR", &ParserConfig::default()).is_ok());
        assert!(map_with("0 HEAD\n1 GEDC\n2 FORM LINEAGE-LINKED\n0 TRLR", &ParserConfig::default()).is_ok());
    }

    #[test]
    fn unknown_header_tags_are_custom_facts() {
        let (gedcom, _) = map("0 HEAD\n1 _HME @I1@\n0 TRLR");
        assert_eq!(gedcom.header.custom_facts[0].tag, "_HME");
    }
}
