//! Generic line tree to typed records.
//!
//! Every record kind has its own `match` over child tags. Anything a match does not
//! name falls through to [`Mapper::custom`], which keeps the node and its subtree as a
//! [`CustomFact`] on the structure being filled.

mod family;
mod header;
mod individual;
mod records;
mod structures;

use gw_core::model::{Enumerated, Trailer, Vocabulary};
use gw_core::{
    CustomFact, Gedcom, GedcomError, NodeId, ParseWarning, ParserConfig, Pointer, RecordKind,
    StringTree, TreeNode, WarningCode, Xref,
};
use tracing::debug;

pub(crate) struct Mapper<'t> {
    tree: &'t StringTree,
    config: &'t ParserConfig,
    gedcom: Gedcom,
    warnings: Vec<ParseWarning>,
    anonymous: usize,
}

impl<'t> Mapper<'t> {
    pub(crate) fn new(tree: &'t StringTree, config: &'t ParserConfig) -> Self {
        Self {
            tree,
            config,
            gedcom: Gedcom::new(),
            warnings: Vec::new(),
            anonymous: 0,
        }
    }

    /// Maps every root in file order.
    ///
    /// # Errors
    ///
    /// Fails when the header declares a GEDCOM version other than 5.5 or 5.5.1.
    pub(crate) fn map(mut self) -> Result<(Gedcom, Vec<ParseWarning>), GedcomError> {
        let mut seen_header = false;
        for &root in self.tree.roots() {
            let node = self.node(root);
            match node.tag.as_str() {
                "HEAD" if !seen_header => {
                    seen_header = true;
                    self.header(root)?;
                }
                "HEAD" => self.duplicate_singleton(root, "HEAD"),
                "TRLR" => {
                    if self.gedcom.trailer.is_some() {
                        self.duplicate_singleton(root, "TRLR");
                    } else {
                        self.gedcom.trailer = Some(Trailer { line: node.line });
                    }
                }
                tag => match RecordKind::from_tag(tag) {
                    Some(kind) => self.record(kind, root),
                    None => {
                        let mut facts = std::mem::take(&mut self.gedcom.custom_facts);
                        self.custom(root, &mut facts);
                        self.gedcom.custom_facts = facts;
                    }
                },
            }
        }

        self.link_submission_from_header();

        let counts = self.gedcom.counts();
        debug!(
            individuals = counts.individuals,
            families = counts.families,
            sources = counts.sources,
            records = counts.total(),
            custom_facts = counts.custom_facts,
            "mapped records"
        );
        Ok((self.gedcom, self.warnings))
    }

    /// Registers the record under its xref and maps its body. Each record handler
    /// takes any earlier record with the same xref out of its arena, fills it, and
    /// puts it back before the next root. Pointers are only resolved after every root
    /// is mapped, so nothing observes the record while it is out.
    fn record(&mut self, kind: RecordKind, root: NodeId) {
        let xref = self.record_xref(kind, root);
        match kind {
            RecordKind::Individual => self.individual(xref, root),
            RecordKind::Family => self.family(xref, root),
            RecordKind::Multimedia => self.multimedia_record(xref, root),
            RecordKind::Note => self.note_record(xref, root),
            RecordKind::Repository => self.repository(xref, root),
            RecordKind::Source => self.source(xref, root),
            RecordKind::Submitter => self.submitter(xref, root),
            RecordKind::Submission => self.submission(xref, root),
        }
    }

    /// The record's xref, or a synthetic one when the line has none.
    fn record_xref(&mut self, kind: RecordKind, root: NodeId) -> Xref {
        let node = self.node(root);
        if let Some(xref) = &node.xref {
            return Xref::new(xref.clone());
        }
        self.anonymous += 1;
        let synthetic = Xref::new(format!("@_ANON{}@", self.anonymous));
        self.warn(
            WarningCode::MissingXref,
            node.line,
            format!(
                "{} record has no xref; registered as {synthetic}",
                kind.as_str()
            ),
        );
        synthetic
    }

    /// Warns about a second declaration of the same record. The caller merges into
    /// the existing record.
    fn duplicate_record(&mut self, kind: RecordKind, xref: &Xref, root: NodeId) {
        let line = self.node(root).line;
        self.warn(
            WarningCode::DuplicateXref,
            line,
            format!("{} {xref} declared again; merged into the first", kind.as_str()),
        );
    }

    /// A second header or trailer is kept whole on the aggregate.
    fn duplicate_singleton(&mut self, root: NodeId, tag: &str) {
        self.duplicate_tag(root, tag);
        self.gedcom
            .custom_facts
            .push(CustomFact::from_tree(self.tree, root));
    }

    fn link_submission_from_header(&mut self) {
        if self.gedcom.header.submission.is_none()
            && let Some(submission) = &self.gedcom.submission
        {
            self.gedcom.header.submission = Some(Pointer {
                xref: submission.xref.clone(),
                ..Pointer::default()
            });
        }
    }

    fn node(&self, id: NodeId) -> &'t TreeNode {
        self.tree.node(id)
    }

    fn children(&self, id: NodeId) -> &'t [NodeId] {
        self.tree.children(id)
    }

    fn warn(&mut self, code: WarningCode, line: usize, message: impl Into<String>) {
        self.warnings.push(ParseWarning::at_line(code, line, message));
    }

    /// Keeps `id` and its subtree verbatim.
    fn custom(&mut self, id: NodeId, custom_facts: &mut Vec<CustomFact>) {
        let fact = CustomFact::from_tree(self.tree, id);
        if self.config.strict_custom_tags && !fact.is_user_defined() {
            self.warn(
                WarningCode::NonStandardTag,
                fact.line,
                format!(
                    "unrecognised tag {} at {}; kept as custom fact",
                    fact.tag,
                    self.tree.tag_path(id)
                ),
            );
        }
        custom_facts.push(fact);
    }

    fn duplicate_tag(&mut self, id: NodeId, tag: &str) {
        let line = self.node(id).line;
        self.warn(
            WarningCode::DuplicateTag,
            line,
            format!(
                "{tag} may appear only once at {}; later occurrence kept as custom fact",
                self.tree.tag_path(id)
            ),
        );
    }

    /// The node's value. Children of a plain value node are not part of any
    /// structure, so they move to the enclosing custom facts.
    fn scalar(&mut self, id: NodeId, custom_facts: &mut Vec<CustomFact>) -> String {
        for &child in self.children(id) {
            self.custom(child, custom_facts);
        }
        self.node(id).value.clone().unwrap_or_default()
    }

    /// Fills a singular field. A second occurrence leaves the first in place and is
    /// preserved as a custom fact with a warning.
    fn keep_first<T>(
        &mut self,
        slot: &mut Option<T>,
        id: NodeId,
        custom_facts: &mut Vec<CustomFact>,
        build: impl FnOnce(&mut Self, &mut Vec<CustomFact>) -> T,
    ) {
        if slot.is_some() {
            let tag = self.node(id).tag.clone();
            self.duplicate_tag(id, &tag);
            custom_facts.push(CustomFact::from_tree(self.tree, id));
            return;
        }
        *slot = Some(build(self, custom_facts));
    }

    fn single_text(&mut self, slot: &mut Option<String>, id: NodeId, custom_facts: &mut Vec<CustomFact>) {
        self.keep_first(slot, id, custom_facts, |mapper, facts| mapper.scalar(id, facts));
    }

    /// A pointer-valued node. Values that are not `@...@` shaped are kept as custom
    /// facts instead.
    fn pointer(&mut self, id: NodeId, custom_facts: &mut Vec<CustomFact>) -> Option<Pointer> {
        let pointer = self.link_target(id, custom_facts)?;
        for &child in self.children(id) {
            self.custom(child, custom_facts);
        }
        Some(pointer)
    }

    /// Like [`Mapper::pointer`] but leaves the node's children to the caller.
    fn link_target(&mut self, id: NodeId, custom_facts: &mut Vec<CustomFact>) -> Option<Pointer> {
        let node = self.node(id);
        match node.value.as_deref().map(str::trim) {
            Some(value) if Xref::looks_like_pointer(value) => Some(Pointer::pending(value, node.line)),
            other => {
                self.warn(
                    WarningCode::InconsistentLink,
                    node.line,
                    format!(
                        "{} expects a pointer but has '{}'; kept as custom fact",
                        node.tag,
                        other.unwrap_or_default()
                    ),
                );
                custom_facts.push(CustomFact::from_tree(self.tree, id));
                None
            }
        }
    }

    fn push_pointer(&mut self, list: &mut Vec<Pointer>, id: NodeId, custom_facts: &mut Vec<CustomFact>) {
        if let Some(pointer) = self.pointer(id, custom_facts) {
            list.push(pointer);
        }
    }

    fn single_pointer(
        &mut self,
        slot: &mut Option<Pointer>,
        id: NodeId,
        custom_facts: &mut Vec<CustomFact>,
    ) {
        if slot.is_some() {
            let tag = self.node(id).tag.clone();
            self.duplicate_tag(id, &tag);
            custom_facts.push(CustomFact::from_tree(self.tree, id));
            return;
        }
        *slot = self.pointer(id, custom_facts);
    }

    /// Matches a value against a vocabulary, keeping unknown spellings raw.
    fn enumerated<T: Vocabulary>(&mut self, id: NodeId, custom_facts: &mut Vec<CustomFact>) -> Enumerated<T> {
        let raw = self.scalar(id, custom_facts);
        let parsed = Enumerated::<T>::parse(raw.trim());
        if parsed.known().is_none() && self.config.warn_on_unknown_enum_values {
            let node = self.node(id);
            self.warn(
                WarningCode::UnknownEnumValue,
                node.line,
                format!("unrecognised {} value '{raw}'", node.tag),
            );
        }
        parsed
    }

    fn single_enumerated<T: Vocabulary>(
        &mut self,
        slot: &mut Option<Enumerated<T>>,
        id: NodeId,
        custom_facts: &mut Vec<CustomFact>,
    ) {
        self.keep_first(slot, id, custom_facts, |mapper, facts| mapper.enumerated(id, facts));
    }
}

#[cfg(test)]
mod tests {
    use super::Mapper;
    use crate::encoding::LogicalLine;
    use crate::tree_builder::build_tree;
    use gw_core::{Gedcom, GedcomError, ParseWarning, ParserConfig, WarningCode};

    pub(super) fn map_with(text: &str, config: &ParserConfig) -> Result<(Gedcom, Vec<ParseWarning>), GedcomError> {
        let lines: Vec<LogicalLine> = text
            .lines()
            .enumerate()
            .map(|(index, text)| LogicalLine {
                number: index + 1,
                text: text.trim_start().to_string(),
            })
            .collect();
        let (tree, mut warnings) = build_tree(&lines, config);
        let (gedcom, mapped) = Mapper::new(&tree, config).map()?;
        warnings.extend(mapped);
        Ok((gedcom, warnings))
    }

    pub(super) fn map(text: &str) -> (Gedcom, Vec<ParseWarning>) {
        map_with(text, &ParserConfig::default()).expect("mappable input")
    }

    #[test]
    fn missing_xref_gets_synthetic_id() {
        let (gedcom, warnings) = map("0 HEAD\n0 INDI\n1 NAME Anon /Person/\n0 TRLR");
        assert!(gedcom.individual("@_ANON1@").is_some());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::MissingXref);
    }

    #[test]
    fn duplicate_xref_merges_records() {
        let (gedcom, warnings) = map(
            "0 @I1@ INDI\n1 NAME First /Name/\n0 @I1@ INDI\n1 SEX M\n0 TRLR",
        );
        let person = gedcom.individual("@I1@").expect("merged");
        assert_eq!(person.names.len(), 1);
        assert!(person.sex.is_some());
        assert_eq!(gedcom.individuals.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::DuplicateXref);
        assert_eq!(warnings[0].line, Some(3));
    }

    #[test]
    fn unknown_top_level_record_is_custom_fact() {
        let (gedcom, warnings) = map("0 HEAD\n0 @X1@ _PLAC Somewhere\n1 _LATI N1\n0 TRLR");
        assert!(warnings.is_empty());
        assert_eq!(gedcom.custom_facts.len(), 1);
        let fact = &gedcom.custom_facts[0];
        assert_eq!(fact.tag, "_PLAC");
        assert_eq!(fact.xref.as_deref(), Some("@X1@"));
        assert!(fact.child("_LATI").is_some());
        assert!(gedcom.trailer.is_some());
    }

    #[test]
    fn second_trailer_is_kept_as_custom_fact() {
        let (gedcom, warnings) = map("0 HEAD\n0 TRLR\n0 TRLR\n");
        assert_eq!(gedcom.trailer.as_ref().map(|trailer| trailer.line), Some(2));
        assert_eq!(gedcom.custom_facts.len(), 1);
        assert_eq!(gedcom.custom_facts[0].tag, "TRLR");
        assert_eq!(gedcom.custom_facts[0].line, 3);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::DuplicateTag);
        assert_eq!(warnings[0].line, Some(3));
    }

    #[test]
    fn strict_mode_warns_on_non_underscore_tags() {
        let config = ParserConfig {
            strict_custom_tags: true,
            ..ParserConfig::default()
        };
        let (gedcom, warnings) =
            map_with("0 @I1@ INDI\n1 WEIRD thing\n1 _OK fine\n0 TRLR", &config).expect("maps");
        let person = gedcom.individual("@I1@").expect("person");
        assert_eq!(person.custom_facts.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WarningCode::NonStandardTag);
    }

    #[test]
    fn non_pointer_value_in_pointer_field_is_preserved() {
        let (gedcom, warnings) = map("0 @F1@ FAM\n1 HUSB John Smith\n0 TRLR");
        let family = gedcom.family("@F1@").expect("family");
        assert!(family.husband.is_none());
        assert_eq!(family.custom_facts[0].tag, "HUSB");
        assert_eq!(warnings[0].code, WarningCode::InconsistentLink);
    }

    #[test]
    fn submission_is_linked_from_header() {
        let (gedcom, _) = map("0 HEAD\n1 GEDC\n2 VERS 5.5.1\n0 @SUB1@ SUBN\n1 FAMF fam\n0 TRLR");
        let pointer = gedcom.header.submission.as_ref().expect("linked");
        assert!(pointer.points_to("@SUB1@"));
        assert_eq!(
            gedcom.submission.as_ref().and_then(|s| s.family_file.as_deref()),
            Some("fam")
        );
    }
}
