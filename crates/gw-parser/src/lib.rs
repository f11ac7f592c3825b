#![forbid(unsafe_code)]

//! GEDCOM 5.5 / 5.5.1 reader.
//!
//! Bytes go through five stages: character set detection and decoding, line
//! tokenizing, tree building, mapping onto typed records, then cross-reference
//! resolution. Only an unsupported character set or GEDCOM version stops a parse;
//! everything else is reported as a [`ParseWarning`] next to the graph.

pub mod emit;
pub mod encoding;
mod mapper;
pub mod resolver;
pub mod tokenizer;
pub mod tree_builder;

use std::path::Path;

use gw_core::{Gedcom, GedcomError, ParseWarning, ParserConfig, StringTree, WarningCode};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, debug_span};

pub use emit::{write_custom_fact, write_custom_facts, write_tree};
pub use encoding::{DetectedEncoding, DetectionMethod, Encoding, LogicalLine};
pub use resolver::ResolveStats;
pub use tokenizer::{Token, tokenize_line};
pub use tree_builder::build_tree;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    pub gedcom: Gedcom,
    /// Recoverable problems in the order they were found.
    pub warnings: Vec<ParseWarning>,
    /// Character set the bytes were decoded with, and why.
    pub encoding: DetectedEncoding,
}

impl ParseResult {
    /// Whether any warning carries `code`.
    #[must_use]
    pub fn has_warning(&self, code: WarningCode) -> bool {
        self.warnings.iter().any(|warning| warning.code == code)
    }
}

/// Parses GEDCOM bytes with the default configuration.
///
/// # Errors
///
/// Returns [`GedcomError::UnsupportedCharset`] or [`GedcomError::UnsupportedVersion`].
pub fn parse_bytes(bytes: &[u8]) -> Result<ParseResult, GedcomError> {
    parse_bytes_with_config(bytes, &ParserConfig::default())
}

/// Parses GEDCOM bytes.
///
/// # Errors
///
/// Returns [`GedcomError::UnsupportedCharset`] or [`GedcomError::UnsupportedVersion`].
pub fn parse_bytes_with_config(
    bytes: &[u8],
    config: &ParserConfig,
) -> Result<ParseResult, GedcomError> {
    let span = debug_span!("gedcom_parse", bytes = bytes.len());
    let _guard = span.enter();

    let mut warnings = Vec::new();
    let decoded = encoding::decode(bytes, &mut warnings)?;
    debug!(
        encoding = decoded.detected.encoding.as_str(),
        method = decoded.detected.method.as_str(),
        lines = decoded.lines.len(),
        "decoded input"
    );

    let (tree, tree_warnings) = build_tree(&decoded.lines, config);
    warnings.extend(tree_warnings);

    let gedcom = map_and_resolve(&tree, config, &mut warnings)?;
    debug!(warnings = warnings.len(), "parse finished");

    Ok(ParseResult {
        gedcom,
        warnings,
        encoding: decoded.detected,
    })
}

/// Parses text that is already decoded. Any `CHAR` declaration is ignored.
///
/// # Errors
///
/// Returns [`GedcomError::UnsupportedVersion`] for a header declaring another version.
pub fn parse_str(text: &str, config: &ParserConfig) -> Result<(Gedcom, Vec<ParseWarning>), GedcomError> {
    let span = debug_span!("gedcom_parse", chars = text.len());
    let _guard = span.enter();

    let lines = encoding::text_lines(text);
    let (tree, mut warnings) = build_tree(&lines, config);
    let gedcom = map_and_resolve(&tree, config, &mut warnings)?;
    Ok((gedcom, warnings))
}

/// Reads and parses a file.
///
/// # Errors
///
/// Returns [`GedcomError::Io`] when the file cannot be read, otherwise as
/// [`parse_bytes_with_config`].
pub fn parse_file(path: impl AsRef<Path>, config: &ParserConfig) -> Result<ParseResult, GedcomError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| GedcomError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    parse_bytes_with_config(&bytes, config)
}

fn map_and_resolve(
    tree: &StringTree,
    config: &ParserConfig,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Gedcom, GedcomError> {
    let (mut gedcom, mapped) = mapper::Mapper::new(tree, config).map()?;
    warnings.extend(mapped);
    resolver::resolve(&mut gedcom, warnings);
    Ok(gedcom)
}

/// Compact JSON summary of a parse: record counts and warning codes.
#[must_use]
pub fn parse_evidence_json(parsed: &ParseResult) -> String {
    let counts = parsed.gedcom.counts();
    json!({
        "encoding": parsed.encoding.encoding.as_str(),
        "encoding_method": parsed.encoding.method.as_str(),
        "individual_count": counts.individuals,
        "family_count": counts.families,
        "source_count": counts.sources,
        "note_count": counts.notes,
        "record_count": counts.total(),
        "custom_fact_count": counts.custom_facts,
        "warning_count": parsed.warnings.len(),
        "warnings": parsed
            .warnings
            .iter()
            .map(|warning| warning.code.as_str())
            .collect::<Vec<_>>(),
    })
    .to_string()
}
