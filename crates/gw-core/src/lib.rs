#![forbid(unsafe_code)]

//! Core model for the gedweave GEDCOM pipeline.
//!
//! Holds everything the parser produces and the graph utilities consume: the generic
//! line tree, the typed record arena, pointers between records, parse diagnostics and
//! the parser configuration.

mod config;
mod custom;
mod gedcom;
pub mod model;
mod tree;
mod xref;

pub use config::ParserConfig;
pub use custom::CustomFact;
pub use gedcom::{Gedcom, RecordCounts};
pub use tree::{NodeId, StringTree, TreeNode};
pub use xref::{LinkState, Pointer, RecordKind, Xref};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code point substituted for bytes that cannot be mapped in the detected encoding.
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum GedcomErrorCode {
    #[default]
    Charset,
    Version,
    Io,
    Config,
}

impl GedcomErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charset => "gedcom/error/charset",
            Self::Version => "gedcom/error/version",
            Self::Io => "gedcom/error/io",
            Self::Config => "gedcom/error/config",
        }
    }
}

/// Conditions that abort a parse. Everything else is a [`ParseWarning`].
#[derive(Debug, Clone, Serialize, Deserialize, Error, PartialEq, Eq)]
pub enum GedcomError {
    #[error("unsupported character set '{declared}' declared on line {line}")]
    UnsupportedCharset { declared: String, line: usize },
    #[error("unsupported GEDCOM version '{version}' declared on line {line}")]
    UnsupportedVersion { version: String, line: usize },
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("invalid parser configuration: {message}")]
    InvalidConfig { message: String },
}

impl GedcomError {
    #[must_use]
    pub const fn code(&self) -> GedcomErrorCode {
        match self {
            Self::UnsupportedCharset { .. } => GedcomErrorCode::Charset,
            Self::UnsupportedVersion { .. } => GedcomErrorCode::Version,
            Self::Io { .. } => GedcomErrorCode::Io,
            Self::InvalidConfig { .. } => GedcomErrorCode::Config,
        }
    }

    /// Source line the error refers to, when it refers to one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::UnsupportedCharset { line, .. } | Self::UnsupportedVersion { line, .. } => {
                Some(*line)
            }
            Self::Io { .. } | Self::InvalidConfig { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum WarningCode {
    /// A line could not be split into level, xref, tag and value.
    #[default]
    Tokenize,
    /// A byte had no mapping in the detected character set.
    UnmappableByte,
    /// A line skipped one or more levels, or had no parent at all.
    LevelSkip,
    /// A CONT/CONC line had nothing to continue.
    OrphanContinuation,
    /// A line without a level was folded into the previous node.
    NonStandardLineBreak,
    /// A pointer names a record that was never declared.
    DanglingXref,
    /// A record-level xref was declared more than once.
    DuplicateXref,
    /// A level-0 record had no xref.
    MissingXref,
    /// A singular tag appeared more than once under the same parent.
    DuplicateTag,
    /// An enumerated value is not part of its vocabulary.
    UnknownEnumValue,
    /// A non-underscore tag was not understood (only with `strict_custom_tags`).
    NonStandardTag,
    /// Mirror edges disagree and could not be completed.
    InconsistentLink,
    /// The declared character set disagrees with what the bytes look like.
    CharsetMismatch,
}

impl WarningCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tokenize => "gedcom/warn/tokenize",
            Self::UnmappableByte => "gedcom/warn/unmappable-byte",
            Self::LevelSkip => "gedcom/warn/level-skip",
            Self::OrphanContinuation => "gedcom/warn/orphan-continuation",
            Self::NonStandardLineBreak => "gedcom/warn/line-break",
            Self::DanglingXref => "gedcom/warn/dangling-xref",
            Self::DuplicateXref => "gedcom/warn/duplicate-xref",
            Self::MissingXref => "gedcom/warn/missing-xref",
            Self::DuplicateTag => "gedcom/warn/duplicate-tag",
            Self::UnknownEnumValue => "gedcom/warn/unknown-enum-value",
            Self::NonStandardTag => "gedcom/warn/non-standard-tag",
            Self::InconsistentLink => "gedcom/warn/inconsistent-link",
            Self::CharsetMismatch => "gedcom/warn/charset-mismatch",
        }
    }
}

/// A recoverable anomaly found while parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ParseWarning {
    pub code: WarningCode,
    pub message: String,
    /// 1-based physical source line, when known.
    pub line: Option<usize>,
}

impl ParseWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            line: None,
        }
    }

    #[must_use]
    pub fn at_line(code: WarningCode, line: usize, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            line: Some(line),
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    #[default]
    Warning,
    Error,
}

impl DiagnosticSeverity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Stable, machine-readable diagnostics payload for tooling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct StructuredDiagnostic {
    pub error_code: String,
    pub severity: DiagnosticSeverity,
    pub message: String,
    pub source_line: Option<usize>,
}

impl StructuredDiagnostic {
    #[must_use]
    pub fn from_warning(warning: &ParseWarning) -> Self {
        Self {
            error_code: warning.code.as_str().to_string(),
            severity: DiagnosticSeverity::Warning,
            message: warning.message.clone(),
            source_line: warning.line,
        }
    }

    #[must_use]
    pub fn from_error(error: &GedcomError) -> Self {
        Self {
            error_code: error.code().as_str().to_string(),
            severity: DiagnosticSeverity::Error,
            message: error.to_string(),
            source_line: error.line(),
        }
    }
}
