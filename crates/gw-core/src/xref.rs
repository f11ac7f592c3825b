use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A cross-reference id such as `@I1@`, stored with its delimiters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Xref(String);

impl Xref {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `value` has the `@...@` pointer shape (and is not an escaped `@@`).
    #[must_use]
    pub fn looks_like_pointer(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.len() > 2
            && trimmed.starts_with('@')
            && trimmed.ends_with('@')
            && !trimmed.starts_with("@@")
            && !trimmed[1..trimmed.len() - 1].contains('@')
    }
}

impl fmt::Display for Xref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Xref {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Xref {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Xref {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The record kinds that own an xref namespace in the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Individual,
    Family,
    Multimedia,
    Note,
    Repository,
    Source,
    Submitter,
    Submission,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Family => "family",
            Self::Multimedia => "multimedia",
            Self::Note => "note",
            Self::Repository => "repository",
            Self::Source => "source",
            Self::Submitter => "submitter",
            Self::Submission => "submission",
        }
    }

    /// The level-0 tag that opens a record of this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Individual => "INDI",
            Self::Family => "FAM",
            Self::Multimedia => "OBJE",
            Self::Note => "NOTE",
            Self::Repository => "REPO",
            Self::Source => "SOUR",
            Self::Submitter => "SUBM",
            Self::Submission => "SUBN",
        }
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "INDI" => Some(Self::Individual),
            "FAM" => Some(Self::Family),
            "OBJE" => Some(Self::Multimedia),
            "NOTE" => Some(Self::Note),
            "REPO" => Some(Self::Repository),
            "SOUR" => Some(Self::Source),
            "SUBM" => Some(Self::Submitter),
            "SUBN" => Some(Self::Submission),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LinkState {
    /// Recorded by the mapper, not yet looked at by the resolver.
    #[default]
    Pending,
    /// The target exists in the aggregate.
    Resolved,
    /// The target was never declared.
    Unresolved,
}

/// A textual reference from one record to another.
///
/// The target kind is implied by the field holding the pointer. Following a pointer
/// is a lookup through the owning [`Gedcom`](crate::Gedcom) arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pointer {
    pub xref: Xref,
    pub state: LinkState,
    /// Source line the pointer was read from.
    pub line: Option<usize>,
}

impl Pointer {
    #[must_use]
    pub fn pending(xref: impl Into<Xref>, line: usize) -> Self {
        Self {
            xref: xref.into(),
            state: LinkState::Pending,
            line: Some(line),
        }
    }

    /// A pointer created by the resolver when completing a mirror edge.
    #[must_use]
    pub fn resolved(xref: impl Into<Xref>) -> Self {
        Self {
            xref: xref.into(),
            state: LinkState::Resolved,
            line: None,
        }
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self.state, LinkState::Resolved)
    }

    #[must_use]
    pub fn points_to(&self, xref: &str) -> bool {
        self.xref.as_str() == xref
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{LinkState, Pointer, RecordKind, Xref};

    #[test]
    fn pointer_shape_detection() {
        assert!(Xref::looks_like_pointer("@I1@"));
        assert!(Xref::looks_like_pointer(" @F23@ "));
        assert!(!Xref::looks_like_pointer("@@"));
        assert!(!Xref::looks_like_pointer("@@ escaped text@"));
        assert!(!Xref::looks_like_pointer("john@example.com"));
        assert!(!Xref::looks_like_pointer("@I1@ and @I2@"));
    }

    #[test]
    fn xref_map_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(Xref::new("@I1@"), 1);
        assert_eq!(map.get("@I1@"), Some(&1));
        assert_eq!(map.get("@I2@"), None);
    }

    #[test]
    fn record_kind_tags_round_trip() {
        for kind in [
            RecordKind::Individual,
            RecordKind::Family,
            RecordKind::Multimedia,
            RecordKind::Note,
            RecordKind::Repository,
            RecordKind::Source,
            RecordKind::Submitter,
            RecordKind::Submission,
        ] {
            assert_eq!(RecordKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(RecordKind::from_tag("HEAD"), None);
    }

    #[test]
    fn new_pointers_start_pending() {
        let pointer = Pointer::pending("@F1@", 7);
        assert_eq!(pointer.state, LinkState::Pending);
        assert!(!pointer.is_resolved());
        assert!(pointer.points_to("@F1@"));
        assert!(Pointer::resolved("@F1@").is_resolved());
    }
}
