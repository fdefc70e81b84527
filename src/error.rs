//! Failure types.
//!
//! A failed check yields exactly one [`MatchFailure`]: the first mismatch met
//! depth-first. [`UsageError`] is separate. It reports a malformed schema
//! construction (bad quantifier sequencing, invalid regex) and is never a
//! match outcome.
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::combinator::Quantifier;
use crate::schema::{Schema, TypeTag};

// ————————————————————————————————————————————————————————————————————————————
// PATH
// ————————————————————————————————————————————————————————————————————————————

/// One step from a parent value into a child value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Trail from the root value to the failure point.
///
/// Displays as `root.items[2].id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }
    pub(crate) fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) if is_bare_key(key) => write!(f, ".{key}"),
            PathSegment::Key(key) => write!(f, "[{key:?}]"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Keys that read unambiguously after a `.`; anything else is quoted.
fn is_bare_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("root")?;
        for segment in &self.0 {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MATCH FAILURE
// ————————————————————————————————————————————————————————————————————————————

/// Coarse failure class. Size failures are split out so callers can word
/// "expected between 2 and 3 elements, got 5" differently from a shape diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Structural,
    Size,
    DepthExceeded,
}

/// Precise cause of a mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    TypeMismatch { expected: TypeTag, found: TypeTag },
    PatternMismatch { pattern: String },
    NotAString,
    LiteralMismatch,
    MissingKey { key: String },
    NotAMapping,
    NotASequence,
    NoAlternative { tried: usize },
    LengthMismatch { expected: usize, actual: usize },
    LengthOutOfRange { len: usize, bounds: Quantifier },
    CountOutOfRange { count: usize, bounds: Quantifier },
    DepthExceeded { limit: usize },
}

impl Reason {
    pub fn kind(&self) -> FailureKind {
        match self {
            Reason::LengthMismatch { .. }
            | Reason::LengthOutOfRange { .. }
            | Reason::CountOutOfRange { .. } => FailureKind::Size,
            Reason::DepthExceeded { .. } => FailureKind::DepthExceeded,
            _ => FailureKind::Structural,
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::TypeMismatch { expected, found } => {
                write!(f, "expected a value of type {expected}, found {found}")
            }
            Reason::PatternMismatch { pattern } => {
                write!(f, "string does not fully match /{pattern}/")
            }
            Reason::NotAString => f.write_str("pattern can only match a string"),
            Reason::LiteralMismatch => f.write_str("value differs from the expected literal"),
            Reason::MissingKey { key } => write!(f, "missing key `{key}`"),
            Reason::NotAMapping => f.write_str("schema does not describe a mapping"),
            Reason::NotASequence => f.write_str("expected a sequence"),
            Reason::NoAlternative { tried } => {
                write!(f, "value matches none of {tried} alternative(s)")
            }
            Reason::LengthMismatch { expected, actual } => {
                write!(f, "wrong size: {actual} != {expected}")
            }
            Reason::LengthOutOfRange { len, bounds } => {
                write!(f, "list size ({len}) is not {bounds}")
            }
            Reason::CountOutOfRange { count, bounds } => {
                write!(f, "{count} element(s) match, expected {bounds}")
            }
            Reason::DepthExceeded { limit } => {
                write!(f, "nesting deeper than the limit of {limit}")
            }
        }
    }
}

/// The first mismatch found by a check.
///
/// `expected` is the schema subtree active at the failure point and `actual`
/// the value subtree it was compared with.
#[derive(Debug, Clone, Error)]
#[error("{reason} at {path}")]
pub struct MatchFailure {
    pub reason: Reason,
    pub path: Path,
    pub expected: Schema,
    pub actual: Value,
}

impl MatchFailure {
    pub fn new(reason: Reason, path: Path, expected: Schema, actual: Value) -> Self {
        Self { reason, path, expected, actual }
    }
    pub fn kind(&self) -> FailureKind {
        self.reason.kind()
    }
    pub fn is_size(&self) -> bool {
        self.kind() == FailureKind::Size
    }
    pub fn is_structural(&self) -> bool {
        self.kind() == FailureKind::Structural
    }
    /// Alternation may discard this failure and try the next candidate.
    /// Depth failures always propagate.
    pub(crate) fn is_recoverable(&self) -> bool {
        self.kind() != FailureKind::DepthExceeded
    }
    /// Relocates the failure one step below where it was built.
    pub(crate) fn within(mut self, segment: PathSegment) -> Self {
        self.path.push(segment);
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// USAGE ERRORS
// ————————————————————————————————————————————————————————————————————————————

/// Invalid schema construction.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("wrong use of `{finalizer}`: no count staged with `with_count`")]
    NoStagedCount { finalizer: &'static str },

    #[error("invalid bounds: min ({min}) is greater than max ({max})")]
    InvertedBounds { min: usize, max: usize },

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_renders_from_root() {
        let path: Path = [PathSegment::from("items"), PathSegment::Index(2), "id".into()]
            .into_iter()
            .collect();
        assert_eq!(path.to_string(), "root.items[2].id");
        assert_eq!(Path::root().to_string(), "root");
        assert_eq!(path.last(), Some(&PathSegment::Key("id".into())));
    }

    #[test]
    fn unusual_keys_are_quoted() {
        let path: Path = ["a.b", "x[0]", "ok_key"].into_iter().collect();
        assert_eq!(path.to_string(), r#"root["a.b"]["x[0]"].ok_key"#);
        let odd: Path = ["", ":id"].into_iter().collect();
        assert_eq!(odd.to_string(), r#"root[""][":id"]"#);
    }

    #[test]
    fn reason_kind_splits_size_from_structure() {
        let size = Reason::LengthMismatch { expected: 2, actual: 3 };
        let count = Reason::CountOutOfRange { count: 2, bounds: Quantifier::exactly(3) };
        assert_eq!(size.kind(), FailureKind::Size);
        assert_eq!(count.kind(), FailureKind::Size);
        assert_eq!(Reason::MissingKey { key: "id".into() }.kind(), FailureKind::Structural);
        assert_eq!(Reason::DepthExceeded { limit: 4 }.kind(), FailureKind::DepthExceeded);
    }

    #[test]
    fn failure_message_names_reason_and_path() {
        let failure = MatchFailure::new(
            Reason::LengthOutOfRange { len: 5, bounds: Quantifier::between(2, 3).unwrap() },
            Path::root(),
            Schema::from(TypeTag::Array),
            serde_json::json!([1, 2, 3, 4, 5]),
        )
        .within(PathSegment::Key("tags".into()));
        assert_eq!(failure.to_string(), "list size (5) is not between 2 and 3 at root.tags");
        assert!(failure.is_size());
    }

    #[test]
    fn path_serializes_as_plain_trail() {
        let path: Path = [PathSegment::from("a"), PathSegment::Index(0)].into_iter().collect();
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!(["a", 0]));
    }
}
