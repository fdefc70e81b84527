//! Schema trees.
//!
//! A [`Schema`] describes the expected shape of a `serde_json::Value`. Plain
//! JSON lifts into a schema node for node: objects become partial
//! [`Schema::Mapping`]s, arrays become positional [`Schema::Sequence`]s and
//! scalars become [`Schema::Literal`]s. Type tags, patterns and the
//! combinators from [`crate::combinator`] slot in anywhere a node may go.
pub mod pattern;
pub mod tag;

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::combinator::{ListContains, ListOf, OneOf};
use crate::error::UsageError;

pub use pattern::Pattern;
pub use tag::TypeTag;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub enum Schema {
    /// Any value whose runtime tag is admitted by this tag.
    Type(TypeTag),
    /// A string whose full content matches.
    Pattern(Pattern),
    /// An equal value (numbers compare by value, containers deeply).
    Literal(Value),
    OneOf(OneOf),
    ListOf(ListOf),
    ListContains(ListContains),
    /// Subset check over an object, in declaration order.
    Mapping(IndexMap<String, Schema>),
    /// Positional, exact-length check over an array.
    Sequence(Vec<Schema>),
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl Schema {
    pub fn literal(value: impl Into<Value>) -> Self {
        Schema::Literal(value.into())
    }

    pub fn mapping<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Schema::Mapping(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn sequence<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Schema::Sequence(elements.into_iter().map(Into::into).collect())
    }

    /// This node with its children elided: containers and combinators keep
    /// their kind and bounds but drop nested schemas. Depth failures carry
    /// this instead of the full subtree.
    pub fn shallow(&self) -> Self {
        match self {
            Schema::Type(_) | Schema::Pattern(_) => self.clone(),
            Schema::Literal(Value::Array(_)) => Schema::Literal(Value::Array(Vec::new())),
            Schema::Literal(Value::Object(_)) => Schema::Literal(Value::Object(Default::default())),
            Schema::Literal(_) => self.clone(),
            Schema::OneOf(_) => Schema::OneOf(OneOf::new(Vec::<Schema>::new())),
            Schema::ListOf(combinator) => Schema::ListOf(combinator.shallow()),
            Schema::ListContains(combinator) => Schema::ListContains(combinator.shallow()),
            Schema::Mapping(_) => Schema::Mapping(IndexMap::new()),
            Schema::Sequence(_) => Schema::Sequence(Vec::new()),
        }
    }

    /// Short name of the node kind, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::Type(_) => "type",
            Schema::Pattern(_) => "pattern",
            Schema::Literal(_) => "literal",
            Schema::OneOf(_) => "one_of",
            Schema::ListOf(_) => "list_of",
            Schema::ListContains(_) => "list_containing",
            Schema::Mapping(_) => "mapping",
            Schema::Sequence(_) => "sequence",
        }
    }
}

pub fn type_of(tag: TypeTag) -> Schema {
    Schema::Type(tag)
}

pub fn pattern(source: &str) -> Result<Schema, UsageError> {
    Pattern::new(source).map(Schema::Pattern)
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSIONS
// ————————————————————————————————————————————————————————————————————————————

impl From<Value> for Schema {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Schema::Mapping(
                fields.into_iter().map(|(k, v)| (k, Schema::from(v))).collect(),
            ),
            Value::Array(items) => Schema::Sequence(items.into_iter().map(Schema::from).collect()),
            scalar => Schema::Literal(scalar),
        }
    }
}

impl From<&Value> for Schema {
    fn from(value: &Value) -> Self {
        Schema::from(value.clone())
    }
}

impl From<TypeTag> for Schema {
    fn from(tag: TypeTag) -> Self {
        Schema::Type(tag)
    }
}

impl From<Pattern> for Schema {
    fn from(pattern: Pattern) -> Self {
        Schema::Pattern(pattern)
    }
}

/// Anchoring recompiles the regex, which can hit the size limit again.
impl TryFrom<regex::Regex> for Schema {
    type Error = UsageError;

    fn try_from(regex: regex::Regex) -> Result<Self, Self::Error> {
        Pattern::try_from(regex).map(Schema::Pattern)
    }
}

impl From<OneOf> for Schema {
    fn from(combinator: OneOf) -> Self {
        Schema::OneOf(combinator)
    }
}

impl From<ListOf> for Schema {
    fn from(combinator: ListOf) -> Self {
        Schema::ListOf(combinator)
    }
}

impl From<ListContains> for Schema {
    fn from(combinator: ListContains) -> Self {
        Schema::ListContains(combinator)
    }
}

impl From<Vec<Schema>> for Schema {
    fn from(elements: Vec<Schema>) -> Self {
        Schema::Sequence(elements)
    }
}

impl From<IndexMap<String, Schema>> for Schema {
    fn from(fields: IndexMap<String, Schema>) -> Self {
        Schema::Mapping(fields)
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Schema {
                fn from(value: $ty) -> Self {
                    Schema::Literal(Value::from(value))
                }
            }
        )*
    };
}

literal_from!(&str, String, bool, i32, i64, u32, u64, f64);

// ————————————————————————————————————————————————————————————————————————————
// DISPLAY
// ————————————————————————————————————————————————————————————————————————————

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Type(tag) => write!(f, "{tag}"),
            Schema::Pattern(pattern) => write!(f, "{pattern}"),
            Schema::Literal(value) => write!(f, "{value}"),
            Schema::OneOf(combinator) => write!(f, "{combinator}"),
            Schema::ListOf(combinator) => write!(f, "{combinator}"),
            Schema::ListContains(combinator) => write!(f, "{combinator}"),
            Schema::Mapping(fields) => {
                f.write_str("{")?;
                for (i, (key, schema)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {schema}")?;
                }
                f.write_str("}")
            }
            Schema::Sequence(elements) => {
                f.write_str("[")?;
                write_joined(f, elements)?;
                f.write_str("]")
            }
        }
    }
}

/// Writes `a, b, c`.
pub(crate) fn write_joined(f: &mut fmt::Formatter<'_>, schemas: &[Schema]) -> fmt::Result {
    for (i, schema) in schemas.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{schema}")?;
    }
    Ok(())
}
