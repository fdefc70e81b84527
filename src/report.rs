//! Human-readable failure text.
//!
//! ```text
//! {
//!   "id": 123
//! }
//! does not match structure
//! {id: String}
//!
//! expected a value of type String, found Integer at root.id
//! expected: String
//! actual:   123
//! ```
use std::fmt;

use serde_json::Value;

use crate::error::MatchFailure;
use crate::schema::Schema;

pub struct Report<'a> {
    schema: &'a Schema,
    value: &'a Value,
    failure: &'a MatchFailure,
}

impl<'a> Report<'a> {
    pub fn new(schema: &'a Schema, value: &'a Value, failure: &'a MatchFailure) -> Self {
        Self { schema, value, failure }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", pretty(self.value))?;
        writeln!(f, "does not match structure")?;
        writeln!(f, "{}", self.schema)?;
        writeln!(f)?;
        writeln!(f, "{}", self.failure)?;
        writeln!(f, "expected: {}", self.failure.expected)?;
        write!(f, "actual:   {}", pretty(&self.failure.actual))
    }
}

/// Text for a check that unexpectedly succeeded.
pub fn unexpected_match(schema: &Schema, value: &Value) -> String {
    format!("{}\nis matching structure\n{}", pretty(value), schema)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
