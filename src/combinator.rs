//! Schema combinators.
//!
//! A combinator replaces the literal/type rule at its position in the schema
//! tree with a rule of its own. Combinators don't walk values themselves:
//! each candidate check goes back through the comparator via [`Descend`].
pub mod list_contains;
pub mod list_of;
pub mod quantifier;

use std::fmt;

use serde_json::Value;
use tracing::trace;

use crate::error::{MatchFailure, Reason};
use crate::schema::{Schema, write_joined};

pub use list_contains::ListContains;
pub use list_of::{ListOf, StagedListOf};
pub use quantifier::{DEFAULT_MAX, Quantifier};

/// Re-entry point into the comparator.
pub trait Descend {
    /// Checks `value` against `schema` at the current position.
    fn descend(&mut self, schema: &Schema, value: &Value) -> Result<(), MatchFailure>;

    /// Checks element `index` of the sequence at the current position.
    fn descend_index(
        &mut self,
        index: usize,
        schema: &Schema,
        value: &Value,
    ) -> Result<(), MatchFailure>;

    /// Builds a failure located at the current position.
    fn fail(&self, reason: Reason, expected: &Schema, actual: &Value) -> MatchFailure;
}

/// Tries `candidates` in declaration order.
///
/// `Ok(true)` on the first success and `Ok(false)` once every candidate was
/// rejected. Rejections are dropped; unrecoverable failures propagate.
pub(crate) fn first_match<F>(candidates: &[Schema], mut attempt: F) -> Result<bool, MatchFailure>
where
    F: FnMut(&Schema) -> Result<(), MatchFailure>,
{
    for (index, candidate) in candidates.iter().enumerate() {
        match attempt(candidate) {
            Ok(()) => return Ok(true),
            Err(failure) if failure.is_recoverable() => {
                trace!(
                    candidate = index,
                    kind = candidate.kind_name(),
                    path = %failure.path,
                    reason = %failure.reason,
                    "candidate rejected"
                );
            }
            Err(failure) => return Err(failure),
        }
    }
    Ok(false)
}

// ————————————————————————————————————————————————————————————————————————————
// ONE OF
// ————————————————————————————————————————————————————————————————————————————

/// Matches when any alternative matches the whole value.
#[derive(Debug, Clone)]
pub struct OneOf {
    alternatives: Vec<Schema>,
}

impl OneOf {
    pub fn new<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Self { alternatives: alternatives.into_iter().map(Into::into).collect() }
    }

    pub fn alternatives(&self) -> &[Schema] {
        &self.alternatives
    }

    pub fn matches<D: Descend>(&self, value: &Value, walker: &mut D) -> Result<(), MatchFailure> {
        if first_match(&self.alternatives, |alternative| walker.descend(alternative, value))? {
            return Ok(());
        }
        let reason = Reason::NoAlternative { tried: self.alternatives.len() };
        Err(walker.fail(reason, &Schema::OneOf(self.clone()), value))
    }
}

impl fmt::Display for OneOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("one_of(")?;
        write_joined(f, &self.alternatives)?;
        f.write_str(")")
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDERS
// ————————————————————————————————————————————————————————————————————————————

pub fn one_of<I, S>(alternatives: I) -> OneOf
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    OneOf::new(alternatives)
}

pub fn list_of<I, S>(element_schemas: I) -> ListOf
where
    I: IntoIterator<Item = S>,
    S: Into<Schema>,
{
    ListOf::new(element_schemas)
}

pub fn list_containing(target: impl Into<Schema>) -> ListContains {
    ListContains::new(target)
}
