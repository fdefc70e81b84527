use std::fmt;

use serde_json::Value;
use tracing::trace;

use super::{Descend, Quantifier, quantifier::DEFAULT_MAX};
use crate::error::{MatchFailure, Reason, UsageError};
use crate::schema::{Schema, TypeTag};

const DEFAULT_BOUNDS: Quantifier = Quantifier::new_unchecked(1, DEFAULT_MAX);

/// A list holding between `min` and `max` elements that match the target.
/// Other elements are ignored. Unconfigured, at least one must match.
#[derive(Debug, Clone)]
pub struct ListContains {
    target: Box<Schema>,
    bounds: Quantifier,
}

impl ListContains {
    pub fn new(target: impl Into<Schema>) -> Self {
        Self { target: Box::new(target.into()), bounds: DEFAULT_BOUNDS }
    }

    pub fn target(&self) -> &Schema {
        &self.target
    }
    pub fn bounds(&self) -> Quantifier {
        self.bounds
    }

    pub fn exactly(mut self, count: usize) -> Self {
        self.bounds = Quantifier::exactly(count);
        self
    }

    pub fn between(mut self, min: usize, max: usize) -> Result<Self, UsageError> {
        self.bounds = Quantifier::between(min, max)?;
        Ok(self)
    }

    pub fn at_least(mut self, min: usize) -> Self {
        self.bounds = Quantifier::at_least(min);
        self
    }

    pub fn at_most(mut self, max: usize) -> Result<Self, UsageError> {
        self.bounds = self.bounds.with_max(max)?;
        Ok(self)
    }

    /// Reads as `list_containing(s).exactly(2).times()`.
    pub fn times(self) -> Self {
        self
    }

    pub fn matches<D: Descend>(&self, value: &Value, walker: &mut D) -> Result<(), MatchFailure> {
        let Value::Array(items) = value else {
            return Err(walker.fail(Reason::NotASequence, &self.to_schema(), value));
        };
        let mut count = 0;
        for (index, item) in items.iter().enumerate() {
            match walker.descend_index(index, &self.target, item) {
                Ok(()) => count += 1,
                Err(failure) if failure.is_recoverable() => {
                    trace!(index, reason = %failure.reason, "element does not count");
                }
                Err(failure) => return Err(failure),
            }
        }
        if !self.bounds.contains(count) {
            let reason = Reason::CountOutOfRange { count, bounds: self.bounds };
            return Err(walker.fail(reason, &self.to_schema(), value));
        }
        Ok(())
    }

    fn to_schema(&self) -> Schema {
        Schema::ListContains(self.clone())
    }

    pub(crate) fn shallow(&self) -> Self {
        Self { target: Box::new(Schema::Type(TypeTag::Any)), bounds: self.bounds }
    }
}

impl fmt::Display for ListContains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a_list_with({})", self.target)?;
        if let Some(suffix) = self.bounds.builder_suffix(DEFAULT_BOUNDS) {
            f.write_str(&suffix)?;
        }
        Ok(())
    }
}
