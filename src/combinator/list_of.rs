use std::fmt;

use serde_json::Value;

use super::{Descend, Quantifier, first_match, quantifier::DEFAULT_MAX};
use crate::error::{MatchFailure, PathSegment, Reason, UsageError};
use crate::schema::{Schema, write_joined};

const DEFAULT_BOUNDS: Quantifier = Quantifier::new_unchecked(0, DEFAULT_MAX);

/// A list whose length lies within bounds and whose every element matches
/// at least one element schema.
///
/// ```
/// use structure_match::{list_of, TypeTag};
///
/// let exact = list_of([TypeTag::Integer]).with_count(2).exactly().unwrap();
/// let open = list_of([TypeTag::String]).at_least(1);
/// # let _ = (exact, open);
/// ```
#[derive(Debug, Clone)]
pub struct ListOf {
    element_schemas: Vec<Schema>,
    bounds: Quantifier,
}

impl ListOf {
    pub fn new<I, S>(element_schemas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Self {
            element_schemas: element_schemas.into_iter().map(Into::into).collect(),
            bounds: DEFAULT_BOUNDS,
        }
    }

    pub fn element_schemas(&self) -> &[Schema] {
        &self.element_schemas
    }
    pub fn bounds(&self) -> Quantifier {
        self.bounds
    }

    // -------------------------------- bounds -------------------------------- //

    pub fn between(mut self, min: usize, max: usize) -> Result<Self, UsageError> {
        self.bounds = Quantifier::between(min, max)?;
        Ok(self)
    }

    pub fn at_least(mut self, min: usize) -> Self {
        self.bounds = Quantifier::at_least(min);
        self
    }

    /// Stages `count` for one of the finalizers on [`StagedListOf`].
    pub fn with_count(self, count: usize) -> StagedListOf {
        StagedListOf { list: self, count }
    }

    // Finalizers reached without `with_count`, e.g. a second finalizer in a
    // row. They only report the misuse.

    pub fn exactly(self) -> Result<Self, UsageError> {
        Err(UsageError::NoStagedCount { finalizer: "exactly" })
    }
    pub fn at_most(self) -> Result<Self, UsageError> {
        Err(UsageError::NoStagedCount { finalizer: "at_most" })
    }
    pub fn at_least_staged(self) -> Result<Self, UsageError> {
        Err(UsageError::NoStagedCount { finalizer: "at_least_staged" })
    }

    pub(crate) fn shallow(&self) -> Self {
        Self { element_schemas: Vec::new(), bounds: self.bounds }
    }

    // -------------------------------- match --------------------------------- //

    pub fn matches<D: Descend>(&self, value: &Value, walker: &mut D) -> Result<(), MatchFailure> {
        let Value::Array(items) = value else {
            return Err(walker.fail(Reason::NotASequence, &self.to_schema(), value));
        };
        if !self.bounds.contains(items.len()) {
            let reason = Reason::LengthOutOfRange { len: items.len(), bounds: self.bounds };
            return Err(walker.fail(reason, &self.to_schema(), value));
        }
        for (index, item) in items.iter().enumerate() {
            // a lone element schema reports its own, more precise failure
            if let [only] = self.element_schemas.as_slice() {
                walker.descend_index(index, only, item)?;
                continue;
            }
            let matched = first_match(&self.element_schemas, |schema| {
                walker.descend_index(index, schema, item)
            })?;
            if !matched {
                let reason = Reason::NoAlternative { tried: self.element_schemas.len() };
                let failure = walker.fail(reason, &self.to_schema(), item);
                return Err(failure.within(PathSegment::Index(index)));
            }
        }
        Ok(())
    }

    fn to_schema(&self) -> Schema {
        Schema::ListOf(self.clone())
    }
}

/// A [`ListOf`] holding a count from [`ListOf::with_count`].
///
/// It does not convert into a [`Schema`]; one of the finalizers must turn
/// the count into bounds first.
///
/// ```compile_fail
/// use structure_match::{list_of, Schema, TypeTag};
///
/// let schema: Schema = list_of([TypeTag::Integer]).with_count(3).into();
/// ```
#[derive(Debug, Clone)]
#[must_use = "a staged count has no effect until finalized"]
pub struct StagedListOf {
    list: ListOf,
    count: usize,
}

impl StagedListOf {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn exactly(mut self) -> Result<ListOf, UsageError> {
        self.list.bounds = Quantifier::exactly(self.count);
        Ok(self.list)
    }

    /// Keeps the current minimum.
    pub fn at_most(mut self) -> Result<ListOf, UsageError> {
        self.list.bounds = self.list.bounds.with_max(self.count)?;
        Ok(self.list)
    }

    /// Keeps the current maximum.
    pub fn at_least_staged(mut self) -> Result<ListOf, UsageError> {
        self.list.bounds = self.list.bounds.with_min(self.count)?;
        Ok(self.list)
    }

    pub fn elements(self) -> Result<ListOf, UsageError> {
        self.exactly()
    }
    pub fn items(self) -> Result<ListOf, UsageError> {
        self.exactly()
    }
    pub fn elements_at_most(self) -> Result<ListOf, UsageError> {
        self.at_most()
    }
    pub fn elements_at_least(self) -> Result<ListOf, UsageError> {
        self.at_least_staged()
    }
}

impl fmt::Display for ListOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a_list_of(")?;
        write_joined(f, &self.element_schemas)?;
        f.write_str(")")?;
        if let Some(suffix) = self.bounds.builder_suffix(DEFAULT_BOUNDS) {
            f.write_str(&suffix)?;
        }
        Ok(())
    }
}
