use std::fmt;

use crate::error::UsageError;

/// Upper bound used when none is configured.
pub const DEFAULT_MAX: usize = 999_999;

/// Inclusive `[min, max]` bound on a list length or a match count.
/// `max == usize::MAX` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quantifier {
    min: usize,
    max: usize,
}

impl Quantifier {
    /// Caller guarantees `min <= max`.
    pub(crate) const fn new_unchecked(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn between(min: usize, max: usize) -> Result<Self, UsageError> {
        if min > max {
            return Err(UsageError::InvertedBounds { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn at_least(min: usize) -> Self {
        Self { min, max: usize::MAX }
    }

    pub const fn exactly(count: usize) -> Self {
        Self { min: count, max: count }
    }

    pub fn min(&self) -> usize {
        self.min
    }
    pub fn max(&self) -> usize {
        self.max
    }
    pub fn is_unbounded(&self) -> bool {
        self.max == usize::MAX
    }
    pub fn contains(&self, n: usize) -> bool {
        self.min <= n && n <= self.max
    }

    pub fn with_min(self, min: usize) -> Result<Self, UsageError> {
        Self::between(min, self.max)
    }
    pub fn with_max(self, max: usize) -> Result<Self, UsageError> {
        Self::between(self.min, max)
    }

    /// Builder-call suffix for schema rendering, `None` when at `default`.
    pub(crate) fn builder_suffix(&self, default: Quantifier) -> Option<String> {
        if *self == default {
            None
        } else if self.min == self.max {
            Some(format!(".exactly({})", self.min))
        } else if self.is_unbounded() {
            Some(format!(".at_least({})", self.min))
        } else {
            Some(format!(".between({}, {})", self.min, self.max))
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "exactly {}", self.min)
        } else if self.is_unbounded() {
            write!(f, "at least {}", self.min)
        } else {
            write!(f, "between {} and {}", self.min, self.max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let q = Quantifier::between(2, 3).unwrap();
        assert!(!q.contains(1));
        assert!(q.contains(2));
        assert!(q.contains(3));
        assert!(!q.contains(4));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert!(matches!(
            Quantifier::between(5, 2),
            Err(UsageError::InvertedBounds { min: 5, max: 2 })
        ));
        assert!(Quantifier::exactly(4).with_max(3).is_err());
        assert!(Quantifier::exactly(4).with_min(3).is_ok());
    }

    #[test]
    fn renders_the_tightest_phrase() {
        assert_eq!(Quantifier::exactly(2).to_string(), "exactly 2");
        assert_eq!(Quantifier::at_least(1).to_string(), "at least 1");
        assert_eq!(Quantifier::between(0, 9).unwrap().to_string(), "between 0 and 9");
    }
}
