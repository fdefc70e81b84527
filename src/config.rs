//! Matcher settings.
//!
//! `MatchConfig` is plain serde data so a host can embed it in its own
//! settings file:
//!
//! ```toml
//! [structure_match]
//! max_depth = 64
//! ```
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Deepest nesting the comparator will descend into before failing with
    /// a depth error instead of exhausting the stack.
    pub max_depth: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

impl MatchConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
