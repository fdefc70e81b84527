use std::fmt;

use regex::Regex;

use crate::error::UsageError;

/// Regex schema node. Matches strings whose *whole* content matches.
///
/// The source regex is kept for display; matching goes through an anchored
/// copy so `a|ab` accepts `"ab"` instead of stopping at the leftmost `a`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: Regex,
    anchored: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, UsageError> {
        Self::try_from(Regex::new(source)?)
    }

    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }

    pub fn is_full_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }
}

impl TryFrom<Regex> for Pattern {
    type Error = UsageError;

    fn try_from(source: Regex) -> Result<Self, Self::Error> {
        let anchored = match Regex::new(&format!(r"\A(?:{})\z", source.as_str())) {
            Ok(anchored) => anchored,
            // a trailing `# comment` in verbose mode swallows the closing
            // paren; end the comment before it
            Err(regex::Error::Syntax(_)) => {
                Regex::new(&format!("\\A(?:{}\n)\\z", source.as_str()))?
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { source, anchored })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source.as_str())
    }
}
