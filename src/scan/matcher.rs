//! Payload pattern matching.

use regex::{Regex, RegexBuilder};

use crate::error::{Error, PatternError};

/// A compiled search pattern.
///
/// Immutable once built and safe to share by reference across workers;
/// `regex::Regex` is internally synchronized for concurrent use.
#[derive(Debug)]
pub struct PayloadMatcher {
    regex: Regex,
    pattern: String,
}

impl PayloadMatcher {
    /// Compile a pattern, optionally case-insensitive.
    ///
    /// Fails before any packet is read if the pattern is not a valid
    /// regular expression.
    pub fn compile(pattern: &str, case_insensitive: bool) -> Result<Self, Error> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| {
                Error::Pattern(PatternError::Invalid {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })
            })?;

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
        })
    }

    /// Search semantics: true iff the pattern occurs anywhere in the payload.
    ///
    /// Payload bytes are decoded permissively; invalid sequences are
    /// replaced rather than causing a failure, so matching never fails on
    /// malformed encodings.
    pub fn matches(&self, payload: &[u8]) -> bool {
        self.regex.is_match(&String::from_utf8_lossy(payload))
    }

    /// The original pattern text, as supplied by the user.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
