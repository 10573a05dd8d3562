//! Record identifiers and question type tags

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU64;
use std::str::FromStr;

/// Identifier of a stored record (question, composite row, answer, ...)
///
/// Identifiers are strictly positive. A zero id cannot be constructed, so an
/// absent mapping can never masquerade as a real record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(NonZeroU64);

impl RecordId {
    /// Create id from a raw value, `None` for zero
    #[inline]
    #[must_use]
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    /// Raw numeric value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for RecordId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<NonZeroU64>()
            .map(Self)
            .map_err(|_| CodecError::InvalidId(s.to_string()))
    }
}

/// Question type tag carried on every question record
///
/// Tags are compared verbatim (`"multichoice"`, `"shortanswer"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionType(String);

impl QuestionType {
    /// Multiple-choice sub-question
    pub const MULTICHOICE: &'static str = "multichoice";
    /// Short free-text answer
    pub const SHORTANSWER: &'static str = "shortanswer";
    /// Numeric answer with tolerance
    pub const NUMERICAL: &'static str = "numerical";
    /// Regular-expression matched answer
    pub const REGEXP: &'static str = "regexp";
    /// The composite question itself
    pub const MULTIANSWERRGX: &'static str = "multianswerrgx";

    /// Create tag
    #[inline]
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Tag text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check tag against a literal
    #[inline]
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.0 == tag
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionType {
    fn from(tag: &str) -> Self {
        Self(tag.to_string())
    }
}

impl From<String> for QuestionType {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl Borrow<str> for QuestionType {
    fn borrow(&self) -> &str {
        &self.0
    }
}
