//! Legacy answer string codec
//!
//! Legacy attempt states store a composite answer as comma-separated
//! `position-value` pairs, e.g. `1-Owl,2-Pussy-cat`. Only the first hyphen
//! of a pair separates position from value; the value itself is opaque and
//! belongs to the sub-question's type.

use crate::error::CodecError;
use std::fmt::{self, Display, Formatter};

/// Separator between pairs
pub const PAIR_SEPARATOR: char = ',';

/// Separator between position and value inside a pair
pub const POSITION_SEPARATOR: char = '-';

/// One `position-value` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerPair {
    position: String,
    value: String,
}

impl AnswerPair {
    /// Create pair from its parts
    #[inline]
    #[must_use]
    pub fn new(position: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            value: value.into(),
        }
    }

    /// Position text exactly as stored
    #[inline]
    #[must_use]
    pub fn position_text(&self) -> &str {
        &self.position
    }

    /// Opaque value
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// 1-based position into the composite sequence
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidPosition`] unless the position is a
    /// positive integer
    pub fn position(&self) -> Result<usize, CodecError> {
        match self.position.trim().parse::<usize>() {
            Ok(position) if position > 0 => Ok(position),
            _ => Err(CodecError::InvalidPosition(self.position.clone())),
        }
    }

    /// Same position, new value
    #[inline]
    #[must_use]
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Self {
            position: self.position.clone(),
            value: value.into(),
        }
    }
}

impl Display for AnswerPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{POSITION_SEPARATOR}{}", self.position, self.value)
    }
}

/// Token of a legacy answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairEntry {
    /// Well-formed `position-value` pair
    Pair(AnswerPair),

    /// Token without any hyphen, kept verbatim
    Malformed(String),
}

impl PairEntry {
    fn parse(token: &str) -> Self {
        match token.split_once(POSITION_SEPARATOR) {
            Some((position, value)) => Self::Pair(AnswerPair::new(position, value)),
            None => Self::Malformed(token.to_string()),
        }
    }
}

impl Display for PairEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pair(pair) => write!(f, "{pair}"),
            Self::Malformed(raw) => f.write_str(raw),
        }
    }
}

/// Parsed legacy answer string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyAnswer {
    entries: Vec<PairEntry>,
    raw_count: usize,
}

impl LegacyAnswer {
    /// Split an answer into pairs, dropping empty tokens
    ///
    /// An empty answer has no pairs and is consistent.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let entries: Vec<_> = raw
            .split(PAIR_SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(PairEntry::parse)
            .collect();

        Self {
            entries,
            raw_count: raw.matches(PAIR_SEPARATOR).count() + 1,
        }
    }

    /// Build from entries (recoded output)
    #[must_use]
    pub fn from_entries(entries: Vec<PairEntry>) -> Self {
        let raw_count = entries.len();
        Self { entries, raw_count }
    }

    /// Entries in stored order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[PairEntry] {
        &self.entries
    }

    /// Number of non-empty tokens
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if answer has no tokens
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Token count before empty tokens were dropped
    #[inline]
    #[must_use]
    pub fn raw_token_count(&self) -> usize {
        self.raw_count
    }

    /// Check that no empty token was dropped
    #[inline]
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.raw_count == self.entries.len()
    }
}

impl Display for LegacyAnswer {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "{PAIR_SEPARATOR}")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
