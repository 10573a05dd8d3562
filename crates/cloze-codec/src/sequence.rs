//! Composite sequence codec
//!
//! A composite question stores the ids of its sub-questions as one
//! comma-separated string. Position `i` in that list (1-based) is the
//! `{#i}` gap in the composite's text.

use crate::error::CodecError;
use crate::ids::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between sequence tokens
pub const SEPARATOR: char = ',';

/// Raw sequence as stored, split into non-empty tokens
///
/// Tokens are not validated here. Resolution decides what a token means.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    tokens: Vec<String>,
    raw_count: usize,
}

impl Sequence {
    /// Split a stored sequence, dropping empty tokens
    ///
    /// The raw token count is `commas + 1`, so an empty string counts as one
    /// (empty) token and is reported by [`Sequence::is_consistent`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let tokens = raw
            .split(SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            tokens,
            raw_count: raw.matches(SEPARATOR).count() + 1,
        }
    }

    /// Non-empty tokens in stored order
    #[inline]
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Number of non-empty tokens
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Check if no token survived the split
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
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
        self.raw_count == self.tokens.len()
    }

    /// Map every token to a new id, excising tokens that do not resolve
    ///
    /// Order of resolved ids follows token order. Unresolved tokens are
    /// collected so callers can report them.
    pub fn resolve<F>(&self, mut resolver: F) -> Resolution
    where
        F: FnMut(&str) -> Option<RecordId>,
    {
        let mut ids = Vec::with_capacity(self.tokens.len());
        let mut unresolved = Vec::new();

        for token in &self.tokens {
            match resolver(token.as_str()) {
                Some(id) => ids.push(id),
                None => unresolved.push(token.clone()),
            }
        }

        Resolution {
            sequence: ResolvedSequence(ids),
            unresolved,
        }
    }
}

/// Outcome of [`Sequence::resolve`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Ids that resolved, in original order
    pub sequence: ResolvedSequence,

    /// Tokens with no mapping, in original order
    pub unresolved: Vec<String>,
}

/// Sequence of sub-question ids addressable by 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedSequence(Vec<RecordId>);

impl ResolvedSequence {
    /// Create from ids
    #[inline]
    #[must_use]
    pub fn new(ids: Vec<RecordId>) -> Self {
        Self(ids)
    }

    /// Ids in position order
    #[inline]
    #[must_use]
    pub fn ids(&self) -> &[RecordId] {
        &self.0
    }

    /// Number of positions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if sequence has no positions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Id at 1-based `position`
    #[inline]
    #[must_use]
    pub fn at(&self, position: usize) -> Option<RecordId> {
        position
            .checked_sub(1)
            .and_then(|index| self.0.get(index))
            .copied()
    }

    /// Iterate `(position, id)` with 1-based positions
    pub fn positions(&self) -> impl Iterator<Item = (usize, RecordId)> + '_ {
        self.0.iter().enumerate().map(|(i, id)| (i + 1, *id))
    }

    /// Comma-joined form for storage
    #[inline]
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl Display for ResolvedSequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{id}")?;
        }
        Ok(())
    }
}

impl FromStr for ResolvedSequence {
    type Err = CodecError;

    /// Parse an already recoded sequence, empty tokens skipped
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(SEPARATOR)
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<RecordId>> for ResolvedSequence {
    fn from(ids: Vec<RecordId>) -> Self {
        Self(ids)
    }
}

impl FromIterator<RecordId> for ResolvedSequence {
    fn from_iter<I: IntoIterator<Item = RecordId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
