//! Mapping namespaces

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Namespace of a mapping entry (the kind of record that was recreated)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace(String);

impl Namespace {
    /// Every restored question, created or matched to an existing one
    pub const QUESTION: &'static str = "question";
    /// Questions that restore actually created
    pub const QUESTION_CREATED: &'static str = "question_created";
    /// Composite option rows
    pub const COMPOSITE: &'static str = "question_multianswerrgx";
    /// Answer rows of sub-questions
    pub const QUESTION_ANSWER: &'static str = "question_answer";

    /// Create namespace
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// `question`
    #[inline]
    #[must_use]
    pub fn question() -> Self {
        Self::new(Self::QUESTION)
    }

    /// `question_created`
    #[inline]
    #[must_use]
    pub fn question_created() -> Self {
        Self::new(Self::QUESTION_CREATED)
    }

    /// `question_multianswerrgx`
    #[inline]
    #[must_use]
    pub fn composite() -> Self {
        Self::new(Self::COMPOSITE)
    }

    /// `question_answer`
    #[inline]
    #[must_use]
    pub fn question_answer() -> Self {
        Self::new(Self::QUESTION_ANSWER)
    }

    /// Namespace name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Namespace {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
