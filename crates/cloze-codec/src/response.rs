//! Response payloads and per-position views
//!
//! A composite attempt step stores all sub-question fields in one flat map,
//! namespaced by position: `sub1_answer`, `sub2_answer`, `sub2__order`, ...

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Unprefixed fields handed to, and returned by, a sub-question recoder
pub type ResponseFields = IndexMap<String, String>;

/// Field-name prefix for 1-based `position`, e.g. `sub2_`
#[inline]
#[must_use]
pub fn subquestion_prefix(base: &str, position: usize) -> String {
    format!("{base}{position}_")
}

/// Flat response data of one attempt step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsePayload(IndexMap<String, String>);

impl ResponsePayload {
    /// Create empty payload
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Get field value
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Insert or overwrite field, returning the previous value
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    /// Number of fields
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if payload has no fields
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write `fields` back under `prefix`, overwriting colliding keys
    pub fn merge_prefixed(&mut self, prefix: &str, fields: ResponseFields) {
        for (name, value) in fields {
            self.0.insert(format!("{prefix}{name}"), value);
        }
    }

    /// Underlying map
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.0
    }
}

impl From<IndexMap<String, String>> for ResponsePayload {
    fn from(fields: IndexMap<String, String>) -> Self {
        Self(fields)
    }
}

impl<K, V> FromIterator<(K, V)> for ResponsePayload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Read-only view of the fields belonging to one position
#[derive(Debug, Clone)]
pub struct SubquestionView<'a> {
    payload: &'a ResponsePayload,
    prefix: String,
}

impl<'a> SubquestionView<'a> {
    /// View over `payload` for 1-based `position`
    #[must_use]
    pub fn new(payload: &'a ResponsePayload, base: &str, position: usize) -> Self {
        Self {
            payload,
            prefix: subquestion_prefix(base, position),
        }
    }

    /// Prefix this view strips
    #[inline]
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get an unprefixed field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.payload.0.get(&self.add_prefix(name)).map(String::as_str)
    }

    /// All fields under the prefix, prefix stripped, in payload order
    #[must_use]
    pub fn fields(&self) -> ResponseFields {
        self.payload
            .0
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(self.prefix.as_str())
                    .map(|stripped| (stripped.to_string(), value.clone()))
            })
            .collect()
    }

    /// Full payload key for an unprefixed name
    #[inline]
    #[must_use]
    pub fn add_prefix(&self, name: &str) -> String {
        format!("{}{name}", self.prefix)
    }
}
