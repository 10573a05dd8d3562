//! Restore configuration

use crate::error::ConfigError;
use cloze_codec::QuestionType;
use cloze_mapping::Namespace;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with a legacy answer pair that cannot be delegated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionPolicy {
    /// Keep the pair verbatim and report it
    #[default]
    Skip,
    /// Fail the whole answer
    Fail,
}

/// Mapping namespaces consulted by the restore steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespaces {
    /// Restored questions (sequence tokens resolve here)
    pub question: Namespace,
    /// Questions created by this restore
    pub question_created: Namespace,
    /// Composite option rows
    pub composite: Namespace,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            question: Namespace::question(),
            question_created: Namespace::question_created(),
            composite: Namespace::composite(),
        }
    }
}

/// Restore configuration
///
/// Every field has a default, so a TOML file only lists what it changes:
///
/// ```toml
/// subquestion_prefix = "sub"
/// position_policy = "fail"
///
/// [namespaces]
/// question = "question"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Mapping namespaces
    pub namespaces: Namespaces,
    /// Response field prefix base (`sub` gives `sub1_`, `sub2_`, ...)
    pub subquestion_prefix: String,
    /// Child type whose shuffle flag the corrector inspects
    pub choice_type: QuestionType,
    /// Handling of unusable legacy answer pairs
    pub position_policy: PositionPolicy,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            namespaces: Namespaces::default(),
            subquestion_prefix: "sub".to_string(),
            choice_type: QuestionType::MULTICHOICE.into(),
            position_policy: PositionPolicy::Skip,
        }
    }
}

impl RestoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With namespaces
    #[inline]
    #[must_use]
    pub fn with_namespaces(mut self, namespaces: Namespaces) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// With response field prefix base
    #[inline]
    #[must_use]
    pub fn with_subquestion_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subquestion_prefix = prefix.into();
        self
    }

    /// With choice type checked by the corrector
    #[inline]
    #[must_use]
    pub fn with_choice_type(mut self, choice_type: impl Into<QuestionType>) -> Self {
        self.choice_type = choice_type.into();
        self
    }

    /// With legacy position policy
    #[inline]
    #[must_use]
    pub fn with_position_policy(mut self, policy: PositionPolicy) -> Self {
        self.position_policy = policy;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on invalid TOML or unknown values
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?config, "restore config loaded");
        Ok(config)
    }
}
