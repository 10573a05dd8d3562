//! Restore facade

use crate::config::RestoreConfig;
use crate::error::{RestoreError, RestoreResult};
use crate::log::RestoreLog;
use crate::store::RestoreStore;
use cloze_codec::{RecordId, ResolvedSequence};
use cloze_delegation::{RecodeContext, RecoderRegistry};
use cloze_mapping::MappingTable;
use std::sync::Arc;

/// Relinks composite questions of one restore run
///
/// Holds the store being restored into, the run's mapping table, the
/// recoder registry and the batch log. The restore steps are implemented
/// as methods in their own modules:
///
/// - [`ClozeRestorer::process_composite`] while records are created
/// - [`ClozeRestorer::after_restore`] once all records exist
/// - [`ClozeRestorer::recode_response`], [`ClozeRestorer::recode_legacy_answer`]
///   and [`ClozeRestorer::recode_attempts`] for attempt data
#[derive(Debug)]
pub struct ClozeRestorer<S> {
    pub(crate) store: S,
    pub(crate) mapping: Arc<MappingTable>,
    pub(crate) registry: RecoderRegistry,
    pub(crate) config: RestoreConfig,
    pub(crate) log: RestoreLog,
    pub(crate) corrected: bool,
}

impl<S: RestoreStore> ClozeRestorer<S> {
    /// Create restorer with default config and built-in recoders
    #[must_use]
    pub fn new(store: S, mapping: Arc<MappingTable>) -> Self {
        Self {
            store,
            mapping,
            registry: RecoderRegistry::with_defaults(),
            config: RestoreConfig::default(),
            log: RestoreLog::new(),
            corrected: false,
        }
    }

    /// With config
    #[inline]
    #[must_use]
    pub fn with_config(mut self, config: RestoreConfig) -> Self {
        self.config = config;
        self
    }

    /// With recoder registry
    #[inline]
    #[must_use]
    pub fn with_registry(mut self, registry: RecoderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable store
    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Consume restorer, returning the store
    #[inline]
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Mapping table
    #[inline]
    #[must_use]
    pub fn mapping(&self) -> &Arc<MappingTable> {
        &self.mapping
    }

    /// Recoder registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &RecoderRegistry {
        &self.registry
    }

    /// Mutable recoder registry
    #[inline]
    pub fn registry_mut(&mut self) -> &mut RecoderRegistry {
        &mut self.registry
    }

    /// Config
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RestoreConfig {
        &self.config
    }

    /// Whether [`ClozeRestorer::after_restore`] has run
    #[inline]
    #[must_use]
    pub fn is_corrected(&self) -> bool {
        self.corrected
    }

    /// Batch log
    #[inline]
    #[must_use]
    pub fn log(&self) -> &RestoreLog {
        &self.log
    }

    pub(crate) fn recode_context(&self) -> RecodeContext<'_> {
        RecodeContext::new(&self.mapping)
    }

    /// Already recoded sequence of the composite owned by `question`
    pub(crate) fn stored_sequence(&self, question: RecordId) -> RestoreResult<ResolvedSequence> {
        let row = self
            .store
            .composite(question)?
            .ok_or(RestoreError::MissingComposite(question))?;
        row.sequence
            .parse()
            .map_err(|source| RestoreError::InvalidSequence { question, source })
    }
}
