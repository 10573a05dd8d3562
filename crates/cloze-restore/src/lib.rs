//! Cloze Restore
//!
//! Relinks composite (cloze) questions after a backup restore reassigned
//! their ids.
//!
//! # Restore lifecycle
//!
//! 1. **Creation**: for every composite row in the backup,
//!    [`ClozeRestorer::process_composite`] inserts a row with the raw
//!    sequence and records the row mapping.
//! 2. **Correction**: once every record exists,
//!    [`ClozeRestorer::after_restore`] freezes the mapping table, recodes
//!    each sequence to the new child ids and switches off answer shuffling
//!    on plain multichoice children.
//! 3. **Attempts**: [`ClozeRestorer::recode_response`] and
//!    [`ClozeRestorer::recode_legacy_answer`] hand each position's data to
//!    the child's recoder and reassemble the result.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cloze_codec::RecordId;
//! use cloze_mapping::{MappingTable, Namespace};
//! use cloze_restore::{ClozeRestorer, MemoryStore, RestoreStore};
//!
//! let id = |v| RecordId::new(v).unwrap();
//! let mapping = Arc::new(MappingTable::new());
//! mapping.set_mapping(&Namespace::question_created(), id(12), id(112)).unwrap();
//! mapping.set_mapping(&Namespace::question(), id(5), id(105)).unwrap();
//! mapping.set_mapping(&Namespace::question(), id(9), id(109)).unwrap();
//!
//! let mut store = MemoryStore::new();
//! store.insert_composite(id(112), "5,7,9").unwrap();
//!
//! let mut restorer = ClozeRestorer::new(store, mapping);
//! restorer.after_restore().unwrap();
//!
//! let row = restorer.store().composite(id(112)).unwrap().unwrap();
//! assert_eq!(row.sequence, "105,109");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod batch;
mod bundle;
mod composite;
mod config;
mod corrector;
mod error;
mod legacy;
mod log;
mod response;
mod restorer;
mod store;

pub use batch::{AttemptItem, BatchReport, ItemOutcome, ResponseStep};
pub use bundle::{RestoreBundle, RunReport};
pub use composite::CompositeData;
pub use config::{Namespaces, PositionPolicy, RestoreConfig};
pub use corrector::CorrectionReport;
pub use error::{
    BundleError, ConfigError, IntegrityWarning, RestoreError, RestoreResult, SkipReason, SkippedPair,
    StorageError,
};
pub use legacy::{LegacyRecodeOutcome, LegacyState};
pub use log::{LogEntry, LogLevel, RestoreLog};
pub use restorer::ClozeRestorer;
pub use store::{ChoiceOptions, CompositeRow, MemoryStore, QuestionRecord, RestoreStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
