//! Cloze Mapping
//!
//! Process-scoped lookup from `(namespace, old id)` to the id a record got
//! when it was recreated during restore.
//!
//! # Lifecycle
//!
//! 1. **Populate**: record-creation steps call [`MappingTable::set_mapping`]
//!    as rows are inserted. The table is shared (`Arc`) and written through
//!    `&self`.
//! 2. **Freeze**: once every record of the batch exists the orchestration
//!    calls [`MappingTable::freeze`]. Later writes fail.
//! 3. **Recode**: relinking passes only read. The table is dropped with the
//!    restore run.
//!
//! Missing entries mean "not created" or "intentionally dropped". They are
//! reported as `None`, never as zero.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod namespace;
mod table;

pub use namespace::Namespace;
pub use table::{MappingEntry, MappingError, MappingTable};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
