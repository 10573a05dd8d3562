//! Cloze Delegation
//!
//! Sub-questions of a composite recode their own answer data. This crate
//! maps a question type tag to the recoder that knows that type's format.
//!
//! # Core Concepts
//!
//! - [`SubquestionRecoder`]: capability implemented once per question type
//! - [`RecoderRegistry`]: tag → recoder lookup, extended without touching
//!   the relinking core
//! - [`PassthroughRecoder`]: text-valued types whose answers hold no ids
//! - [`ChoiceRecoder`]: choice types whose answers reference answer rows
//!
//! # Example
//!
//! ```rust
//! use cloze_codec::{RecordId, ResponseFields};
//! use cloze_delegation::{RecodeContext, RecoderRegistry};
//! use cloze_mapping::MappingTable;
//!
//! let registry = RecoderRegistry::with_defaults();
//! let mapping = MappingTable::new();
//! let ctx = RecodeContext::new(&mapping);
//!
//! let mut fields = ResponseFields::new();
//! fields.insert("answer".to_string(), "Owl".to_string());
//!
//! let question = RecordId::new(14).unwrap();
//! let recoded = registry
//!     .recode_response(&ctx, &"shortanswer".into(), question, 1, fields.clone())
//!     .unwrap();
//! assert_eq!(recoded, fields);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod builtin;
mod error;
mod recoder;
mod registry;

pub use builtin::{ChoiceRecoder, PassthroughRecoder, ORDER_FIELD};
pub use error::DelegationError;
pub use recoder::{RecodeContext, SubquestionRecoder, SubquestionState};
pub use registry::RecoderRegistry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
