//! Cloze Codec
//!
//! String formats stored on composite (cloze) questions and their attempts.
//!
//! # Core Concepts
//!
//! - [`RecordId`] / [`QuestionType`]: identifiers and type tags
//! - [`Sequence`]: comma-separated child identifiers stored on a composite
//! - [`ResolvedSequence`]: a sequence whose tokens were mapped to new ids
//! - [`LegacyAnswer`]: `position-value` pairs from legacy attempt states
//! - [`ResponsePayload`] / [`SubquestionView`]: `sub<N>_` prefixed responses
//! - [`find_descriptor`]: embedded `{N:TYPE:...}` descriptor detection
//!
//! # Example
//!
//! ```rust
//! use cloze_codec::{RecordId, Sequence};
//!
//! let sequence = Sequence::parse("5,7,9");
//! let resolution = sequence.resolve(|token| match token {
//!     "5" => RecordId::new(105),
//!     "9" => RecordId::new(109),
//!     _ => None,
//! });
//! assert_eq!(resolution.sequence.to_string(), "105,109");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod descriptor;
mod error;
mod ids;
mod legacy;
mod response;
mod sequence;

pub use descriptor::{find_descriptor, ChoiceLayout, Descriptor, DescriptorKind};
pub use error::CodecError;
pub use ids::{QuestionType, RecordId};
pub use legacy::{AnswerPair, LegacyAnswer, PairEntry, PAIR_SEPARATOR, POSITION_SEPARATOR};
pub use response::{subquestion_prefix, ResponseFields, ResponsePayload, SubquestionView};
pub use sequence::{Resolution, ResolvedSequence, Sequence, SEPARATOR};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
