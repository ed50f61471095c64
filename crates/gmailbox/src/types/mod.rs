//! Core types: message identifiers and decoded message records.

mod identifiers;
mod record;

pub use identifiers::{GmId, SeqNum, Uid};
pub use record::{FullRecord, HeaderRecord, MessageRecord, TeaserRecord};
