//! Static metadata of record types.
//!
//! [`RecordInfo`] lists the declared fields of a record in source order;
//! each [`FieldInfo`] carries the field identifier, its visibility, whether
//! it is an anonymous embedding, and the raw tag strings written in
//! `#[reflect(...)]`. Tag *parsing* is left to the consumer, since the
//! meaning of a tag (and which key holds the visibility groups) is a
//! property of the encoding, not of the type.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod field_info;
mod record_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericRecordInfoCell, RecordInfoCell};
pub use field_info::FieldInfo;
pub use record_info::RecordInfo;
pub use typed::Typed;
