//! Group-filtered JSON encoding.
//!
//! Fields of a record declare the visibility groups they belong to; an
//! encode call names the groups it asks for, and only matching fields are
//! written. Nested records are filtered the same way, so a field is only
//! present if every record on its path let it through.
//!
//! Beyond filtering, the output follows the usual JSON encoder contract:
//! `omitempty`/`omitzero`/`string` field options, JSON and text hooks,
//! base64 byte buffers, optional HTML escaping and map key sorting.
//!
//! The encoder is bounded: it stops at a configurable depth (truncating or
//! failing) and reports reference cycles instead of looping.

// -----------------------------------------------------------------------------
// Extern

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod context;
mod encoder;
mod pool;

pub mod config;
pub mod error;
pub mod filter;
pub mod schema;

mod marshal;
mod write;

// -----------------------------------------------------------------------------
// Exports

pub use config::{CutoffCollection, DepthPolicy, EncodeConfig, GroupMode};
pub use error::{EncodeError, ErrorKind, ErrorPath, PathSegment, Result};
pub use filter::include;
pub use marshal::{Marshaller, encode_to, marshal, marshal_to_value};
pub use schema::{FieldDescriptor, SchemaCache, TypeSchema};
pub use write::write_value;
