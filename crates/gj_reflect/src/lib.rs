//! Runtime reflection for group-filtered JSON encoding.
//!
//! Every encodable type implements [`Reflect`], which hands out a
//! [`ReflectRef`] view describing what the value *is*: a record, a list, a
//! map, a scalar, a byte buffer, a reference, or a type that owns its JSON
//! form through a hook. Records also carry static metadata
//! ([`RecordInfo`](info::RecordInfo)) with the raw field tags that the
//! encoder parses into a schema.
//!
//! ```
//! use gj_reflect::{Reflect, ReflectRef, derive::Reflect};
//!
//! #[derive(Reflect)]
//! pub struct User {
//!     #[reflect(json = "id", groups = "public,admin")]
//!     pub id: u64,
//!     #[reflect(json = "email,omitempty", groups = "admin")]
//!     pub email: String,
//! }
//!
//! let user = User { id: 1, email: String::new() };
//! let ReflectRef::Record(record) = user.reflect_ref() else {
//!     unreachable!()
//! };
//! let info = record.record_info();
//! assert_eq!(info.field_len(), 2);
//! assert_eq!(info.field_at(1).unwrap().tag("groups"), Some("admin"));
//! ```

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names this crate `gj_reflect`, which must also resolve
// inside the crate itself (unit tests and doctests).
extern crate self as gj_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod impls;
pub mod info;
pub mod ops;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use gj_reflect_derive as derive;
pub use reflection::{Identity, Reflect, ReflectKind, ReflectRef, Scalar};
