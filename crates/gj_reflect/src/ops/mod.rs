//! Views over the structural kinds of [`ReflectRef`](crate::ReflectRef).

// -----------------------------------------------------------------------------
// Modules

mod guarded;
mod hooks;
mod list;
mod map;
mod record;

// -----------------------------------------------------------------------------
// Exports

pub use guarded::{BorrowError, Borrowed, Guarded};
pub use hooks::{HookError, MarshalJson, MarshalText};
pub use list::List;
pub use map::{Map, MapIter, MapKey};
pub use record::Record;
