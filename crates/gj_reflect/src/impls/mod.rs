//! [`Reflect`](crate::Reflect) implementations for std types.

mod cells;
mod collections;
mod json;
mod maps;
mod opaque;
mod pointers;
mod scalars;

pub use json::RawJson;
