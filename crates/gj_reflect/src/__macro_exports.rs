//! Items named by `#[derive(Reflect)]` output.

pub use alloc::string::{String, ToString};
pub use core::option::Option;
pub use core::result::Result;
