use alloc::boxed::Box;
use core::{error, fmt, ops::Deref};

use crate::Reflect;

/// A borrowed view into a [`Guarded`] cell, released on drop.
pub type Borrowed<'a> = Box<dyn Deref<Target = dyn Reflect> + 'a>;

/// A cell whose content can only be read through a guard.
///
/// The encoder holds the guard for the whole subtree below the cell.
pub trait Guarded {
    fn try_borrow(&self) -> Result<Borrowed<'_>, BorrowError>;
}

/// The reason a [`Guarded`] cell could not be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowError {
    /// A `RefCell` is mutably borrowed.
    MutablyBorrowed,
    /// A lock is held by someone else, or by the current thread higher up.
    WouldBlock,
}

impl fmt::Display for BorrowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MutablyBorrowed => f.write_str("value is already mutably borrowed"),
            Self::WouldBlock => f.write_str("lock is held elsewhere"),
        }
    }
}

impl error::Error for BorrowError {}
