//! Containers for the static storage of [`RecordInfo`].
//!
//! `Typed::record_info` returns a `&'static RecordInfo`, so the metadata
//! is built on first access and kept for the rest of the program.
//!
//! - Non-generic records use [`RecordInfoCell`], a plain [`OnceLock`].
//! - Generic records use [`GenericRecordInfoCell`]: a `static` inside a
//!   generic function is shared by every instantiation, so the cell is a
//!   map from [`TypeId`] to leaked metadata behind a [`RwLock`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::info::RecordInfo;

/// Storage for the [`RecordInfo`] of a non-generic record.
///
/// ```
/// use gj_reflect::info::{FieldInfo, RecordInfo, RecordInfoCell};
///
/// struct Foo;
///
/// fn foo_info() -> &'static RecordInfo {
///     static CELL: RecordInfoCell = RecordInfoCell::new();
///     CELL.get_or_init(|| RecordInfo::new::<Foo>([FieldInfo::new("a")]))
/// }
///
/// assert!(core::ptr::eq(foo_info(), foo_info()));
/// ```
pub struct RecordInfoCell(OnceLock<RecordInfo>);

impl RecordInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> RecordInfo) -> &RecordInfo {
        self.0.get_or_init(f)
    }
}

/// Storage for the [`RecordInfo`] of every instantiation of a generic record.
///
/// ```
/// use core::any::Any;
/// use gj_reflect::info::{FieldInfo, GenericRecordInfoCell, RecordInfo};
///
/// struct Page<T>(T);
///
/// fn page_info<T: Any>() -> &'static RecordInfo {
///     static CELL: GenericRecordInfoCell = GenericRecordInfoCell::new();
///     CELL.get_or_insert::<Page<T>>(|| RecordInfo::new::<Page<T>>([FieldInfo::new("items")]))
/// }
///
/// assert!(page_info::<u8>().type_is::<Page<u8>>());
/// assert!(page_info::<String>().type_is::<Page<String>>());
/// ```
pub struct GenericRecordInfoCell(RwLock<HashMap<TypeId, &'static RecordInfo, FixedState>>);

impl GenericRecordInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedState::with_seed(0))))
    }

    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> RecordInfo) -> &RecordInfo {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_or_insert_by_type_id(
        &self,
        type_id: TypeId,
        f: impl FnOnce() -> RecordInfo,
    ) -> &RecordInfo {
        let cached = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied();

        match cached {
            Some(info) => info,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: RecordInfo) -> &RecordInfo {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}
