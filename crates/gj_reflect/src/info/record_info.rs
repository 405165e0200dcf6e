use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::info::FieldInfo;

/// Metadata of a record type: its identity and declared fields.
#[derive(Clone, Debug)]
pub struct RecordInfo {
    type_path: &'static str,
    ty_id: TypeId,
    fields: Box<[FieldInfo]>,
}

impl RecordInfo {
    /// Creates the metadata of `T` from its fields in declaration order.
    pub fn new<T: Any>(fields: impl Into<Box<[FieldInfo]>>) -> Self {
        Self {
            type_path: core::any::type_name::<T>(),
            ty_id: TypeId::of::<T>(),
            fields: fields.into(),
        }
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldInfo> {
        self.fields.iter()
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn fields_keep_declaration_order() {
        struct Point;
        let info = RecordInfo::new::<Point>(vec![
            FieldInfo::new("y"),
            FieldInfo::new("x").with_tag("json", "abscissa"),
        ]);

        let names: alloc::vec::Vec<_> = info.iter().map(FieldInfo::name).collect();
        assert_eq!(names, ["y", "x"]);
        assert_eq!(info.index_of("x"), Some(1));
        assert_eq!(info.field("x").unwrap().tag("json"), Some("abscissa"));
        assert!(info.type_is::<Point>());
        assert!(info.type_path().ends_with("Point"));
    }
}
