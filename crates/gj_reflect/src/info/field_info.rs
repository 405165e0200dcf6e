use alloc::vec::Vec;

use crate::info::{RecordInfo, Typed};

/// A declared field of a record.
///
/// ```
/// use gj_reflect::info::FieldInfo;
///
/// let field = FieldInfo::new("email")
///     .with_tag("json", "email,omitempty")
///     .with_tag("groups", "admin");
///
/// assert_eq!(field.name(), "email");
/// assert!(field.is_exported());
/// assert_eq!(field.tag("json"), Some("email,omitempty"));
/// assert_eq!(field.tag("roles"), None);
/// ```
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    exported: bool,
    // Resolved lazily; the embedded type may not have built its info yet.
    embedded: Option<fn() -> &'static RecordInfo>,
    tags: Vec<(&'static str, &'static str)>,
}

impl FieldInfo {
    /// Creates an exported, non-embedded field without tags.
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            exported: true,
            embedded: None,
            tags: Vec::new(),
        }
    }

    /// Marks the field as not visible outside its defining module.
    #[inline]
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Marks the field as an anonymous embedding of record `T`.
    #[inline]
    pub fn embedded<T: Typed>(mut self) -> Self {
        self.embedded = Some(T::record_info);
        self
    }

    /// Attaches a raw tag. A repeated key replaces the earlier value.
    pub fn with_tag(mut self, key: &'static str, value: &'static str) -> Self {
        match self.tags.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.tags.push((key, value)),
        }
        self
    }

    /// The field identifier as declared.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn is_exported(&self) -> bool {
        self.exported
    }

    #[inline]
    pub const fn is_embedded(&self) -> bool {
        self.embedded.is_some()
    }

    /// Metadata of the embedded record, if this field is an embedding.
    #[inline]
    pub fn embedded_info(&self) -> Option<&'static RecordInfo> {
        self.embedded.map(|f| f())
    }

    /// Returns the raw value of tag `key`.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    /// Iterates over all `(key, value)` tags in declaration order.
    pub fn tags(&self) -> impl ExactSizeIterator<Item = (&'static str, &'static str)> + '_ {
        self.tags.iter().copied()
    }
}
