//! Per-type field schemas and their cache.
//!
//! A [`TypeSchema`] is the ordered list of fields a record type emits,
//! with embedded records flattened into their parent. It is built once per
//! `(type, tag key)` pair from the record's static [`RecordInfo`] and then
//! shared behind an [`Arc`] by every encode call.

// -----------------------------------------------------------------------------
// Modules

mod tag;

// -----------------------------------------------------------------------------
// Internal

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use std::sync::{PoisonError, RwLock};

use foldhash::fast::RandomState;
use gj_reflect::info::RecordInfo;
use hashbrown::{Equivalent, HashMap, HashSet};
use log::{debug, trace};

pub use tag::JSON_TAG;

use tag::{JsonTag, parse_groups};

// -----------------------------------------------------------------------------
// FieldDescriptor

/// One emitted field of a record type.
#[derive(Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    source_path: Box<[usize]>,
    name: &'static str,
    omit_empty: bool,
    omit_zero: bool,
    as_string: bool,
    groups: Box<[&'static str]>,
}

impl FieldDescriptor {
    /// Field indices leading from the record to this field. Longer than one
    /// for fields promoted from embedded records.
    #[inline]
    pub fn source_path(&self) -> &[usize] {
        &self.source_path
    }

    /// The emitted key.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    #[inline]
    pub fn omit_zero(&self) -> bool {
        self.omit_zero
    }

    /// Whether a scalar value is emitted as a JSON string.
    #[inline]
    pub fn as_string(&self) -> bool {
        self.as_string
    }

    /// The visibility groups. Empty means never emitted.
    #[inline]
    pub fn groups(&self) -> &[&'static str] {
        &self.groups
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("source_path", &self.source_path)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeSchema

/// The ordered, visible fields of one record type.
#[derive(Debug)]
pub struct TypeSchema {
    type_path: &'static str,
    fields: Box<[FieldDescriptor]>,
}

impl TypeSchema {
    /// Builds the schema by a breadth-first walk over the record and its
    /// embedded records. The first field to claim a name keeps it.
    ///
    /// Private fields are skipped before anything else, so a private
    /// embedding contributes nothing.
    pub fn build(info: &'static RecordInfo, tag_key: &str) -> Self {
        let mut fields: Vec<FieldDescriptor> = Vec::with_capacity(info.field_len());
        let mut expanded: HashSet<TypeId, RandomState> = HashSet::default();
        let mut queue: VecDeque<(&'static RecordInfo, Vec<usize>)> = VecDeque::new();

        expanded.insert(info.ty_id());
        queue.push_back((info, Vec::new()));

        while let Some((record, prefix)) = queue.pop_front() {
            for (index, field) in record.iter().enumerate() {
                let json = JsonTag::parse(field.tag(JSON_TAG));
                if json.skip {
                    continue;
                }

                if !field.is_exported() {
                    trace!("skip private field `{}` of `{}`", field.name(), record.type_path());
                    continue;
                }

                let mut path = prefix.clone();
                path.push(index);

                if let Some(embedded) = field.embedded_info()
                    && json.name.is_none()
                {
                    if expanded.insert(embedded.ty_id()) {
                        queue.push_back((embedded, path));
                    }
                    continue;
                }

                let name = json.name.unwrap_or(field.name());
                if fields.iter().any(|known| known.name == name) {
                    trace!(
                        "field `{}` of `{}` is shadowed by a shallower field",
                        name,
                        record.type_path(),
                    );
                    continue;
                }

                fields.push(FieldDescriptor {
                    source_path: path.into_boxed_slice(),
                    name,
                    omit_empty: json.omit_empty,
                    omit_zero: json.omit_zero,
                    as_string: json.as_string,
                    groups: parse_groups(field.tag(tag_key)),
                });
            }
        }

        debug!(
            "built schema of `{}` for tag `{}` with {} fields",
            info.type_path(),
            tag_key,
            fields.len(),
        );

        Self {
            type_path: info.type_path(),
            fields: fields.into_boxed_slice(),
        }
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// -----------------------------------------------------------------------------
// SchemaCache

#[derive(PartialEq, Eq, Hash)]
struct SchemaKey {
    ty: TypeId,
    tag_key: Box<str>,
}

/// Borrowed form of [`SchemaKey`]; hashes identically so lookups do not
/// allocate.
#[derive(Hash)]
struct SchemaKeyRef<'a> {
    ty: TypeId,
    tag_key: &'a str,
}

impl Equivalent<SchemaKey> for SchemaKeyRef<'_> {
    #[inline]
    fn equivalent(&self, key: &SchemaKey) -> bool {
        self.ty == key.ty && self.tag_key == &*key.tag_key
    }
}

/// Memoized [`TypeSchema`]s keyed by record type and tag key.
///
/// Entries are inserted once and never changed. Two threads resolving the
/// same key may both build it; the first insert wins and both receive an
/// equivalent schema.
///
/// ```
/// use gj_encode::SchemaCache;
/// use gj_reflect::{derive::Reflect, info::Typed};
///
/// #[derive(Reflect)]
/// pub struct Item {
///     #[reflect(json = "id", groups = "public")]
///     pub id: u32,
///     #[reflect(json = "-")]
///     pub secret: String,
/// }
///
/// let cache = SchemaCache::new();
/// let schema = cache.resolve(Item::record_info(), "groups");
/// assert_eq!(schema.len(), 1);
/// assert_eq!(schema.fields()[0].groups(), ["public"]);
///
/// let again = cache.resolve(Item::record_info(), "groups");
/// assert!(std::sync::Arc::ptr_eq(&schema, &again));
/// ```
pub struct SchemaCache {
    schemas: RwLock<HashMap<SchemaKey, Arc<TypeSchema>, RandomState>>,
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("len", &self.len())
            .finish()
    }
}

impl SchemaCache {
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::default()),
        }
    }

    /// Returns the schema of `info` under `tag_key`, building it on first use.
    pub fn resolve(&self, info: &'static RecordInfo, tag_key: &str) -> Arc<TypeSchema> {
        let lookup = SchemaKeyRef {
            ty: info.ty_id(),
            tag_key,
        };

        let schemas = self.schemas.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(schema) = schemas.get(&lookup) {
            return Arc::clone(schema);
        }
        drop(schemas);

        let built = Arc::new(TypeSchema::build(info, tag_key));

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        let schema = schemas
            .entry(SchemaKey {
                ty: info.ty_id(),
                tag_key: tag_key.into(),
            })
            .or_insert(built);
        Arc::clone(schema)
    }

    /// Number of cached schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached schema.
    pub fn clear(&self) {
        self.schemas.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use gj_reflect::derive::Reflect;
    use gj_reflect::info::Typed;

    use super::*;

    #[derive(Reflect)]
    pub struct Base {
        #[reflect(json = "id", groups = "public")]
        pub id: u64,
        #[reflect(json = "created", groups = "admin")]
        pub created: u64,
    }

    #[derive(Reflect)]
    pub struct Account {
        #[reflect(embed)]
        pub base: Base,
        #[reflect(json = "id", groups = "admin")]
        pub account_id: u64,
        #[reflect(json = "name,omitempty", groups = "public, admin", role = "reader")]
        pub name: String,
        internal: u32,
        #[reflect(json = "-")]
        pub skipped: u8,
        pub untagged: bool,
    }

    #[derive(Reflect)]
    pub struct Renamed {
        #[reflect(embed, json = "base")]
        pub base: Base,
    }

    #[derive(Reflect)]
    pub struct Chain {
        #[reflect(json = "value", groups = "public")]
        pub value: u8,
        #[reflect(embed)]
        pub next: Option<Box<Chain>>,
    }

    #[test]
    fn breadth_first_with_shadowing() {
        let schema = TypeSchema::build(Account::record_info(), "groups");
        let names: Vec<_> = schema.fields().iter().map(FieldDescriptor::name).collect();
        assert_eq!(names, ["id", "name", "untagged", "created"]);

        let id = schema.field("id").unwrap();
        assert_eq!(id.source_path(), [1]);
        assert_eq!(id.groups(), ["admin"]);

        let created = schema.field("created").unwrap();
        assert_eq!(created.source_path(), [0, 1]);

        let name = schema.field("name").unwrap();
        assert!(name.omit_empty());
        assert_eq!(name.groups(), ["public", "admin"]);

        assert!(schema.field("untagged").unwrap().groups().is_empty());
        assert!(schema.field("internal").is_none());
        assert!(schema.field("skipped").is_none());
    }

    #[test]
    fn custom_tag_key() {
        let schema = TypeSchema::build(Account::record_info(), "role");
        assert_eq!(schema.field("name").unwrap().groups(), ["reader"]);
        assert!(schema.field("id").unwrap().groups().is_empty());
    }

    #[test]
    fn renamed_embedding_is_not_flattened() {
        let schema = TypeSchema::build(Renamed::record_info(), "groups");
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.fields()[0].name(), "base");
        assert_eq!(schema.fields()[0].source_path(), [0]);
    }

    #[test]
    fn self_embedding_terminates() {
        let schema = TypeSchema::build(Chain::record_info(), "groups");
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.fields()[0].name(), "value");
    }

    #[test]
    fn private_embedding_is_not_promoted() {
        #[derive(Reflect)]
        pub struct Secret {
            #[reflect(json = "token", groups = "public")]
            pub token: String,
        }

        #[derive(Reflect)]
        pub struct Outer {
            #[reflect(json = "id", groups = "public")]
            pub id: u8,
            #[reflect(embed)]
            secret: Secret,
        }

        let schema = TypeSchema::build(Outer::record_info(), "groups");
        let names: Vec<_> = schema.fields().iter().map(FieldDescriptor::name).collect();
        assert_eq!(names, ["id"]);
    }

    #[test]
    fn cache_is_keyed_by_tag() {
        let cache = SchemaCache::new();
        let a = cache.resolve(Account::record_info(), "groups");
        let b = cache.resolve(Account::record_info(), "role");
        let c = cache.resolve(Account::record_info(), "groups");

        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_resolution_converges() {
        let cache = SchemaCache::new();
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| cache.resolve(Account::record_info(), "groups").len());
            }
        });
        assert_eq!(cache.len(), 1);
    }
}
