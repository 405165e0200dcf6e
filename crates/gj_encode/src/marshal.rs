//! Entry points.

use alloc::vec::Vec;
use std::io;
use std::sync::OnceLock;

use gj_reflect::Reflect;
use serde_json::Value;

use crate::config::EncodeConfig;
use crate::encoder::Encoder;
use crate::error::Result;
use crate::pool::BufferPool;
use crate::schema::SchemaCache;
use crate::write::{JsonWriter, ValueBuilder};

// -----------------------------------------------------------------------------
// Marshaller

/// Owns the schema cache and the output buffers shared by encode calls.
///
/// Most code uses the free functions, which go through
/// [`Marshaller::shared`]. A separate instance is useful to bound the
/// lifetime of its cache.
///
/// ```
/// use gj_encode::{EncodeConfig, Marshaller};
/// use gj_reflect::derive::Reflect;
///
/// #[derive(Reflect)]
/// pub struct Order {
///     #[reflect(json = "id", groups = "public")]
///     pub id: u32,
///     #[reflect(json = "total,string", groups = "billing")]
///     pub total: f64,
/// }
///
/// let marshaller = Marshaller::new();
/// let order = Order { id: 7, total: 12.5 };
///
/// let config = EncodeConfig::new().with_groups(["public", "billing"]);
/// let json = marshaller.marshal(&order, &config).unwrap();
/// assert_eq!(json, br#"{"id":7,"total":"12.5"}"#);
/// assert_eq!(marshaller.schema_cache().len(), 1);
/// ```
#[derive(Debug)]
pub struct Marshaller {
    cache: SchemaCache,
    pool: BufferPool,
}

impl Default for Marshaller {
    fn default() -> Self {
        Self::new()
    }
}

impl Marshaller {
    pub fn new() -> Self {
        Self {
            cache: SchemaCache::new(),
            pool: BufferPool::new(),
        }
    }

    /// The process-wide instance behind the free functions.
    pub fn shared() -> &'static Self {
        static SHARED: OnceLock<Marshaller> = OnceLock::new();
        SHARED.get_or_init(Self::new)
    }

    #[inline]
    pub fn schema_cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Encodes `value` into minified JSON.
    pub fn marshal(&self, value: &dyn Reflect, config: &EncodeConfig) -> Result<Vec<u8>> {
        let (result, buffer) = self.encode_text(value, config);
        let output = result.map(|()| buffer.as_slice().to_vec());
        self.pool.give(buffer);
        output
    }

    /// Encodes `value` into a JSON tree, keeping record field order.
    ///
    /// [`write_value`](crate::write_value) turns the tree into the same bytes
    /// [`marshal`](Self::marshal) returns.
    pub fn marshal_to_value(&self, value: &dyn Reflect, config: &EncodeConfig) -> Result<Value> {
        let mut encoder = Encoder::new(config, &self.cache, ValueBuilder::new());
        encoder.encode_root(value)?;
        Ok(encoder.into_sink().finish())
    }

    /// Encodes `value` and writes it to `writer`. Nothing is written if
    /// encoding fails.
    pub fn encode_to<W: io::Write>(
        &self,
        value: &dyn Reflect,
        config: &EncodeConfig,
        mut writer: W,
    ) -> Result<()> {
        let (result, buffer) = self.encode_text(value, config);
        let output = result.and_then(|()| {
            writer.write_all(&buffer)?;
            writer.flush()?;
            Ok(())
        });
        self.pool.give(buffer);
        output
    }

    fn encode_text(&self, value: &dyn Reflect, config: &EncodeConfig) -> (Result<()>, Vec<u8>) {
        let sink = JsonWriter::new(self.pool.take(), config.escape_html());
        let mut encoder = Encoder::new(config, &self.cache, sink);
        let result = encoder.encode_root(value);
        let (buffer, written) = encoder.into_sink().into_parts();
        (result.and_then(|()| written.map_err(Into::into)), buffer)
    }
}

// -----------------------------------------------------------------------------
// Free functions

/// Encodes `value` into minified JSON with the shared [`Marshaller`].
///
/// ```
/// use gj_encode::{EncodeConfig, GroupMode, marshal};
/// use gj_reflect::derive::Reflect;
///
/// #[derive(Reflect)]
/// pub struct User {
///     #[reflect(json = "id", groups = "public,admin")]
///     pub id: u64,
///     #[reflect(json = "secret", groups = "admin")]
///     pub secret: String,
/// }
///
/// let user = User { id: 1, secret: "x".into() };
///
/// let public = EncodeConfig::new().with_groups(["public"]);
/// assert_eq!(marshal(&user, &public).unwrap(), br#"{"id":1}"#);
///
/// let both = EncodeConfig::new()
///     .with_groups(["public", "admin"])
///     .with_group_mode(GroupMode::And);
/// assert_eq!(marshal(&user, &both).unwrap(), br#"{"id":1}"#);
///
/// let admin = EncodeConfig::new().with_groups(["admin"]);
/// assert_eq!(marshal(&user, &admin).unwrap(), br#"{"id":1,"secret":"x"}"#);
/// ```
#[inline]
pub fn marshal(value: &dyn Reflect, config: &EncodeConfig) -> Result<Vec<u8>> {
    Marshaller::shared().marshal(value, config)
}

/// Encodes `value` into a JSON tree with the shared [`Marshaller`].
#[inline]
pub fn marshal_to_value(value: &dyn Reflect, config: &EncodeConfig) -> Result<Value> {
    Marshaller::shared().marshal_to_value(value, config)
}

/// Encodes `value` into `writer` with the shared [`Marshaller`].
#[inline]
pub fn encode_to<W: io::Write>(value: &dyn Reflect, config: &EncodeConfig, writer: W) -> Result<()> {
    Marshaller::shared().encode_to(value, config, writer)
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use std::collections::HashMap;

    use gj_reflect::derive::Reflect;
    use gj_reflect::impls::RawJson;
    use serde_json::json;

    use super::*;
    use crate::config::GroupMode;
    use crate::error::ErrorKind;
    use crate::write::write_value;

    #[derive(Reflect)]
    pub struct Profile {
        #[reflect(json = "bio", groups = "public")]
        pub bio: String,
        #[reflect(json = "phone", groups = "admin")]
        pub phone: String,
    }

    #[derive(Reflect)]
    pub struct Account {
        #[reflect(json = "id", groups = "public,admin")]
        pub id: u64,
        #[reflect(json = "email,omitempty", groups = "admin")]
        pub email: String,
        #[reflect(json = "profile", groups = "admin")]
        pub profile: Profile,
        #[reflect(json = "avatar", groups = "public")]
        pub avatar: Vec<u8>,
        #[reflect(json = "prefs", groups = "public")]
        pub prefs: HashMap<String, bool>,
        #[reflect(json = "extra", groups = "public")]
        pub extra: RawJson,
        #[reflect(json = "note", groups = "public")]
        pub note: Option<Box<str>>,
        #[reflect(json = "score", groups = "admin")]
        pub score: f32,
    }

    fn account() -> Account {
        Account {
            id: 42,
            email: "a@b.c".into(),
            profile: Profile {
                bio: "<b>hi</b> & bye".into(),
                phone: "555".into(),
            },
            avatar: vec![0xde, 0xad, 0xbe, 0xef],
            prefs: HashMap::from([("z".into(), true), ("a".into(), false), ("m".into(), true)]),
            extra: RawJson::new(r#"{"v": [1, 2.50, null]}"#),
            note: None,
            score: 0.1,
        }
    }

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn nested_records_filter_independently() {
        let marshaller = Marshaller::new();
        let config = EncodeConfig::new()
            .with_groups(["admin"])
            .with_sort_keys(true);
        let out = text(marshaller.marshal(&account(), &config).unwrap());
        assert_eq!(
            out,
            r#"{"id":42,"email":"a@b.c","profile":{"phone":"555"},"score":0.1}"#,
        );
    }

    #[test]
    fn exclusion_is_multiplicative() {
        // `bio` is public, but its parent `profile` is admin-only.
        let config = EncodeConfig::new().with_groups(["public"]).with_sort_keys(true);
        let out = text(Marshaller::new().marshal(&account(), &config).unwrap());
        assert_eq!(
            out,
            r#"{"id":42,"avatar":"3q2+7w==","prefs":{"a":false,"m":true,"z":true},"extra":{"v":[1,2.50,null]},"note":null}"#,
        );
    }

    #[test]
    fn empty_request_yields_empty_object() {
        let config = EncodeConfig::new();
        assert_eq!(Marshaller::new().marshal(&account(), &config).unwrap(), b"{}");
    }

    #[test]
    fn and_mode_requires_every_group() {
        let config = EncodeConfig::new()
            .with_groups(["public", "admin"])
            .with_group_mode(GroupMode::And);
        let out = text(Marshaller::new().marshal(&account(), &config).unwrap());
        assert_eq!(out, r#"{"id":42}"#);
    }

    #[test]
    fn html_escaping() {
        let config = EncodeConfig::new().with_groups(["admin", "public"]);
        let marshaller = Marshaller::new();

        let plain = text(marshaller.marshal(&account().profile, &config).unwrap());
        assert_eq!(plain, r#"{"bio":"<b>hi</b> & bye","phone":"555"}"#);

        let escaped = text(
            marshaller
                .marshal(&account().profile, &config.clone().with_escape_html(true))
                .unwrap(),
        );
        assert_eq!(
            escaped,
            r#"{"bio":"\u003cb\u003ehi\u003c/b\u003e \u0026 bye","phone":"555"}"#,
        );
    }

    #[test]
    fn value_path_matches_direct_path() {
        let marshaller = Marshaller::new();
        let configs = [
            EncodeConfig::new().with_groups(["public"]).with_sort_keys(true),
            EncodeConfig::new()
                .with_groups(["public", "admin"])
                .with_sort_keys(true)
                .with_escape_html(true)
                .with_top_level_key("account"),
        ];

        for config in &configs {
            let direct = marshaller.marshal(&account(), config).unwrap();
            let tree = marshaller.marshal_to_value(&account(), config).unwrap();
            assert_eq!(write_value(&tree, config).unwrap(), direct);

            let parsed: Value = serde_json::from_slice(&direct).unwrap();
            assert_eq!(parsed, tree);
        }
    }

    #[test]
    fn value_tree_keeps_field_order() {
        let config = EncodeConfig::new().with_groups(["admin"]);
        let tree = Marshaller::new().marshal_to_value(&account(), &config).unwrap();
        let keys: Vec<&str> = tree.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "email", "profile", "score"]);
        assert_eq!(tree["profile"], json!({"phone": "555"}));
    }

    #[test]
    fn repeated_encodes_are_identical() {
        let marshaller = Marshaller::new();
        let config = EncodeConfig::new()
            .with_groups(["public", "admin"])
            .with_sort_keys(true);
        let value = account();
        let first = marshaller.marshal(&value, &config).unwrap();
        for _ in 0..4 {
            assert_eq!(marshaller.marshal(&value, &config).unwrap(), first);
        }
        assert_eq!(marshaller.schema_cache().len(), 2);
    }

    #[test]
    fn anonymous_embedding_collision_keeps_outer_field() {
        #[derive(Reflect)]
        pub struct Meta {
            #[reflect(json = "id", groups = "public")]
            pub id: String,
            #[reflect(json = "kind", groups = "public")]
            pub kind: &'static str,
        }

        #[derive(Reflect)]
        pub struct Item {
            #[reflect(embed)]
            pub meta: Meta,
            #[reflect(json = "id", groups = "public")]
            pub id: u32,
        }

        let item = Item {
            meta: Meta {
                id: "inner".into(),
                kind: "widget",
            },
            id: 9,
        };
        let config = EncodeConfig::new().with_groups(["public"]);
        assert_eq!(
            text(Marshaller::new().marshal(&item, &config).unwrap()),
            r#"{"id":9,"kind":"widget"}"#,
        );
    }

    #[test]
    fn non_string_map_keys_fail_with_path() {
        #[derive(Reflect)]
        pub struct Board {
            #[reflect(json = "scores", groups = "public")]
            pub scores: BTreeMap<u32, u32>,
        }

        let board = Board {
            scores: BTreeMap::from([(1, 2)]),
        };
        let config = EncodeConfig::new().with_groups(["public"]);
        let err = Marshaller::new().marshal(&board, &config).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidMapKeyType { .. }));
        assert_eq!(err.path().to_string(), "scores");
    }

    #[test]
    fn encode_to_writer() {
        let config = EncodeConfig::new().with_groups(["admin"]);
        let mut out = Vec::new();
        encode_to(&account().profile, &config, &mut out).unwrap();
        assert_eq!(out, br#"{"phone":"555"}"#);

        struct Broken;
        impl io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = encode_to(&account().profile, &config, Broken).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
    }

    #[test]
    fn failed_encode_writes_nothing() {
        let config = EncodeConfig::new().with_groups(["admin"]);
        let mut out = Vec::new();
        let none: Option<Profile> = None;
        let err = encode_to(&none, &config, &mut out).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NilRoot));
        assert!(out.is_empty());
    }

    #[test]
    fn slice_root_tree() {
        let config = EncodeConfig::new().with_groups(["admin"]).allow_slice(true);
        let profiles = vec![account().profile];
        let tree = marshal_to_value(&profiles, &config).unwrap();
        assert_eq!(tree, json!({"data": [{"phone": "555"}]}));
    }
}
