//! The recursive value encoder.

use alloc::string::ToString;
use alloc::vec::Vec;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use gj_reflect::ops::{Guarded, List, Map, MarshalJson, Record};
use gj_reflect::{Identity, Reflect, ReflectRef, Scalar};
use log::trace;
use serde_json::Value;

use crate::config::{CutoffCollection, DepthPolicy, EncodeConfig};
use crate::context::TraversalContext;
use crate::error::{ErrorKind, PathSegment, Result};
use crate::filter::include;
use crate::schema::{FieldDescriptor, SchemaCache};
use crate::write::{JsonWriter, Sink};

/// Key wrapping a map or sequence root.
const DATA_KEY: &str = "data";

#[derive(Debug, Clone, Copy)]
enum Nest {
    Record,
    Map,
    List,
}

/// Walks one value and feeds a [`Sink`].
///
/// An encoder is used for a single call: the traversal context starts empty
/// and is empty again once `encode_root` returns, whatever the outcome.
pub(crate) struct Encoder<'c, S> {
    config: &'c EncodeConfig,
    cache: &'c SchemaCache,
    ctx: TraversalContext,
    sink: S,
}

impl<'c, S: Sink> Encoder<'c, S> {
    pub fn new(config: &'c EncodeConfig, cache: &'c SchemaCache, sink: S) -> Self {
        Self {
            config,
            cache,
            ctx: TraversalContext::new(config.max_depth()),
            sink,
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Encodes a root value, wrapped under the top-level key if one is set.
    pub fn encode_root(&mut self, value: &dyn Reflect) -> Result<()> {
        match self.config.top_level_key() {
            Some(key) => {
                self.sink.begin_object();
                self.sink.key(key);
                self.encode_root_value(value)?;
                self.sink.end_object();
                Ok(())
            }
            None => self.encode_root_value(value),
        }
    }

    fn encode_root_value(&mut self, value: &dyn Reflect) -> Result<()> {
        match value.reflect_ref() {
            ReflectRef::Null => Err(ErrorKind::NilRoot.into()),
            ReflectRef::Pointer(inner) => self.encode_root_value(inner),
            ReflectRef::Guarded(cell) => {
                self.borrowed(value, cell, |this, inner| this.encode_root_value(inner))
            }
            ReflectRef::Record(record) => self.encode_record(value, record),
            ReflectRef::Map(map) if self.config.allows_map() => self.encode_map(value, map),
            ReflectRef::List(_) | ReflectRef::Bytes(_) if self.config.allows_slice() => {
                self.sink.begin_object();
                self.sink.key(DATA_KEY);
                self.encode(value)?;
                self.sink.end_object();
                Ok(())
            }
            other => Err(ErrorKind::InvalidRootType {
                type_name: value.reflect_type_name(),
                kind: other.kind(),
            }
            .into()),
        }
    }

    fn encode(&mut self, value: &dyn Reflect) -> Result<()> {
        match value.reflect_ref() {
            ReflectRef::Null => {
                self.sink.null();
                Ok(())
            }
            ReflectRef::Pointer(inner) => self.encode(inner),
            ReflectRef::Guarded(cell) => self.borrowed(value, cell, Self::encode),
            ReflectRef::Json(hook) => self.encode_json_hook(hook),
            ReflectRef::Serialize(hook) => {
                let tree = serde_json::to_value(hook).map_err(|err| ErrorKind::Hook(err.into()))?;
                self.sink.value(&tree);
                Ok(())
            }
            ReflectRef::Text(hook) => {
                let text = hook.marshal_text().map_err(ErrorKind::Hook)?;
                self.sink.str(&text);
                Ok(())
            }
            ReflectRef::Bytes(bytes) => {
                self.sink.str(&STANDARD.encode(bytes));
                Ok(())
            }
            ReflectRef::Record(record) => self.encode_record(value, record),
            ReflectRef::Map(map) => self.encode_map(value, map),
            ReflectRef::List(list) => self.encode_list(value, list),
            ReflectRef::Scalar(scalar) => write_scalar(&mut self.sink, scalar),
            ReflectRef::Opaque => Err(ErrorKind::UnsupportedType {
                type_name: value.reflect_type_name(),
            }
            .into()),
        }
    }

    /// Encodes a field carrying the `string` option: scalars, also behind
    /// references, are written as the string of their JSON text.
    fn encode_quoted(&mut self, value: &dyn Reflect) -> Result<()> {
        match value.reflect_ref() {
            ReflectRef::Pointer(inner) => self.encode_quoted(inner),
            ReflectRef::Guarded(cell) => self.borrowed(value, cell, Self::encode_quoted),
            ReflectRef::Scalar(scalar) => {
                let mut text = JsonWriter::new(Vec::new(), self.config.escape_html());
                write_scalar(&mut text, scalar)?;
                self.sink.str(&text.into_string()?);
                Ok(())
            }
            _ => self.encode(value),
        }
    }

    /// Validates hook output and writes it compacted. Numbers keep the
    /// hook's spelling.
    fn encode_json_hook(&mut self, hook: &dyn MarshalJson) -> Result<()> {
        let text = hook.marshal_json().map_err(ErrorKind::Hook)?;
        let tree: Value = serde_json::from_str(&text).map_err(ErrorKind::InvalidHookOutput)?;
        self.sink.value(&tree);
        Ok(())
    }

    fn encode_record(&mut self, value: &dyn Reflect, record: &dyn Record) -> Result<()> {
        self.nested(value, Nest::Record, |this| {
            let config = this.config;
            this.sink.begin_object();

            if !config.groups().is_empty() {
                let schema = this.cache.resolve(record.record_info(), config.tag_key());
                for field in schema.fields() {
                    if !include(config.groups(), field.groups(), config.group_mode()) {
                        continue;
                    }
                    let Some(item) = resolve_field(record, field.source_path()) else {
                        continue;
                    };
                    if is_omitted(field, item) {
                        continue;
                    }

                    this.sink.key(field.name());
                    let result = if field.as_string() {
                        this.encode_quoted(item)
                    } else {
                        this.encode(item)
                    };
                    result.map_err(|err| err.at(PathSegment::Field(field.name())))?;
                }
            }

            this.sink.end_object();
            Ok(())
        })
    }

    fn encode_map(&mut self, value: &dyn Reflect, map: &dyn Map) -> Result<()> {
        let Some(entries) = map.iter() else {
            return Err(ErrorKind::InvalidMapKeyType {
                key_type: map.key_type_name(),
            }
            .into());
        };

        self.nested(value, Nest::Map, |this| {
            this.sink.begin_object();
            if this.config.sort_keys() {
                let mut entries: Vec<_> = entries.collect();
                entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
                for (key, item) in entries {
                    this.encode_entry(key, item)?;
                }
            } else {
                for (key, item) in entries {
                    this.encode_entry(key, item)?;
                }
            }
            this.sink.end_object();
            Ok(())
        })
    }

    #[inline]
    fn encode_entry(&mut self, key: &str, item: &dyn Reflect) -> Result<()> {
        self.sink.key(key);
        self.encode(item)
            .map_err(|err| err.at(PathSegment::Key(key.to_string())))
    }

    fn encode_list(&mut self, value: &dyn Reflect, list: &dyn List) -> Result<()> {
        self.nested(value, Nest::List, |this| {
            this.sink.begin_array();
            for index in 0..list.len() {
                match list.get(index) {
                    Some(item) => this
                        .encode(item)
                        .map_err(|err| err.at(PathSegment::Index(index)))?,
                    None => this.sink.null(),
                }
            }
            this.sink.end_array();
            Ok(())
        })
    }

    /// Runs `body` one level deeper with `value` on the active path.
    ///
    /// Depth is checked before identity. The depth and the path are restored
    /// whether `body` succeeds or not.
    fn nested(
        &mut self,
        value: &dyn Reflect,
        nest: Nest,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        if !self.ctx.descend() {
            self.ctx.ascend();
            return self.cut_off(value, nest);
        }

        let id = Identity::of(value);
        if let Some(id) = id
            && !self.ctx.visit(id)
        {
            self.ctx.ascend();
            return Err(ErrorKind::CycleDetected.into());
        }

        let result = body(self);

        if let Some(id) = id {
            self.ctx.leave(id);
        }
        self.ctx.ascend();
        result
    }

    fn cut_off(&mut self, value: &dyn Reflect, nest: Nest) -> Result<()> {
        let max_depth = self.ctx.max_depth();
        if self.config.depth_policy() == DepthPolicy::Error {
            return Err(ErrorKind::DepthExceeded { max_depth }.into());
        }

        trace!(
            "truncating `{}` beyond depth {}",
            value.reflect_type_name(),
            max_depth,
        );
        match (nest, self.config.cutoff_collection()) {
            (Nest::Map, CutoffCollection::Empty) => {
                self.sink.begin_object();
                self.sink.end_object();
            }
            (Nest::List, CutoffCollection::Empty) => {
                self.sink.begin_array();
                self.sink.end_array();
            }
            _ => self.sink.null(),
        }
        Ok(())
    }

    /// Borrows a cell for the duration of `body`. The cell is on the active
    /// path meanwhile, so a cycle through it is reported before a second
    /// borrow is attempted.
    fn borrowed(
        &mut self,
        value: &dyn Reflect,
        cell: &dyn Guarded,
        body: impl FnOnce(&mut Self, &dyn Reflect) -> Result<()>,
    ) -> Result<()> {
        let id = Identity::of(value);
        if let Some(id) = id
            && !self.ctx.visit(id)
        {
            return Err(ErrorKind::CycleDetected.into());
        }

        let result = match cell.try_borrow() {
            Ok(guard) => body(self, &**guard),
            Err(source) => Err(ErrorKind::Unavailable {
                type_name: value.reflect_type_name(),
                source,
            }
            .into()),
        };

        if let Some(id) = id {
            self.ctx.leave(id);
        }
        result
    }

    #[cfg(test)]
    fn is_settled(&self) -> bool {
        self.ctx.is_clean()
    }
}

fn write_scalar<S: Sink>(sink: &mut S, scalar: Scalar<'_>) -> Result<()> {
    match scalar {
        Scalar::Bool(v) => sink.bool(v),
        Scalar::Int(v) => sink.int(v),
        Scalar::Uint(v) => sink.uint(v),
        Scalar::F32(v) if v.is_finite() => sink.f32(v),
        Scalar::F64(v) if v.is_finite() => sink.f64(v),
        Scalar::F32(v) => {
            return Err(ErrorKind::InvalidNumber {
                value: f64::from(v),
            }
            .into());
        }
        Scalar::F64(value) => return Err(ErrorKind::InvalidNumber { value }.into()),
        Scalar::Char(v) => sink.str(v.encode_utf8(&mut [0; 4])),
        Scalar::Str(v) => sink.str(v),
    }
    Ok(())
}

/// Follows `path` from `record` through embedded records. `None` when an
/// embedded reference on the way is absent.
fn resolve_field<'v>(record: &'v dyn Record, path: &[usize]) -> Option<&'v dyn Reflect> {
    let (&last, parents) = path.split_last()?;
    let mut current = record;
    for &index in parents {
        let mut embedded = current.field_at(index)?;
        current = loop {
            match embedded.reflect_ref() {
                ReflectRef::Pointer(inner) => embedded = inner,
                ReflectRef::Record(inner) => break inner,
                _ => return None,
            }
        };
    }
    current.field_at(last)
}

/// Checks the field options against the value before it is encoded.
fn is_omitted(field: &FieldDescriptor, value: &dyn Reflect) -> bool {
    let value = value.reflect_ref();
    if field.omit_empty() {
        let empty = match &value {
            ReflectRef::Null => true,
            ReflectRef::Bytes(bytes) => bytes.is_empty(),
            ReflectRef::Map(map) => map.is_empty(),
            ReflectRef::List(list) => list.is_empty(),
            ReflectRef::Scalar(scalar) => scalar.is_zero(),
            ReflectRef::Text(hook) => hook.marshal_text().is_ok_and(|text| text.is_empty()),
            _ => false,
        };
        if empty {
            return true;
        }
    }
    field.omit_zero() && matches!(&value, ReflectRef::Scalar(scalar) if scalar.is_zero())
}
