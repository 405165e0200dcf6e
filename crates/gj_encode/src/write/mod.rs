//! Output sinks.
//!
//! The encoder emits a stream of events into a [`Sink`]. [`JsonWriter`]
//! turns them into minified JSON text; [`ValueBuilder`] assembles a
//! [`serde_json::Value`] tree. All JSON text is produced by `serde_json`
//! with a [`JsonFormatter`], so serializing a built tree with
//! [`write_value`] reproduces the direct output byte for byte.

// -----------------------------------------------------------------------------
// Modules

mod json;
mod value;

// -----------------------------------------------------------------------------
// Internal

use alloc::vec::Vec;

use serde::Serialize;
use serde_json::{Serializer, Value};

use crate::config::EncodeConfig;

pub(crate) use json::{JsonFormatter, JsonWriter};
pub(crate) use value::ValueBuilder;

// -----------------------------------------------------------------------------
// Sink

/// Receiver of encoding events.
///
/// Floats are finite when they reach a sink. Object entries are written as
/// a `key` followed by exactly one value.
pub(crate) trait Sink {
    fn null(&mut self);
    fn bool(&mut self, value: bool);
    fn int(&mut self, value: i64);
    fn uint(&mut self, value: u64);
    fn f32(&mut self, value: f32);
    fn f64(&mut self, value: f64);
    fn str(&mut self, value: &str);

    fn begin_object(&mut self);
    fn key(&mut self, key: &str);
    fn end_object(&mut self);

    fn begin_array(&mut self);
    fn end_array(&mut self);

    /// Writes an already built tree.
    fn value(&mut self, value: &Value);
}

// -----------------------------------------------------------------------------
// write_value

/// Serializes a JSON tree the way the encoder writes its output.
///
/// Only the string escaping options of `config` apply; everything else was
/// decided when the tree was built. Numbers keep their text.
///
/// ```
/// use gj_encode::{EncodeConfig, write_value};
/// use serde_json::json;
///
/// let tree = json!({"b": 1.5, "a": "<tag>", "c": [null, true]});
/// let config = EncodeConfig::new().with_escape_html(true);
///
/// assert_eq!(
///     write_value(&tree, &config).unwrap(),
///     br#"{"b":1.5,"a":"\u003ctag\u003e","c":[null,true]}"#,
/// );
/// ```
pub fn write_value(value: &Value, config: &EncodeConfig) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, JsonFormatter::new(config.escape_html()));
    value.serialize(&mut ser)?;
    Ok(out)
}
