use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde_json::{Map, Value};

use super::Sink;

enum Frame {
    Object(Map<String, Value>, Option<String>),
    Array(Vec<Value>),
}

/// Builds a [`Value`] tree from encoding events.
#[derive(Default)]
pub(crate) struct ValueBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl ValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the finished tree, `null` if nothing was written.
    pub fn finish(self) -> Value {
        debug_assert!(self.stack.is_empty());
        self.root.unwrap_or(Value::Null)
    }

    fn push(&mut self, value: Value) {
        match self.stack.last_mut() {
            None => self.root = Some(value),
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object(entries, key)) => {
                let key = key.take().unwrap_or_default();
                entries.insert(key, value);
            }
        }
    }
}

impl Sink for ValueBuilder {
    fn null(&mut self) {
        self.push(Value::Null);
    }

    fn bool(&mut self, value: bool) {
        self.push(Value::Bool(value));
    }

    fn int(&mut self, value: i64) {
        self.push(Value::Number(value.into()));
    }

    fn uint(&mut self, value: u64) {
        self.push(Value::Number(value.into()));
    }

    // Numbers keep the text they are written with, so an `f32` stays
    // `0.1` rather than widening to `0.10000000149011612`.
    fn f32(&mut self, value: f32) {
        self.push(Value::from(value));
    }

    fn f64(&mut self, value: f64) {
        self.push(Value::from(value));
    }

    fn str(&mut self, value: &str) {
        self.push(Value::String(value.to_string()));
    }

    fn begin_object(&mut self) {
        self.stack.push(Frame::Object(Map::new(), None));
    }

    fn key(&mut self, key: &str) {
        if let Some(Frame::Object(_, pending)) = self.stack.last_mut() {
            *pending = Some(key.to_string());
        }
    }

    fn end_object(&mut self) {
        if let Some(Frame::Object(entries, _)) = self.stack.pop() {
            self.push(Value::Object(entries));
        }
    }

    fn begin_array(&mut self) {
        self.stack.push(Frame::Array(Vec::new()));
    }

    fn end_array(&mut self) {
        if let Some(Frame::Array(items)) = self.stack.pop() {
            self.push(Value::Array(items));
        }
    }

    fn value(&mut self, value: &Value) {
        self.push(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builds_in_insertion_order() {
        let mut b = ValueBuilder::new();
        b.begin_object();
        b.key("z");
        b.uint(1);
        b.key("a");
        b.begin_array();
        b.str("x");
        b.f32(0.1);
        b.end_array();
        b.end_object();

        let value = b.finish();
        assert_eq!(value, json!({"z": 1, "a": ["x", 0.1]}));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["z", "a"]);
    }

    #[test]
    fn empty_is_null() {
        assert_eq!(ValueBuilder::new().finish(), Value::Null);
    }
}
