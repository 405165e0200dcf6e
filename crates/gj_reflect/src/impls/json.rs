use alloc::string::String;

use crate::ops::{HookError, MarshalJson};
use crate::{Reflect, ReflectRef};

impl Reflect for serde_json::Value {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Serialize(self)
    }
}

/// Pre-encoded JSON text, embedded as-is into the output.
///
/// The text is checked when the value is encoded, not here.
///
/// ```
/// use gj_reflect::impls::RawJson;
/// use gj_reflect::ops::MarshalJson;
///
/// let raw = RawJson::new(r#"{"a": [1, 2]}"#);
/// assert_eq!(raw.marshal_json().unwrap(), r#"{"a": [1, 2]}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJson(String);

impl RawJson {
    #[inline]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl MarshalJson for RawJson {
    #[inline]
    fn marshal_json(&self) -> Result<String, HookError> {
        Ok(self.0.clone())
    }
}

impl Reflect for RawJson {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Json(self)
    }
}
