use alloc::boxed::Box;
use alloc::string::String;
use core::error;

/// Error returned by a custom hook. It is passed through to the caller.
pub type HookError = Box<dyn error::Error + Send + Sync>;

/// A type that writes its own JSON.
///
/// The returned text must be a single valid JSON value. It replaces all
/// structural encoding for the value, group filtering included.
///
/// ```
/// use gj_reflect::ops::{HookError, MarshalJson};
///
/// struct Celsius(f64);
///
/// impl MarshalJson for Celsius {
///     fn marshal_json(&self) -> Result<String, HookError> {
///         Ok(format!("{{\"celsius\":{}}}", self.0))
///     }
/// }
///
/// assert_eq!(Celsius(21.5).marshal_json().unwrap(), r#"{"celsius":21.5}"#);
/// ```
pub trait MarshalJson {
    fn marshal_json(&self) -> Result<String, HookError>;
}

/// A type that writes its own text, emitted as a JSON string.
pub trait MarshalText {
    fn marshal_text(&self) -> Result<String, HookError>;
}
