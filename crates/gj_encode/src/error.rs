use alloc::collections::VecDeque;
use alloc::string::String;
use core::fmt;

use gj_reflect::ReflectKind;
use gj_reflect::ops::{BorrowError, HookError};
use thiserror::Error;

/// Result type of the encoding operations.
pub type Result<T, E = EncodeError> = core::result::Result<T, E>;

/// What went wrong while encoding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The root value is absent.
    #[error("cannot marshal nil value")]
    NilRoot,
    /// The root value is not a record (or a permitted map or sequence).
    #[error("cannot marshal `{type_name}` ({kind}) as root value")]
    InvalidRootType {
        type_name: &'static str,
        kind: ReflectKind,
    },
    /// A map has keys without a string form.
    #[error("map key type `{key_type}` is not string-like")]
    InvalidMapKeyType { key_type: &'static str },
    /// A value with no JSON form was reached.
    #[error("unsupported type `{type_name}`")]
    UnsupportedType { type_name: &'static str },
    /// A value was reached again while still being encoded.
    #[error("circular reference detected")]
    CycleDetected,
    /// Nesting went past the configured maximum under the error policy.
    #[error("exceeded maximum recursion depth {max_depth}")]
    DepthExceeded { max_depth: usize },
    /// A float is NaN or infinite.
    #[error("unsupported value {value}")]
    InvalidNumber { value: f64 },
    /// A cell could not be borrowed for reading.
    #[error("cannot read `{type_name}`: {source}")]
    Unavailable {
        type_name: &'static str,
        source: BorrowError,
    },
    /// A custom JSON hook returned text that is not a JSON value.
    #[error("custom JSON hook returned invalid JSON: {0}")]
    InvalidHookOutput(#[source] serde_json::Error),
    /// Error returned by a custom hook.
    #[error(transparent)]
    Hook(HookError),
    /// The output writer failed.
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// One step of the location of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A record field, by emit name.
    Field(&'static str),
    /// A sequence element.
    Index(usize),
    /// A map entry.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key(key) => write!(f, "[{key:?}]"),
        }
    }
}

/// Location of an error, outermost segment first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorPath(VecDeque<PathSegment>);

impl ErrorPath {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn segments(&self) -> impl ExactSizeIterator<Item = &PathSegment> {
        self.0.iter()
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

/// An encoding failure and where it happened.
///
/// The path is built while the error unwinds: each enclosing record,
/// sequence or map prepends its own segment, so it reads outer to inner.
///
/// ```
/// use gj_encode::{EncodeError, ErrorKind, PathSegment};
///
/// let err = EncodeError::from(ErrorKind::CycleDetected)
///     .at(PathSegment::Field("next"))
///     .at(PathSegment::Index(0))
///     .at(PathSegment::Field("nodes"));
///
/// assert_eq!(err.path().to_string(), "nodes.[0].next");
/// assert_eq!(
///     err.to_string(),
///     "groupjson: circular reference detected at path nodes.[0].next",
/// );
/// ```
#[derive(Debug)]
pub struct EncodeError {
    kind: ErrorKind,
    path: ErrorPath,
}

impl EncodeError {
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn path(&self) -> &ErrorPath {
        &self.path
    }

    /// Prepends the segment of an enclosing value.
    #[must_use]
    pub fn at(mut self, segment: PathSegment) -> Self {
        self.path.0.push_front(segment);
        self
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "groupjson: {}", self.kind)?;
        if !self.path.is_empty() {
            write!(f, " at path {}", self.path)?;
        }
        Ok(())
    }
}

impl core::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        core::error::Error::source(&self.kind)
    }
}

impl From<ErrorKind> for EncodeError {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: ErrorPath::default(),
        }
    }
}

impl From<std::io::Error> for EncodeError {
    #[inline]
    fn from(err: std::io::Error) -> Self {
        ErrorKind::Io(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_segments_are_quoted() {
        let err = EncodeError::from(ErrorKind::InvalidMapKeyType { key_type: "i32" })
            .at(PathSegment::Key(String::from("a\"b")))
            .at(PathSegment::Field("meta"));
        assert_eq!(err.path().to_string(), r#"meta.["a\"b"]"#);
    }

    #[test]
    fn no_path_no_suffix() {
        let err = EncodeError::from(ErrorKind::NilRoot);
        assert_eq!(err.to_string(), "groupjson: cannot marshal nil value");
        assert!(err.path().is_empty());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::other("disk full");
        let err = EncodeError::from(io);
        assert!(matches!(err.kind(), ErrorKind::Io(_)));
        assert_eq!(err.to_string(), "groupjson: write failed: disk full");
    }
}
