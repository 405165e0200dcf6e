use core::any::{Any, TypeId};
use core::fmt;

use crate::ops::{Guarded, List, Map, MarshalJson, MarshalText, Record};

// -----------------------------------------------------------------------------
// Reflect

/// A value the encoder can walk.
///
/// The only required method is [`reflect_ref`](Reflect::reflect_ref), which
/// classifies the value. Classification happens on every visit but is a
/// plain match on `self`, so it costs nothing beyond a virtual call.
///
/// Use `#[derive(Reflect)]` for records; implementations for std types
/// live in [`impls`](crate::impls).
///
/// ```
/// use gj_reflect::{Reflect, ReflectRef, Scalar};
///
/// let value: &dyn Reflect = &42_u8;
/// assert!(matches!(value.reflect_ref(), ReflectRef::Scalar(Scalar::Uint(42))));
///
/// let value: &dyn Reflect = &Option::<u8>::None;
/// assert!(matches!(value.reflect_ref(), ReflectRef::Null));
/// ```
pub trait Reflect: Any {
    /// Returns the structural view of this value.
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Returns the type name of the underlying type, for diagnostics.
    #[inline]
    fn reflect_type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Casts this type to a reflection trait object.
    #[inline(always)]
    fn as_reflect(&self) -> &dyn Reflect
    where
        Self: Sized,
    {
        self
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_name())
    }
}

// -----------------------------------------------------------------------------
// ReflectRef

/// An immutable, classified view of a [`Reflect`] value.
pub enum ReflectRef<'a> {
    /// An absent reference, such as `Option::None`.
    Null,
    /// A transparent reference to another value (`Box`, `Rc`, `Arc`, `Some`).
    Pointer(&'a dyn Reflect),
    /// A cell whose content must be borrowed first (`RefCell`, `Mutex`, `RwLock`).
    Guarded(&'a dyn Guarded),
    /// A type that produces its own JSON text.
    Json(&'a dyn MarshalJson),
    /// A type that produces its own JSON through serde.
    Serialize(&'a dyn erased_serde::Serialize),
    /// A type that produces its own text, emitted as a JSON string.
    Text(&'a dyn MarshalText),
    /// A raw byte buffer.
    Bytes(&'a [u8]),
    /// A record with named, tagged fields.
    Record(&'a dyn Record),
    /// A key-value mapping.
    Map(&'a dyn Map),
    /// An ordered sequence.
    List(&'a dyn List),
    /// A number, boolean or string.
    Scalar(Scalar<'a>),
    /// A value with no JSON form (functions, raw pointers, channels).
    Opaque,
}

impl ReflectRef<'_> {
    /// Returns the kind of this view.
    pub const fn kind(&self) -> ReflectKind {
        match self {
            Self::Null => ReflectKind::Null,
            Self::Pointer(_) => ReflectKind::Pointer,
            Self::Guarded(_) => ReflectKind::Guarded,
            Self::Json(_) | Self::Serialize(_) | Self::Text(_) => ReflectKind::Hook,
            Self::Bytes(_) => ReflectKind::Bytes,
            Self::Record(_) => ReflectKind::Record,
            Self::Map(_) => ReflectKind::Map,
            Self::List(_) => ReflectKind::List,
            Self::Scalar(_) => ReflectKind::Scalar,
            Self::Opaque => ReflectKind::Opaque,
        }
    }
}

/// The kind of a [`ReflectRef`], without the borrowed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectKind {
    Null,
    Pointer,
    Guarded,
    Hook,
    Bytes,
    Record,
    Map,
    List,
    Scalar,
    Opaque,
}

impl fmt::Display for ReflectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.pad("Null"),
            Self::Pointer => f.pad("Pointer"),
            Self::Guarded => f.pad("Guarded"),
            Self::Hook => f.pad("Hook"),
            Self::Bytes => f.pad("Bytes"),
            Self::Record => f.pad("Record"),
            Self::Map => f.pad("Map"),
            Self::List => f.pad("List"),
            Self::Scalar => f.pad("Scalar"),
            Self::Opaque => f.pad("Opaque"),
        }
    }
}

// -----------------------------------------------------------------------------
// Scalar

/// A scalar value, widened to the representation the encoder writes.
///
/// `f32` is kept apart from `f64` so that its shortest decimal form is
/// preserved (`0.1_f32` is written as `0.1`, not `0.10000000149011612`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(&'a str),
}

impl Scalar<'_> {
    /// Returns `true` for `false`, numeric zero and the empty string.
    pub fn is_zero(&self) -> bool {
        match *self {
            Self::Bool(v) => !v,
            Self::Int(v) => v == 0,
            Self::Uint(v) => v == 0,
            Self::F32(v) => v == 0.0,
            Self::F64(v) => v == 0.0,
            Self::Char(v) => v == '\0',
            Self::Str(v) => v.is_empty(),
        }
    }
}

// -----------------------------------------------------------------------------
// Identity

/// The identity of a value currently being visited.
///
/// Two live values share an identity only if they are the same object:
/// the address alone is not enough because a record and its first field
/// can start at the same address, so the concrete type is part of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    addr: usize,
    ty: TypeId,
}

impl Identity {
    /// Returns the identity of `value`, or `None` for zero-sized values,
    /// which may all live at the same dangling address.
    pub fn of(value: &dyn Reflect) -> Option<Self> {
        if size_of_val(value) == 0 {
            return None;
        }
        Some(Self {
            addr: core::ptr::from_ref(value).cast::<()>().addr(),
            ty: (value as &dyn Any).type_id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_distinguishes_type_at_same_address() {
        #[derive(crate::derive::Reflect)]
        struct Outer {
            pub inner: Vec<u32>,
        }

        let outer = Outer { inner: vec![1] };
        let a = Identity::of(&outer).unwrap();
        let b = Identity::of(&outer.inner).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, Identity::of(&outer).unwrap());
    }

    #[test]
    fn hook_types_classify_as_hooks() {
        #[derive(crate::derive::Reflect)]
        #[reflect(display)]
        struct Version(u8, u8);

        impl fmt::Display for Version {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "v{}.{}", self.0, self.1)
            }
        }

        let version = Version(1, 2);
        let ReflectRef::Text(hook) = version.reflect_ref() else {
            panic!("expected a text hook");
        };
        assert_eq!(hook.marshal_text().unwrap(), "v1.2");
        assert_eq!(version.reflect_ref().kind(), ReflectKind::Hook);
    }

    #[test]
    fn zero_sized_values_have_no_identity() {
        assert!(Identity::of(&()).is_none());
        assert!(Identity::of(&[0_u8; 0]).is_none());
    }

    #[test]
    fn scalar_zero() {
        assert!(Scalar::Str("").is_zero());
        assert!(Scalar::Bool(false).is_zero());
        assert!(Scalar::F64(-0.0).is_zero());
        assert!(!Scalar::Int(-1).is_zero());
    }
}
