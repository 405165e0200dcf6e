use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;

use crate::Reflect;

/// Iterator over the entries of a [`Map`] with string-like keys.
pub type MapIter<'a> = Box<dyn Iterator<Item = (&'a str, &'a dyn Reflect)> + 'a>;

/// A key-value mapping.
///
/// JSON objects only have string keys. A map whose key type is not
/// string-like can still be reflected, but [`iter`](Map::iter) returns
/// `None` and the encoder reports the key type.
pub trait Map: Reflect {
    fn len(&self) -> usize;

    /// Type name of the key, for diagnostics.
    fn key_type_name(&self) -> &'static str;

    /// Iterates in the map's own order, or `None` if keys are not string-like.
    fn iter(&self) -> Option<MapIter<'_>>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A type usable as a map key.
///
/// ```
/// use gj_reflect::ops::MapKey;
///
/// assert_eq!(String::from("k").key_str(), Some("k"));
/// assert_eq!(7_u32.key_str(), None);
/// assert!(!u32::STRING_LIKE);
/// ```
pub trait MapKey: 'static {
    /// Whether every key of this type has a string form.
    const STRING_LIKE: bool;

    fn key_str(&self) -> Option<&str>;
}

macro_rules! impl_string_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                const STRING_LIKE: bool = true;

                #[inline]
                fn key_str(&self) -> Option<&str> {
                    Some(&**self)
                }
            }
        )*
    };
}

macro_rules! impl_non_string_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                const STRING_LIKE: bool = false;

                #[inline]
                fn key_str(&self) -> Option<&str> {
                    None
                }
            }
        )*
    };
}

impl_string_key!(String, &'static str, Box<str>, Rc<str>, Arc<str>, Cow<'static, str>);

impl_non_string_key!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);
