use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;

use crate::{Reflect, ReflectRef, Scalar};

macro_rules! impl_reflect_scalar {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                #[inline]
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Scalar(Scalar::$variant(*self as $wide))
                }
            }
        )*
    };
}

impl_reflect_scalar!(Int as i64: i8, i16, i32, i64, isize);
impl_reflect_scalar!(Uint as u64: u8, u16, u32, u64, usize);

impl Reflect for f32 {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Scalar(Scalar::F32(*self))
    }
}

impl Reflect for f64 {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Scalar(Scalar::F64(*self))
    }
}

impl Reflect for bool {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Scalar(Scalar::Bool(*self))
    }
}

impl Reflect for char {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Scalar(Scalar::Char(*self))
    }
}

macro_rules! impl_reflect_str {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                #[inline]
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Scalar(Scalar::Str(&**self))
                }
            }
        )*
    };
}

impl_reflect_str!(String, &'static str, Box<str>, Rc<str>, Arc<str>, Cow<'static, str>);

#[cfg(test)]
mod tests {
    use crate::{Reflect, ReflectRef, Scalar};

    fn scalar(value: &dyn Reflect) -> Scalar<'_> {
        match value.reflect_ref() {
            ReflectRef::Scalar(s) => s,
            other => panic!("expected scalar, got {}", other.kind()),
        }
    }

    #[test]
    fn integers_widen() {
        assert_eq!(scalar(&-3_i8), Scalar::Int(-3));
        assert_eq!(scalar(&u64::MAX), Scalar::Uint(u64::MAX));
        assert_eq!(scalar(&7_usize), Scalar::Uint(7));
    }

    #[test]
    fn strings_share_one_view() {
        let owned = String::from("hi");
        let boxed: Box<str> = "hi".into();
        assert_eq!(scalar(&owned), Scalar::Str("hi"));
        assert_eq!(scalar(&boxed), Scalar::Str("hi"));
        assert_eq!(scalar(&"hi"), Scalar::Str("hi"));
    }
}
