use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;

use crate::{Reflect, ReflectRef};

impl<T: Reflect> Reflect for Option<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match self {
            Some(value) => ReflectRef::Pointer(value),
            None => ReflectRef::Null,
        }
    }
}

macro_rules! impl_reflect_pointer {
    ($($ty:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $ty<T> {
                #[inline]
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Pointer(&**self)
                }
            }
        )*
    };
}

impl_reflect_pointer!(Box, Rc, Arc);

// Type-erased values, e.g. the values of a heterogeneous map.
macro_rules! impl_reflect_dyn_pointer {
    ($($ty:ident),*) => {
        $(
            impl Reflect for $ty<dyn Reflect> {
                #[inline]
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Pointer(&**self)
                }
            }
        )*
    };
}

impl_reflect_dyn_pointer!(Box, Rc, Arc);

impl Reflect for () {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Null
    }
}
