use std::sync::mpsc::{Receiver, Sender, SyncSender};

use crate::{Reflect, ReflectRef};

// Values with no JSON form. They are reflected so that records holding them
// can be derived; the encoder rejects them when they are reached.

macro_rules! impl_reflect_opaque {
    ($(<$($param:ident),*> $ty:ty),* $(,)?) => {
        $(
            impl<$($param: 'static),*> Reflect for $ty {
                #[inline]
                fn reflect_ref(&self) -> ReflectRef<'_> {
                    ReflectRef::Opaque
                }
            }
        )*
    };
}

impl_reflect_opaque!(
    <R> fn() -> R,
    <A, R> fn(A) -> R,
    <A, B, R> fn(A, B) -> R,
    <T> Sender<T>,
    <T> SyncSender<T>,
    <T> Receiver<T>,
);

impl<T: ?Sized + 'static> Reflect for *const T {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Opaque
    }
}

impl<T: ?Sized + 'static> Reflect for *mut T {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Opaque
    }
}
