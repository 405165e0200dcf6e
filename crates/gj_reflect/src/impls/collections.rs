use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::any::Any;

use crate::ops::List;
use crate::{Reflect, ReflectRef};

// `Vec<u8>` and `Box<[u8]>` are byte buffers; without specialization the
// generic impl checks its own concrete type.

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match (self as &dyn Any).downcast_ref::<Vec<u8>>() {
            Some(bytes) => ReflectRef::Bytes(bytes),
            None => ReflectRef::List(self),
        }
    }
}

impl<T: Reflect> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(Reflect::as_reflect)
    }
}

impl<T: Reflect> Reflect for Box<[T]> {
    fn reflect_ref(&self) -> ReflectRef<'_> {
        match (self as &dyn Any).downcast_ref::<Box<[u8]>>() {
            Some(bytes) => ReflectRef::Bytes(bytes),
            None => ReflectRef::List(self),
        }
    }
}

impl<T: Reflect> List for Box<[T]> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(Reflect::as_reflect)
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }
}

impl<T: Reflect> List for VecDeque<T> {
    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        VecDeque::get(self, index).map(Reflect::as_reflect)
    }
}

// Fixed-size arrays are sequences even for `u8`.
impl<T: Reflect, const N: usize> Reflect for [T; N] {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::List(self)
    }
}

impl<T: Reflect, const N: usize> List for [T; N] {
    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        self.as_slice().get(index).map(Reflect::as_reflect)
    }
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, vec, vec::Vec};

    use crate::{Reflect, ReflectKind};

    #[test]
    fn byte_buffers_are_detected() {
        let bytes: Vec<u8> = vec![1, 2, 3];
        let boxed: Box<[u8]> = Box::new([1, 2]);
        let words: Vec<u16> = vec![1, 2, 3];
        let array = [1_u8, 2];

        assert_eq!(bytes.reflect_ref().kind(), ReflectKind::Bytes);
        assert_eq!(boxed.reflect_ref().kind(), ReflectKind::Bytes);
        assert_eq!(words.reflect_ref().kind(), ReflectKind::List);
        assert_eq!(array.reflect_ref().kind(), ReflectKind::List);
    }

    #[test]
    fn list_access() {
        let list: Vec<u16> = vec![4, 5];
        let crate::ReflectRef::List(view) = list.reflect_ref() else {
            panic!("not a list");
        };
        assert_eq!(view.len(), 2);
        assert!(view.get(1).is_some());
        assert!(view.get(2).is_none());
    }
}
