use alloc::boxed::Box;
use core::cell::{Ref, RefCell};
use core::ops::Deref;
use std::sync::{Mutex, RwLock, TryLockError};

use crate::ops::{BorrowError, Borrowed, Guarded};
use crate::{Reflect, ReflectRef};

impl<T: Reflect> Reflect for RefCell<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Guarded(self)
    }
}

impl<T: Reflect> Guarded for RefCell<T> {
    fn try_borrow(&self) -> Result<Borrowed<'_>, BorrowError> {
        let guard = RefCell::try_borrow(self).map_err(|_| BorrowError::MutablyBorrowed)?;
        Ok(Box::new(Ref::map(guard, as_dyn::<T>)))
    }
}

#[inline(always)]
fn as_dyn<T: Reflect>(value: &T) -> &(dyn Reflect + 'static) {
    value
}

// Adapts a lock guard of `T` into a guard of `dyn Reflect`.
struct LockGuard<G>(G);

impl<G> Deref for LockGuard<G>
where
    G: Deref,
    G::Target: Reflect + Sized,
{
    type Target = dyn Reflect;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

// A poisoned lock still holds a readable value; encoding only reads it.
fn lock_result<G>(result: Result<G, TryLockError<G>>) -> Result<G, BorrowError> {
    match result {
        Ok(guard) => Ok(guard),
        Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
        Err(TryLockError::WouldBlock) => Err(BorrowError::WouldBlock),
    }
}

impl<T: Reflect> Reflect for Mutex<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Guarded(self)
    }
}

impl<T: Reflect> Guarded for Mutex<T> {
    fn try_borrow(&self) -> Result<Borrowed<'_>, BorrowError> {
        let guard = lock_result(self.try_lock())?;
        Ok(Box::new(LockGuard(guard)))
    }
}

impl<T: Reflect> Reflect for RwLock<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Guarded(self)
    }
}

impl<T: Reflect> Guarded for RwLock<T> {
    fn try_borrow(&self) -> Result<Borrowed<'_>, BorrowError> {
        let guard = lock_result(self.try_read())?;
        Ok(Box::new(LockGuard(guard)))
    }
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;
    use std::sync::Mutex;

    use crate::ops::BorrowError;
    use crate::{Reflect, ReflectRef, Scalar};

    fn borrow_scalar(value: &dyn Reflect) -> Result<Option<i64>, BorrowError> {
        let ReflectRef::Guarded(cell) = value.reflect_ref() else {
            panic!("not a cell");
        };
        let inner = cell.try_borrow()?;
        Ok(match inner.reflect_ref() {
            ReflectRef::Scalar(Scalar::Int(v)) => Some(v),
            _ => None,
        })
    }

    #[test]
    fn ref_cell_borrow() {
        let cell = RefCell::new(5_i32);
        assert_eq!(borrow_scalar(&cell), Ok(Some(5)));

        let _guard = cell.borrow_mut();
        assert_eq!(borrow_scalar(&cell), Err(BorrowError::MutablyBorrowed));
    }

    #[test]
    fn mutex_borrow() {
        let mutex = Mutex::new(9_i64);
        assert_eq!(borrow_scalar(&mutex), Ok(Some(9)));

        let _guard = mutex.lock().unwrap();
        assert_eq!(borrow_scalar(&mutex), Err(BorrowError::WouldBlock));
    }
}
