use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;

use crate::Reflect;
use crate::info::RecordInfo;

/// A record type with static metadata.
///
/// Implemented by `#[derive(Reflect)]`. Smart pointers and `Option`
/// forward to their target, so `Box<Base>` can be embedded like `Base`.
pub trait Typed: Reflect {
    fn record_info() -> &'static RecordInfo;
}

macro_rules! impl_typed_forward {
    ($($ty:ident),*) => {
        $(
            impl<T: Typed> Typed for $ty<T> {
                #[inline]
                fn record_info() -> &'static RecordInfo {
                    T::record_info()
                }
            }
        )*
    };
}

impl_typed_forward!(Box, Option, Rc, Arc);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::*;
    use crate::derive::Reflect;

    #[derive(Reflect)]
    pub struct Chain {
        #[reflect(json = "value")]
        pub value: u8,
        #[reflect(embed)]
        pub next: Option<Box<Chain>>,
    }

    #[derive(Reflect)]
    pub struct Tagged<T> {
        #[reflect(embed)]
        pub inner: Box<T>,
        #[reflect(json = "tag")]
        pub tag: u8,
    }

    #[test]
    fn self_embedding_points_back() {
        let info = Chain::record_info();
        let next = info.field("next").unwrap();
        assert!(next.is_embedded());
        assert!(next.embedded_info().unwrap().type_is::<Chain>());
    }

    #[test]
    fn generic_embedding_forwards() {
        let info = <Tagged<Chain> as Typed>::record_info();
        let inner = info.field("inner").unwrap().embedded_info().unwrap();
        assert!(inner.type_is::<Chain>());
        assert!(info.type_is::<Tagged<Chain>>());
    }
}
