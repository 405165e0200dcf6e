use crate::Reflect;

/// An ordered sequence of values.
pub trait List: Reflect {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Reflect>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
