use crate::Reflect;
use crate::info::RecordInfo;

/// A record: a fixed set of named fields, addressed by declaration index.
///
/// Implemented by `#[derive(Reflect)]`. The index space is the one of
/// [`RecordInfo::field_at`], private and embedded fields included.
pub trait Record: Reflect {
    /// Metadata of the concrete record type.
    fn record_info(&self) -> &'static RecordInfo;

    /// The value of the field declared at `index`.
    fn field_at(&self, index: usize) -> Option<&dyn Reflect>;

    #[inline]
    fn field_len(&self) -> usize {
        self.record_info().field_len()
    }
}
