use std::fmt::Debug;

use derive_more::{Add, AddAssign, Sum};

/// A number of bytes of input.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Add, AddAssign, Sum)]
#[repr(transparent)]
pub struct ByteNum(usize);

impl ByteNum {
    pub const ZERO: ByteNum = ByteNum(0);

    #[inline]
    #[must_use]
    pub const fn new(bytes: usize) -> Self {
        Self(bytes)
    }

    #[inline]
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }
}

/// Receives progress updates from long running operations, such as writing a
/// `.lcpt` file.
pub trait ProgressNotifier: Debug + Send + Sync {
    /// Called after a record of `bytes` input bytes was processed.
    fn processed_bytes(&self, bytes: ByteNum);

    /// Called after a record was written.
    fn record_written(&self);
}

impl<T: ProgressNotifier> ProgressNotifier for &T {
    fn processed_bytes(&self, bytes: ByteNum) {
        T::processed_bytes(self, bytes)
    }

    fn record_written(&self) {
        T::record_written(self)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DummyProgressNotifier;

impl ProgressNotifier for DummyProgressNotifier {
    fn processed_bytes(&self, _bytes: ByteNum) {
        // do nothing
    }

    fn record_written(&self) {
        // do nothing
    }
}

#[cfg(test)]
mod tests {
    use crate::progress::{ByteNum, DummyProgressNotifier, ProgressNotifier};

    #[test]
    fn test_byte_num() {
        let mut bytes = ByteNum::new(10) + ByteNum::new(5);
        bytes += ByteNum::new(1);

        assert_eq!(bytes.get(), 16);
        assert_eq!(
            [ByteNum::new(1), ByteNum::new(2)].into_iter().sum::<ByteNum>(),
            ByteNum::new(3)
        );
        assert_eq!(ByteNum::default(), ByteNum::ZERO);
    }

    #[test]
    fn test_dummy_progress_notifier() {
        let notifier = DummyProgressNotifier;
        notifier.processed_bytes(ByteNum::new(1337));
        notifier.record_written();
        (&notifier).record_written();
    }
}
