use {std::fmt, thiserror::Error};

/// Failure of an indexed access into a [`SlotLock`](crate::SlotLock).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SlotError {
    #[error("index {index} is out of bounds for a capacity of {capacity}")]
    OutOfBounds { index: usize, capacity: usize },
    #[error("slot {index} is empty")]
    Empty { index: usize },
}

/// Returned by [`try_append`](crate::SlotLock::try_append) when every slot
/// is occupied and the array cannot grow.
///
/// The rejected value is handed back to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Error)]
#[error("tried to append to a full `SlotLock`")]
pub struct SlotsFull<T>(pub T);

impl<T> SlotsFull<T> {
    /// Returns the value that could not be appended.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

// Manual impl so `T` doesn't need to be `Debug` for `unwrap()` on results.
impl<T> fmt::Debug for SlotsFull<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlotsFull").finish_non_exhaustive()
    }
}
