//! Capacity abstraction to permit its invariants.

/// Representation of the `capacity`.
///
/// # Invariants
/// * Inner value is never zero.
/// * `inner * size_of::<Option<T>>()` never exceeds [`isize::MAX`].
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Cap(usize);
impl Cap {
    /// The smallest capacity, substituted for a requested capacity of zero.
    pub(crate) const MIN: Self = Self(1);

    /// Largest capacity a buffer of `Option<T>` can be allocated with.
    #[inline]
    pub(crate) const fn max<T>() -> usize {
        let size = size_of::<Option<T>>();
        let size = if size == 0 { 1 } else { size };
        isize::MAX as usize / size
    }

    /// Creates a new `capacity`, clamping `cap` into the valid range.
    ///
    /// Never fails: a zero capacity becomes [`Cap::MIN`] and an oversized
    /// one becomes [`Cap::max`], each with a warning.
    pub(crate) fn new<T>(cap: usize) -> Self {
        let max = Self::max::<T>();
        match cap {
            0 => {
                tracing::warn!(
                    requested = cap,
                    substituted = Self::MIN.0,
                    "capacity must be non-zero, using the minimum capacity"
                );
                Self::MIN
            }
            _ if cap > max => {
                tracing::warn!(
                    requested = cap,
                    substituted = max,
                    "capacity overflows the maximum allocation size, clamping"
                );
                Self(max)
            }
            _ => Self(cap),
        }
    }

    /// Adds `increment` to the capacity, saturating at [`Cap::max`].
    ///
    /// Returns `None` if the capacity is already at its maximum.
    #[inline]
    pub(crate) fn grow<T>(self, increment: usize) -> Option<Self> {
        let max = Self::max::<T>();
        if self.0 >= max {
            return None;
        }
        Some(Self(self.0.saturating_add(increment).min(max)))
    }

    /// Returns the `capacity` as a primitive value.
    #[inline]
    pub(crate) const fn get(self) -> usize {
        self.0
    }
}
