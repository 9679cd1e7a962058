use {
    crate::{
        SlotLock,
        cap::Cap,
        error::{SlotError, SlotsFull},
        raw::RawSlots,
        sync::{Ordering, RwLockReadGuard, RwLockWriteGuard},
    },
    std::{cmp, fmt, ops},
};

/// Exclusive access to a [`SlotLock`], returned by
/// [`SlotLock::write`].
///
/// Every mutation recomputes the cursor before returning, and the lock is
/// released when the guard is dropped.
pub struct SlotWriteGuard<'a, T> {
    slots: RwLockWriteGuard<'a, RawSlots<T>>,
    lock: &'a SlotLock<T>,
}

/// Shared access to a [`SlotLock`], returned by [`SlotLock::read`].
///
/// Any number of readers may hold one at once; writers wait for all of them.
pub struct SlotReadGuard<'a, T> {
    slots: RwLockReadGuard<'a, RawSlots<T>>,
    lock: &'a SlotLock<T>,
}

/// Read-only accessors shared by both guards.
macro_rules! impl_read_view {
    ($guard:ident) => {
        impl<T> $guard<'_, T> {
            #[inline]
            #[must_use]
            pub fn capacity(&self) -> usize {
                self.slots.capacity()
            }
            /// Index of the first empty slot, `capacity` if there is none.
            #[inline]
            #[must_use]
            pub fn cursor(&self) -> usize {
                self.slots.cursor()
            }
            #[inline]
            #[must_use]
            pub fn is_full(&self) -> bool {
                self.slots.is_full()
            }
            /// Number of occupied slots.
            #[inline]
            #[must_use]
            pub fn occupied(&self) -> usize {
                self.slots.occupied()
            }
            #[inline]
            #[must_use]
            pub fn as_slice(&self) -> &[Option<T>] {
                self.slots.as_slice()
            }
            /// # Errors
            /// * [`SlotError::OutOfBounds`] if `index >= capacity`
            /// * [`SlotError::Empty`] if nothing is stored at `index`
            #[inline]
            pub fn get(&self, index: usize) -> Result<&T, SlotError> {
                self.slots.get(index)
            }
            /// Iterates over the occupied slots with their indices.
            pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
                self.slots
                    .as_slice()
                    .iter()
                    .enumerate()
                    .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
            }
        }

        impl<T> ops::Deref for $guard<'_, T> {
            type Target = [Option<T>];
            #[inline]
            fn deref(&self) -> &Self::Target {
                self.as_slice()
            }
        }

        impl<T: fmt::Display> fmt::Display for $guard<'_, T> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&*self.slots, f)
            }
        }
    };
}

impl_read_view!(SlotWriteGuard);
impl_read_view!(SlotReadGuard);

impl<'a, T> SlotReadGuard<'a, T> {
    #[inline]
    pub(crate) fn new(
        lock: &'a SlotLock<T>,
        slots: RwLockReadGuard<'a, RawSlots<T>>,
    ) -> Self {
        lock.readers.fetch_add(1, Ordering::AcqRel);
        Self { slots, lock }
    }
}

impl<T> Drop for SlotReadGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.readers.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<'a, T> SlotWriteGuard<'a, T> {
    pub(crate) fn new(
        lock: &'a SlotLock<T>,
        slots: RwLockWriteGuard<'a, RawSlots<T>>,
    ) -> Self {
        lock.locked.store(true, Ordering::Release);
        Self { slots, lock }
    }

    /// Restores the cursor after a writer panicked mid-mutation, then lifts
    /// the poison so later lock calls succeed again.
    pub(crate) fn recover(&mut self) {
        tracing::warn!("recovering a poisoned `SlotLock`, recomputing cursor");
        self.slots.recompute();
        self.publish();
        // loom's `RwLock` has no poison flag to clear
        #[cfg(not(loom))]
        self.lock.slots.clear_poison();
    }

    /// Mirrors the locked state into the lock-free accessors.
    fn publish(&self) {
        let lock = self.lock;
        lock.capacity.store(self.slots.capacity(), Ordering::Release);
        lock.cursor.store(self.slots.cursor(), Ordering::Release);
        lock.full.store(self.slots.is_full(), Ordering::Release);
    }

    /// Writes `value` at the cursor and returns the index it landed on.
    ///
    /// A growable array adds its growth increment to the capacity first if
    /// every slot is occupied.
    ///
    /// # Errors
    /// Returns the value back if the array is full and cannot grow.
    pub fn try_append(&mut self, value: T) -> Result<usize, SlotsFull<T>> {
        let SlotLock { debug, growth, .. } = *self.lock;
        if self.slots.is_full() {
            let grown = growth
                .is_some_and(|increment| self.slots.grow(increment.get()));
            if !grown {
                verbose!(
                    debug,
                    capacity = self.slots.capacity(),
                    "array is full, append rejected"
                );
                return Err(SlotsFull(value));
            }
            verbose!(debug, capacity = self.slots.capacity(), "array grown");
        }
        let index = self.slots.append(value)?;
        self.publish();
        verbose!(
            debug,
            index,
            cursor = self.slots.cursor(),
            "element appended"
        );
        Ok(index)
    }

    /// Like [`try_append`](Self::try_append), dropping the value and
    /// returning `false` if it was rejected.
    #[inline]
    pub fn append(&mut self, value: T) -> bool {
        self.try_append(value).is_ok()
    }

    /// Overwrites a slot regardless of its occupant.
    ///
    /// `index` is clamped into `0..capacity`: negative indices write slot
    /// `0`, indices past the end write the last slot. The cursor is only
    /// recomputed if the written slot was the cursor.
    ///
    /// Returns the displaced occupant.
    pub fn force_write(&mut self, index: isize, value: T) -> Option<T> {
        let (written, old) = self.slots.force_write(index, value);
        self.publish();
        verbose!(
            self.lock.debug,
            requested = index,
            index = written,
            cursor = self.slots.cursor(),
            "element force written"
        );
        old
    }

    /// Empties the slot at `index`, returning its value.
    ///
    /// # Errors
    /// * [`SlotError::OutOfBounds`] if `index >= capacity`
    /// * [`SlotError::Empty`] if the slot is already empty, the array is
    ///   left unchanged
    pub fn remove(&mut self, index: usize) -> Result<T, SlotError> {
        let removed = self.slots.remove(index);
        match &removed {
            Ok(_) => {
                self.publish();
                verbose!(
                    self.lock.debug,
                    index,
                    cursor = self.slots.cursor(),
                    "element removed"
                );
            }
            Err(e) => verbose!(self.lock.debug, index, "remove failed: {e}"),
        }
        removed
    }

    /// Empties every slot, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.publish();
        verbose!(
            self.lock.debug,
            capacity = self.slots.capacity(),
            "all elements cleared"
        );
    }

    /// Changes the capacity, keeping the elements of the overlapping prefix.
    ///
    /// Elements past a smaller capacity are dropped. A capacity of zero is
    /// replaced with the minimum capacity of one.
    pub fn resize(&mut self, capacity: usize) {
        self.slots.resize(Cap::new::<T>(capacity));
        self.publish();
        verbose!(
            self.lock.debug,
            capacity = self.slots.capacity(),
            cursor = self.slots.cursor(),
            "array resized"
        );
    }

    /// Overwrites slots `0..` with `values` in order, stopping when the slots
    /// run out. Values past the capacity are not consumed.
    ///
    /// Returns the number of slots written.
    pub fn fill<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let written = self.slots.fill(values);
        self.publish();
        verbose!(
            self.lock.debug,
            written,
            cursor = self.slots.cursor(),
            "array filled"
        );
        written
    }

    /// Stable sort of the occupied slots by `compare`, moving every empty
    /// slot to the end.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> cmp::Ordering,
    {
        self.slots.sort_by(compare);
        self.publish();
        verbose!(
            self.lock.debug,
            cursor = self.slots.cursor(),
            "array sorted"
        );
    }

    /// Stable sort of the occupied slots, ascending or descending, moving
    /// every empty slot to the end.
    pub fn sort(&mut self, ascending: bool)
    where
        T: Ord,
    {
        if ascending {
            self.sort_by(Ord::cmp);
        } else {
            self.sort_by(|a, b| b.cmp(a));
        }
    }
}

impl<T> Drop for SlotWriteGuard<'_, T> {
    fn drop(&mut self) {
        self.lock.locked.store(false, Ordering::Release);
    }
}
