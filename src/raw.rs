use {
    crate::{
        cap::Cap,
        error::{SlotError, SlotsFull},
    },
    std::{cmp::Ordering, fmt, mem},
};

/// Lock-protected data of the [`SlotLock`](crate::SlotLock).
///
/// You can mutate this only through a
/// [`SlotWriteGuard`](crate::guard::SlotWriteGuard).
///
/// # Invariants
/// * `buf.len()` is the capacity and is never zero.
/// * `cursor` is the index of the first `None` in `buf`, or `buf.len()` when
///   every slot is occupied.
///
/// Values displaced by a mutation are dropped only after `cursor` is
/// recomputed, so a panicking `Drop` of `T` cannot break the invariants.
pub(crate) struct RawSlots<T> {
    buf: Vec<Option<T>>,
    cursor: usize,
}

impl<T> RawSlots<T> {
    pub(crate) fn with_capacity(cap: Cap) -> Self {
        Self {
            buf: empty_buf(cap.get()),
            cursor: 0,
        }
    }
    /// Takes every element of `values` as an occupied slot.
    ///
    /// An empty `values` yields an array of [`Cap::MIN`] empty slots.
    pub(crate) fn from_vec(values: Vec<T>) -> Self {
        let mut buf: Vec<_> = values.into_iter().map(Some).collect();
        let cap = Cap::new::<T>(buf.len());
        buf.resize_with(cap.get(), || None);
        let mut this = Self { buf, cursor: 0 };
        this.recompute();
        this
    }
    #[inline]
    pub(crate) fn into_vec(self) -> Vec<Option<T>> {
        self.buf
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buf.len()
    }
    #[inline]
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }
    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.cursor == self.capacity()
    }
    #[inline]
    pub(crate) fn as_slice(&self) -> &[Option<T>] {
        &self.buf
    }
    pub(crate) fn occupied(&self) -> usize {
        self.buf.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns an error if `index` is not in `0..capacity`.
    #[inline]
    pub(crate) fn check(&self, index: usize) -> Result<(), SlotError> {
        let capacity = self.capacity();
        if index < capacity {
            Ok(())
        } else {
            Err(SlotError::OutOfBounds { index, capacity })
        }
    }
    pub(crate) fn get(&self, index: usize) -> Result<&T, SlotError> {
        self.check(index)?;
        self.buf[index].as_ref().ok_or(SlotError::Empty { index })
    }

    /// Moves `cursor` to the first empty slot, scanning from the start.
    pub(crate) fn recompute(&mut self) {
        self.cursor = self
            .buf
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.buf.len());
    }

    /// Writes `value` at `cursor`.
    ///
    /// # Errors
    /// Returns the value back if every slot is occupied.
    pub(crate) fn append(&mut self, value: T) -> Result<usize, SlotsFull<T>> {
        let index = self.cursor;
        let Some(slot) = self.buf.get_mut(index) else {
            return Err(SlotsFull(value));
        };
        *slot = Some(value);
        self.recompute();
        Ok(index)
    }

    /// Overwrites the slot at `index` clamped to `0..capacity`, returning the
    /// clamped index and the previous occupant.
    pub(crate) fn force_write(
        &mut self,
        index: isize,
        value: T,
    ) -> (usize, Option<T>) {
        let last = self.capacity() - 1;
        let index = usize::try_from(index).map_or(0, |index| index.min(last));
        let old = self.buf[index].replace(value);
        // any other slot keeps `cursor` pointing at the first empty one
        if index == self.cursor {
            self.recompute();
        }
        (index, old)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Result<T, SlotError> {
        self.check(index)?;
        let value = self.buf[index].take().ok_or(SlotError::Empty { index })?;
        self.recompute();
        Ok(value)
    }

    pub(crate) fn clear(&mut self) {
        let capacity = self.capacity();
        let old = mem::replace(&mut self.buf, empty_buf(capacity));
        self.cursor = 0;
        drop(old);
    }

    /// Increases the capacity by `increment`.
    ///
    /// Returns `false` if the capacity cannot grow any further.
    pub(crate) fn grow(&mut self, increment: usize) -> bool {
        let Some(cap) = self.cap().grow::<T>(increment) else {
            return false;
        };
        self.buf.resize_with(cap.get(), || None);
        self.recompute();
        true
    }

    /// Truncates or extends the buffer to `cap` slots, keeping the
    /// overlapping prefix.
    pub(crate) fn resize(&mut self, cap: Cap) {
        let cap = cap.get();
        if cap < self.capacity() {
            let tail = self.buf.split_off(cap);
            self.recompute();
            drop(tail);
        } else {
            self.buf.resize_with(cap, || None);
            self.recompute();
        }
    }

    /// Overwrites slots `0..` with `values`, stopping at the capacity.
    ///
    /// Returns the number of slots written.
    pub(crate) fn fill<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        // `buf` first so no value is pulled once the slots run out
        let displaced: Vec<_> = self
            .buf
            .iter_mut()
            .zip(values)
            .map(|(slot, value)| slot.replace(value))
            .collect();
        self.recompute();
        displaced.len()
    }

    /// Stable sort of the occupied slots, empty slots are moved to the end.
    pub(crate) fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.buf.sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => compare(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.recompute();
    }

    #[inline]
    fn cap(&self) -> Cap {
        Cap::new::<T>(self.capacity())
    }
}

fn empty_buf<T>(cap: usize) -> Vec<Option<T>> {
    let mut buf = Vec::with_capacity(cap);
    buf.resize_with(cap, || None);
    buf
}

impl<T: fmt::Display> fmt::Display for RawSlots<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {}", self.capacity())?;
        writeln!(f, "Next free index: {}", self.cursor)?;
        writeln!(f, "Elements:")?;
        for (index, value) in self
            .buf
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
        {
            writeln!(f, "[{index}] {value}")?;
        }
        Ok(())
    }
}
