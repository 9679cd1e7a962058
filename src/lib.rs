#![doc = include_str!("../docs/lib-docs.md")]
//! # Examples
//! ```
#![doc = include_str!("../demos/basic_usage.rs")]
//! ```

#[macro_use]
mod macros;

mod cap;
pub mod config;
pub mod error;
pub mod guard;
mod raw;
mod sync;
#[cfg(all(test, loom))]
mod loom_tests;

pub use crate::{
    config::Config,
    error::{SlotError, SlotsFull},
    guard::{SlotReadGuard, SlotWriteGuard},
};

use {
    crate::{
        cap::Cap,
        raw::RawSlots,
        sync::{AtomicBool, AtomicUsize, Ordering, RwLock},
    },
    std::{
        cmp, fmt,
        num::NonZeroUsize,
        sync::{LockResult, PoisonError, TryLockError, TryLockResult},
    },
};

#[doc = include_str!("../docs/slotlock.md")]
/// # Examples
/// ```
#[doc = include_str!("../demos/basic_usage.rs")]
/// ```
pub struct SlotLock<T> {
    slots: RwLock<RawSlots<T>>,
    /// Mirrors of the locked state, published after every mutation.
    capacity: AtomicUsize,
    cursor: AtomicUsize,
    full: AtomicBool,
    /// Set while a [`SlotWriteGuard`] is alive.
    locked: AtomicBool,
    /// Number of live [`SlotReadGuard`]s.
    readers: AtomicUsize,
    growth: Option<NonZeroUsize>,
    debug: bool,
}

impl<T> SlotLock<T> {
    /// Constructs a new [`SlotLock<T>`] with a single slot.
    ///
    /// No capacity was given, so a warning is logged.
    ///
    /// # Examples
    /// ```
    /// use slotlock::SlotLock;
    ///
    /// let slots: SlotLock<u32> = SlotLock::new();
    /// assert_eq!(slots.capacity(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::new())
    }

    /// Constructs a new, non-growable [`SlotLock<T>`] with `capacity` slots.
    ///
    /// A capacity of zero is replaced with one (and logged).
    ///
    /// # Examples
    /// ```
    /// use slotlock::SlotLock;
    ///
    /// let slots: SlotLock<String> = SlotLock::with_capacity(10);
    /// assert_eq!(slots.capacity(), 10);
    /// assert!(!slots.is_growable());
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config::new().capacity(capacity))
    }

    /// Constructs a new [`SlotLock<T>`] with `capacity` slots that grows by
    /// `growth` slots whenever an append finds it full.
    ///
    /// # Examples
    /// ```
    /// use slotlock::SlotLock;
    ///
    /// let slots = SlotLock::growable(1, 4);
    /// assert!(slots.append('a'));
    /// assert!(slots.append('b'));
    /// assert_eq!(slots.capacity(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub fn growable(capacity: usize, growth: usize) -> Self {
        Self::with_config(Config::new().capacity(capacity).growth(growth))
    }

    /// Constructs a new [`SlotLock<T>`] from a [`Config`].
    ///
    /// Never fails: a missing or zero capacity becomes one slot.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let cap = match config.capacity {
            Some(capacity) => Cap::new::<T>(capacity),
            None => {
                tracing::warn!(
                    capacity = Cap::MIN.get(),
                    "no capacity configured, using the minimum capacity"
                );
                Cap::MIN
            }
        };
        let this = Self::from_raw(
            RawSlots::with_capacity(cap),
            config.growth,
            config.debug,
        );
        verbose!(
            this.debug,
            capacity = cap.get(),
            growth = ?config.growth,
            "slot array created"
        );
        this
    }

    fn from_raw(
        raw: RawSlots<T>,
        growth: Option<NonZeroUsize>,
        debug: bool,
    ) -> Self {
        Self {
            capacity: AtomicUsize::new(raw.capacity()),
            cursor: AtomicUsize::new(raw.cursor()),
            full: AtomicBool::new(raw.is_full()),
            locked: AtomicBool::new(false),
            readers: AtomicUsize::new(0),
            slots: RwLock::new(raw),
            growth,
            debug,
        }
    }

    // ----------------------------- lock-free -----------------------------

    /// Current number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.load(Ordering::Acquire)
    }
    /// Index of the first empty slot (where the next append lands), or
    /// [`capacity`](Self::capacity) if every slot is occupied.
    ///
    /// This is a snapshot; hold a guard for a value that stays accurate.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
    /// Whether every slot was occupied at the last mutation.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.full.load(Ordering::Acquire)
    }
    #[inline]
    #[must_use]
    pub fn is_growable(&self) -> bool {
        self.growth.is_some()
    }
    /// Slots added when an append finds the array full.
    #[inline]
    #[must_use]
    pub fn growth(&self) -> Option<NonZeroUsize> {
        self.growth
    }
    /// Whether the lock is currently held, by a [`SlotWriteGuard`] or by
    /// any [`SlotReadGuard`].
    ///
    /// Best effort: the answer may be stale by the time it is read. Use it
    /// for diagnostics, never for synchronization.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
            || self.readers.load(Ordering::Acquire) > 0
    }

    // ------------------------------- locks -------------------------------

    /// Locks the array for mutation, blocking until no other guard is alive.
    ///
    /// # Errors
    /// If a previous writer panicked the lock is poisoned. The guard inside
    /// the [`PoisonError`] is still usable: its cursor was recomputed and
    /// the poison cleared, so the next call succeeds.
    pub fn write(&self) -> LockResult<SlotWriteGuard<'_, T>> {
        match self.slots.write() {
            Ok(guard) => Ok(SlotWriteGuard::new(self, guard)),
            Err(e) => {
                let mut guard = SlotWriteGuard::new(self, e.into_inner());
                guard.recover();
                Err(PoisonError::new(guard))
            }
        }
    }
    /// Attempts to lock the array for mutation without blocking.
    ///
    /// # Errors
    /// [`TryLockError::WouldBlock`] if any guard is alive, or
    /// [`TryLockError::Poisoned`] as in [`write`](Self::write).
    pub fn try_write(&self) -> TryLockResult<SlotWriteGuard<'_, T>> {
        match self.slots.try_write() {
            Ok(guard) => Ok(SlotWriteGuard::new(self, guard)),
            Err(TryLockError::Poisoned(e)) => {
                let mut guard = SlotWriteGuard::new(self, e.into_inner());
                guard.recover();
                Err(TryLockError::Poisoned(PoisonError::new(guard)))
            }
            Err(TryLockError::WouldBlock) => Err(TryLockError::WouldBlock),
        }
    }
    /// Locks the array for reading, blocking while a writer is alive.
    ///
    /// # Errors
    /// If a previous writer panicked and no writer has recovered the lock
    /// since, it is poisoned; the guard inside the [`PoisonError`] can still
    /// be used.
    pub fn read(&self) -> LockResult<SlotReadGuard<'_, T>> {
        match self.slots.read() {
            Ok(guard) => Ok(SlotReadGuard::new(self, guard)),
            Err(e) => {
                Err(PoisonError::new(SlotReadGuard::new(self, e.into_inner())))
            }
        }
    }
    /// Attempts to lock the array for reading without blocking.
    ///
    /// # Errors
    /// [`TryLockError::WouldBlock`] if a writer is alive, or
    /// [`TryLockError::Poisoned`] as in [`read`](Self::read).
    pub fn try_read(&self) -> TryLockResult<SlotReadGuard<'_, T>> {
        match self.slots.try_read() {
            Ok(guard) => Ok(SlotReadGuard::new(self, guard)),
            Err(TryLockError::Poisoned(e)) => Err(TryLockError::Poisoned(
                PoisonError::new(SlotReadGuard::new(self, e.into_inner())),
            )),
            Err(TryLockError::WouldBlock) => Err(TryLockError::WouldBlock),
        }
    }

    /// Write lock for the one-shot operations, which never report poisoning.
    #[inline]
    fn lock(&self) -> SlotWriteGuard<'_, T> {
        self.write().unwrap_or_else(PoisonError::into_inner)
    }
    #[inline]
    fn view(&self) -> SlotReadGuard<'_, T> {
        self.read().unwrap_or_else(PoisonError::into_inner)
    }

    // ----------------------------- mutation -----------------------------

    /// Appends `value` to the first empty slot.
    ///
    /// Returns `false` if the array is full and not growable; `value` is
    /// dropped in that case. See [`try_append`](Self::try_append) to get it
    /// back.
    #[inline]
    pub fn append(&self, value: T) -> bool {
        self.try_append(value).is_ok()
    }

    /// Appends `value` to the first empty slot, returning its index.
    ///
    /// A full, non-growable array is rejected before taking the lock.
    ///
    /// # Errors
    /// Returns the value back if the array is full and cannot grow.
    ///
    /// # Examples
    /// ```
    /// use slotlock::SlotLock;
    ///
    /// let slots = SlotLock::with_capacity(1);
    /// assert_eq!(slots.try_append("a"), Ok(0));
    /// assert_eq!(slots.try_append("b").unwrap_err().into_inner(), "b");
    /// ```
    pub fn try_append(&self, value: T) -> Result<usize, SlotsFull<T>> {
        if self.growth.is_none() && self.is_full() {
            verbose!(
                self.debug,
                capacity = self.capacity(),
                "array is full, append rejected"
            );
            return Err(SlotsFull(value));
        }
        self.lock().try_append(value)
    }

    /// Overwrites the slot at `index`, clamped into `0..capacity`, and
    /// returns its previous occupant.
    ///
    /// # Examples
    /// ```
    /// use slotlock::SlotLock;
    ///
    /// let slots = SlotLock::with_capacity(3);
    /// slots.force_write(-5, 'a');
    /// slots.force_write(100, 'z');
    /// assert_eq!(slots.get(0), Ok('a'));
    /// assert_eq!(slots.get(2), Ok('z'));
    /// ```
    #[inline]
    pub fn force_write(&self, index: isize, value: T) -> Option<T> {
        self.lock().force_write(index, value)
    }

    /// Empties the slot at `index`, returning its value.
    ///
    /// # Errors
    /// * [`SlotError::OutOfBounds`] if `index >= capacity`
    /// * [`SlotError::Empty`] if the slot is already empty
    #[inline]
    pub fn remove(&self, index: usize) -> Result<T, SlotError> {
        self.lock().remove(index)
    }

    /// Empties every slot, keeping the capacity.
    #[inline]
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Changes the capacity, keeping the elements of the overlapping prefix.
    #[inline]
    pub fn resize(&self, capacity: usize) {
        self.lock().resize(capacity);
    }

    /// Overwrites slots `0..` with `values` under a single lock.
    ///
    /// Returns the number of slots written.
    #[inline]
    pub fn fill<I>(&self, values: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        self.lock().fill(values)
    }

    /// Stable sort of the occupied slots, moving empty slots to the end.
    ///
    /// # Examples
    /// ```
    /// use slotlock::SlotLock;
    ///
    /// let slots = SlotLock::with_capacity(4);
    /// slots.fill([3, 1, 2]);
    /// slots.remove(1).unwrap();
    /// slots.sort(true);
    /// assert_eq!(slots.elements(), [Some(2), Some(3), None, None]);
    /// ```
    #[inline]
    pub fn sort(&self, ascending: bool)
    where
        T: Ord,
    {
        self.lock().sort(ascending);
    }

    #[inline]
    pub fn sort_by<F>(&self, compare: F)
    where
        F: FnMut(&T, &T) -> cmp::Ordering,
    {
        self.lock().sort_by(compare);
    }

    // ------------------------------- reads -------------------------------

    /// Returns a clone of the value at `index`.
    ///
    /// # Errors
    /// * [`SlotError::OutOfBounds`] if `index >= capacity`
    /// * [`SlotError::Empty`] if nothing is stored at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Result<T, SlotError>
    where
        T: Clone,
    {
        self.view().get(index).cloned()
    }

    /// Calls `f` with a reference to the value at `index` while holding a
    /// read lock.
    ///
    /// # Errors
    /// Same as [`get`](Self::get).
    #[inline]
    pub fn with_slot<R>(
        &self,
        index: usize,
        f: impl FnOnce(&T) -> R,
    ) -> Result<R, SlotError> {
        self.view().get(index).map(f)
    }

    /// Copies every slot, empty ones included.
    #[must_use]
    pub fn elements(&self) -> Vec<Option<T>>
    where
        T: Clone,
    {
        self.view().as_slice().to_vec()
    }

    /// Number of occupied slots.
    #[inline]
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.view().occupied()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    /// Consumes the array, returning its slots.
    #[must_use]
    pub fn into_inner(self) -> Vec<Option<T>> {
        self.slots
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_vec()
    }
}

impl<T> Default for SlotLock<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// ------------------------------- fmt impl -------------------------------

/// Renders the capacity, the cursor and every occupied slot.
///
/// Blocks while a writer is alive, so don't format an array while holding
/// its [`SlotWriteGuard`]; format the guard instead.
impl<T: fmt::Display> fmt::Display for SlotLock<T> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}

impl<T: fmt::Debug> fmt::Debug for SlotLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("SlotLock");
        d.field("capacity", &self.capacity())
            .field("cursor", &self.cursor())
            .field("growth", &self.growth);
        match self.try_read() {
            Ok(guard) => d.field("slots", &guard.as_slice()),
            Err(TryLockError::Poisoned(e)) => {
                d.field("slots", &e.get_ref().as_slice())
            }
            Err(TryLockError::WouldBlock) => {
                d.field("slots", &format_args!("<locked>"))
            }
        };
        d.finish()
    }
}

// ----------------------------- From impl -----------------------------

/// Every element becomes an occupied slot; the array is full and not
/// growable.
impl<T> From<Vec<T>> for SlotLock<T> {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Self::from_raw(RawSlots::from_vec(value), None, false)
    }
}
impl<T, const N: usize> From<[T; N]> for SlotLock<T> {
    #[inline]
    fn from(value: [T; N]) -> Self {
        Self::from(Vec::from(value))
    }
}
impl<T> From<SlotLock<T>> for Vec<Option<T>> {
    #[inline]
    fn from(value: SlotLock<T>) -> Self {
        value.into_inner()
    }
}
