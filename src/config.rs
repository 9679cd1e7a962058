//! Construction options for a [`SlotLock`](crate::SlotLock).

use std::num::NonZeroUsize;

/// Options recognized by [`SlotLock::with_config`](crate::SlotLock::with_config).
///
/// # Examples
/// ```
/// use slotlock::{SlotLock, config::Config};
///
/// let slots: SlotLock<u8> =
///     SlotLock::with_config(Config::new().capacity(4).growth(2).debug(true));
/// assert_eq!(slots.capacity(), 4);
/// assert!(slots.is_growable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of slots allocated up front.
    ///
    /// `None` falls back to a single slot and logs a warning.
    pub capacity: Option<usize>,
    /// Slots added when an append finds the array full.
    ///
    /// `None` makes the array reject appends once full.
    pub growth: Option<NonZeroUsize>,
    /// Emit a `tracing` debug event for every state transition.
    pub debug: bool,
}

impl Config {
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            capacity: None,
            growth: None,
            debug: false,
        }
    }
    #[inline]
    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
    /// A `growth` of zero disables growing.
    #[inline]
    #[must_use]
    pub const fn growth(mut self, growth: usize) -> Self {
        self.growth = NonZeroUsize::new(growth);
        self
    }
    #[inline]
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
