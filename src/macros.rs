/// Emits a `tracing::debug!` event only when the array was built with
/// [`Config::debug()`](crate::config::Config::debug()).
macro_rules! verbose {
    ($enabled:expr, $($arg:tt)+) => {
        if $enabled {
            ::tracing::debug!($($arg)+);
        }
    };
}

/// Creates a [`SlotLock`](crate::SlotLock).
///
/// * `slot_lock!()` — default capacity (warns, see
///   [`SlotLock::new`](crate::SlotLock::new)).
/// * `slot_lock!(cap)` — empty array of capacity `cap`.
/// * `slot_lock!(cap, [a, b, c])` — capacity `cap`, elements appended in
///   order (extra elements beyond `cap` are rejected).
/// * `slot_lock!(elem; n)` — `n` clones of `elem`, capacity `n`.
/// * `slot_lock![a, b, c]` — full array holding exactly these elements.
#[macro_export]
macro_rules! slot_lock {
    () => {
        $crate::SlotLock::new()
    };
    ($capacity:expr) => {
        $crate::SlotLock::with_capacity($capacity)
    };

    ($capacity:expr, [$($elem:expr),*$(,)?]) => {{
        let __s__ = $crate::SlotLock::with_capacity($capacity);
        $(
            let _ = __s__.append($elem);
        )*
        __s__
    }};

    ($elem:expr ; $len:expr) => {{
        let __s__ = $crate::SlotLock::with_capacity($len);
        for _ in 0 .. $len {
            let _ = __s__.append(::std::clone::Clone::clone(&$elem));
        }
        __s__
    }};

    // this is last because everything can match this
    ($($elem:expr),+$(,)?) => {{
        $crate::SlotLock::from(::std::vec![$($elem),*])
    }};
}
