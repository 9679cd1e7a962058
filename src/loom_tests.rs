//! Model-checked interleavings, run with `RUSTFLAGS="--cfg loom"`.

use {
    crate::SlotLock,
    loom::{sync::Arc, thread},
};

/// Checks that `cursor` is the first empty slot under the read lock.
fn assert_cursor<T>(slots: &SlotLock<T>) {
    let guard = slots.read().unwrap();
    let first_empty = guard
        .as_slice()
        .iter()
        .position(Option::is_none)
        .unwrap_or(guard.capacity());
    assert_eq!(guard.cursor(), first_empty);
    assert_eq!(slots.cursor(), first_empty);
}

#[test]
fn concurrent_appends_take_distinct_slots() {
    loom::model(|| {
        let slots = Arc::new(SlotLock::with_capacity(2));
        let handles: Vec<_> = (0..2)
            .map(|t| {
                let s = Arc::clone(&slots);
                thread::spawn(move || s.try_append(t).unwrap())
            })
            .collect();
        let mut indices: Vec<_> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        indices.sort_unstable();
        assert_eq!(indices, [0, 1]);
        assert!(slots.is_full());
        assert!(!slots.append(2));
    });
}

#[test]
fn append_races_remove() {
    loom::model(|| {
        let slots = Arc::new(SlotLock::from(vec![0, 1]));
        let s = Arc::clone(&slots);
        let remover = thread::spawn(move || s.remove(0).unwrap());
        // either rejected up front, or lands in the freed slot
        let appended = slots.try_append(9);
        assert_eq!(remover.join().unwrap(), 0);
        match appended {
            Ok(index) => assert_eq!(index, 0),
            Err(full) => assert_eq!(full.into_inner(), 9),
        }
        assert_cursor(&slots);
    });
}

#[test]
fn append_races_resize() {
    loom::model(|| {
        let slots = Arc::new(SlotLock::growable(1, 1));
        let s = Arc::clone(&slots);
        let resizer = thread::spawn(move || s.resize(3));
        assert!(slots.append('a'));
        assert!(slots.append('b'));
        resizer.join().unwrap();
        assert!(slots.capacity() >= 2);
        assert_eq!(slots.occupied(), 2);
        assert_cursor(&slots);
    });
}
