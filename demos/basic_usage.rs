use {
    slotlock::{SlotLock, config::Config},
    std::fmt,
    tracing_subscriber::EnvFilter,
};

#[derive(Debug, Clone)]
struct Sample(u32);

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sample({})", self.0)
    }
}

fn main() {
    // `RUST_LOG=debug` shows every state transition
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let slots = SlotLock::with_config(Config::new().capacity(150).debug(true));
    assert!(slots.append(Sample(25)));
    assert!(slots.append(Sample(192)));

    // out of range indices are clamped to the last slot
    slots.force_write(11_231_234, Sample(353));
    assert!(slots.append(Sample(1029)));

    assert_eq!(slots.with_slot(0, |s| s.0), Ok(25));
    assert_eq!(slots.with_slot(149, |s| s.0), Ok(353));
    assert_eq!(slots.cursor(), 3);

    // readers share the lock, writers take it exclusively
    {
        let mut w = slots.write().unwrap();
        assert!(slots.is_locked());
        w.remove(1).unwrap();
        assert_eq!(w.cursor(), 1);
    }
    assert!(!slots.is_locked());

    print!("{slots}");
}
