use std::thread;
use std::time::{Duration, Instant};

/// Monotonic millisecond clock, counted from construction.
#[derive(Clone, Copy, Debug)]
pub struct Ticktimer {
    origin: Instant,
}

impl Ticktimer {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    pub fn sleep_ms(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}
