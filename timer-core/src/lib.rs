//! Pure timing logic library with no platform dependencies.
//! Every call that depends on the current time takes `now_ms` from the
//! caller's monotonic clock; nothing in here reads a clock.

mod format;
mod laps;
mod stats;

pub use format::{format_delta, format_duration, format_hms_cs, DurationParts};
pub use laps::{Lap, Stopwatch};
pub use stats::{lap_deltas, lap_marks, LapMark, LapStats};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Elapsed-time accounting across pause boundaries.
///
/// While running, elapsed time is `accumulated_ms + (now - segment_start_ms)`,
/// i.e. the anchor is `segment_start_ms - accumulated_ms`. While paused or
/// idle the accumulated value is frozen.
#[derive(Clone, Debug, Default)]
pub struct TimerCore {
    state: TimerState,
    accumulated_ms: u64,
    segment_start_ms: u64,
}

impl TimerCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.state == TimerState::Running {
            return;
        }
        self.segment_start_ms = now_ms;
        self.state = TimerState::Running;
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.state != TimerState::Running {
            return;
        }
        self.accumulated_ms = self.elapsed_ms(now_ms);
        self.state = TimerState::Paused;
    }

    pub fn reset(&mut self) {
        self.accumulated_ms = 0;
        self.segment_start_ms = 0;
        self.state = TimerState::Idle;
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        match self.state {
            TimerState::Running => {
                self.accumulated_ms + now_ms.saturating_sub(self.segment_start_ms)
            }
            _ => self.accumulated_ms,
        }
    }

    /// Instant from which elapsed time is measured, `None` unless running.
    /// Negative when more time was accumulated than the clock has counted.
    pub fn anchor_ms(&self) -> Option<i64> {
        match self.state {
            TimerState::Running => Some(self.segment_start_ms as i64 - self.accumulated_ms as i64),
            _ => None,
        }
    }
}
