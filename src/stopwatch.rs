use timer_core::{Lap, Stopwatch, TimerState};

/// What the caller has to do with the refresh pump after a gesture.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PumpAction {
    Start,
    Stop,
}

pub struct StopwatchState {
    pub engine: Stopwatch,
    /// Number of newest laps scrolled past.
    pub lap_scroll_offset: usize,
}

impl StopwatchState {
    pub fn new() -> Self {
        Self {
            engine: Stopwatch::new(),
            lap_scroll_offset: 0,
        }
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn toggle(&mut self, now_ms: u64) -> PumpAction {
        match self.engine.state() {
            TimerState::Idle | TimerState::Paused => {
                self.engine.start(now_ms);
                PumpAction::Start
            }
            TimerState::Running => {
                self.engine.pause(now_ms);
                PumpAction::Stop
            }
        }
    }

    pub fn record_lap(&mut self, now_ms: u64) -> Option<Lap> {
        let lap = self.engine.record_lap(now_ms)?;
        self.lap_scroll_offset = 0;
        Some(lap)
    }

    pub fn reset(&mut self) -> PumpAction {
        self.engine.reset();
        self.lap_scroll_offset = 0;
        PumpAction::Stop
    }

    pub fn scroll_up(&mut self) {
        self.lap_scroll_offset = self.lap_scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, max_visible: usize) {
        let max_offset = self.engine.laps().len().saturating_sub(max_visible);
        if self.lap_scroll_offset < max_offset {
            self.lap_scroll_offset += 1;
        }
    }
}
