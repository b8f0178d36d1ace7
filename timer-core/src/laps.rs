use crate::stats::LapStats;
use crate::{TimerCore, TimerState};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Lap {
    /// 1-based position in the session.
    pub index: usize,
    /// Time since the previous lap, or since the session started.
    pub split_ms: u64,
    /// Total elapsed time when the lap was recorded.
    pub cumulative_ms: u64,
}

/// The timer engine: running/paused accounting plus the lap ledger of the
/// current session.
#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
    timer: TimerCore,
    laps: Vec<Lap>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        self.timer.state()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn start(&mut self, now_ms: u64) {
        self.timer.start(now_ms);
    }

    pub fn pause(&mut self, now_ms: u64) {
        self.timer.pause(now_ms);
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.laps.clear();
    }

    /// Elapsed time as of `now_ms`. Never mutates the engine.
    pub fn tick(&self, now_ms: u64) -> u64 {
        self.timer.elapsed_ms(now_ms)
    }

    pub fn timer(&self) -> &TimerCore {
        &self.timer
    }

    /// Appends a lap while running. Returns `None` and leaves the ledger
    /// untouched in any other state.
    pub fn record_lap(&mut self, now_ms: u64) -> Option<Lap> {
        if !self.timer.is_running() {
            return None;
        }
        let last_cumulative = self.laps.last().map_or(0, |lap| lap.cumulative_ms);
        // A clock sample behind the previous lap yields a zero split
        let elapsed = self.timer.elapsed_ms(now_ms).max(last_cumulative);
        let lap = Lap {
            index: self.laps.len() + 1,
            split_ms: elapsed - last_cumulative,
            cumulative_ms: elapsed,
        };
        self.laps.push(lap);
        Some(lap)
    }

    pub fn laps(&self) -> &[Lap] {
        &self.laps
    }

    pub fn stats(&self) -> Option<LapStats> {
        LapStats::from_laps(&self.laps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lap_scenario() {
        let mut sw = Stopwatch::new();
        sw.start(0);

        let lap1 = sw.record_lap(1500).unwrap();
        assert_eq!(lap1, Lap { index: 1, split_ms: 1500, cumulative_ms: 1500 });

        let lap2 = sw.record_lap(2200).unwrap();
        assert_eq!(lap2, Lap { index: 2, split_ms: 700, cumulative_ms: 2200 });

        let stats = sw.stats().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.average_ms, 1100);
        assert_eq!(stats.fastest_ms, Some(700));
        assert_eq!(stats.slowest_ms, Some(1500));
    }

    #[test]
    fn test_lap_ignored_unless_running() {
        let mut sw = Stopwatch::new();
        assert_eq!(sw.record_lap(100), None);
        assert!(sw.laps().is_empty());

        sw.start(0);
        sw.record_lap(300);
        sw.pause(500);
        assert_eq!(sw.record_lap(800), None);
        assert_eq!(sw.laps().len(), 1);
    }

    #[test]
    fn test_laps_span_pauses() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.record_lap(1000);
        sw.pause(1500);
        sw.start(10_000);
        let lap = sw.record_lap(10_200).unwrap();
        assert_eq!(lap.split_ms, 700);
        assert_eq!(lap.cumulative_ms, 1700);
    }

    #[test]
    fn test_lap_with_clock_behind_previous_lap() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.record_lap(1000);
        let lap = sw.record_lap(400).unwrap();
        assert_eq!(lap, Lap { index: 2, split_ms: 0, cumulative_ms: 1000 });

        let total: u64 = sw.laps().iter().map(|lap| lap.split_ms).sum();
        assert_eq!(total, sw.laps().last().unwrap().cumulative_ms);

        let lap = sw.record_lap(1300).unwrap();
        assert_eq!(lap.split_ms, 300);
    }

    #[test]
    fn test_tick_does_not_mutate() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        assert_eq!(sw.tick(500), 500);
        assert_eq!(sw.tick(200), 200);
        assert_eq!(sw.state(), TimerState::Running);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.record_lap(400);
        sw.pause(600);
        sw.reset();
        assert_eq!(sw.state(), TimerState::Idle);
        assert_eq!(sw.tick(9000), 0);
        assert!(sw.laps().is_empty());
        assert!(sw.stats().is_none());

        // Usable again after reset
        sw.start(9000);
        let lap = sw.record_lap(9250).unwrap();
        assert_eq!(lap.index, 1);
        assert_eq!(lap.split_ms, 250);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Start,
        Pause,
        Lap,
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Start),
            Just(Op::Pause),
            Just(Op::Lap),
            Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn prop_elapsed_is_sum_of_running_intervals(
            steps in prop::collection::vec((op(), 0u64..5_000), 0..64)
        ) {
            let mut sw = Stopwatch::new();
            let mut now = 0u64;
            let mut expected = 0u64;
            let mut running_since: Option<u64> = None;

            for (op, gap) in steps {
                now += gap;
                match op {
                    Op::Start => {
                        if running_since.is_none() {
                            running_since = Some(now);
                        }
                        sw.start(now);
                    }
                    Op::Pause => {
                        if let Some(since) = running_since.take() {
                            expected += now - since;
                        }
                        sw.pause(now);
                        prop_assert_eq!(sw.tick(now + 12_345), expected);
                    }
                    Op::Lap => {
                        let before = sw.laps().len();
                        let lap = sw.record_lap(now);
                        prop_assert_eq!(lap.is_some(), running_since.is_some());
                        if running_since.is_none() {
                            prop_assert_eq!(sw.laps().len(), before);
                        }
                    }
                    Op::Reset => {
                        expected = 0;
                        running_since = None;
                        sw.reset();
                        prop_assert_eq!(sw.tick(now), 0);
                        prop_assert!(sw.laps().is_empty());
                    }
                }
                let live = expected + running_since.map_or(0, |since| now - since);
                prop_assert_eq!(sw.tick(now), live);
            }
        }

        #[test]
        fn prop_splits_sum_to_last_cumulative(
            steps in prop::collection::vec((0u64..10_000, 0u64..3_000), 1..50)
        ) {
            let mut sw = Stopwatch::new();
            let mut now = 0u64;
            sw.start(now);
            for (i, (gap, lag)) in steps.iter().enumerate() {
                now += gap;
                // Interleave a pause so splits cross pause boundaries
                if i % 3 == 2 {
                    sw.pause(now);
                    now += 777;
                    sw.start(now);
                }
                // Some samples run behind the clock
                let sample = if i % 2 == 1 { now.saturating_sub(*lag) } else { now };
                sw.record_lap(sample);
            }
            let laps = sw.laps();
            let total: u64 = laps.iter().map(|lap| lap.split_ms).sum();
            prop_assert_eq!(total, laps.last().unwrap().cumulative_ms);
            prop_assert!(laps.windows(2).all(|w| w[0].cumulative_ms <= w[1].cumulative_ms));
            for (i, lap) in laps.iter().enumerate() {
                prop_assert_eq!(lap.index, i + 1);
            }
        }
    }
}
