use crate::Lap;

/// Summary over a non-empty lap sequence.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapStats {
    pub count: usize,
    /// Mean split, rounded down to the millisecond.
    pub average_ms: u64,
    /// `None` with a single lap: there is nothing to compare against.
    pub fastest_ms: Option<u64>,
    pub slowest_ms: Option<u64>,
}

impl LapStats {
    pub fn from_laps(laps: &[Lap]) -> Option<Self> {
        if laps.is_empty() {
            return None;
        }
        let count = laps.len();
        let total: u64 = laps.iter().map(|lap| lap.split_ms).sum();
        let (fastest_ms, slowest_ms) = if count > 1 {
            (
                laps.iter().map(|lap| lap.split_ms).min(),
                laps.iter().map(|lap| lap.split_ms).max(),
            )
        } else {
            (None, None)
        };
        Some(Self {
            count,
            average_ms: total / count as u64,
            fastest_ms,
            slowest_ms,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LapMark {
    Plain,
    Fastest,
    Slowest,
}

/// Highlight for each lap, in lap order. Fastest wins over slowest when a
/// split matches both (all splits equal).
pub fn lap_marks(laps: &[Lap]) -> Vec<LapMark> {
    let stats = LapStats::from_laps(laps);
    let (fastest, slowest) = match stats {
        Some(LapStats { fastest_ms: Some(f), slowest_ms: Some(s), .. }) => (f, s),
        _ => return vec![LapMark::Plain; laps.len()],
    };
    laps.iter()
        .map(|lap| {
            if lap.split_ms == fastest {
                LapMark::Fastest
            } else if lap.split_ms == slowest {
                LapMark::Slowest
            } else {
                LapMark::Plain
            }
        })
        .collect()
}

/// Split change against the previous lap, in lap order. Positive means
/// slower than the previous lap; the first lap has no delta.
pub fn lap_deltas(laps: &[Lap]) -> Vec<Option<i64>> {
    let mut deltas = Vec::with_capacity(laps.len());
    let mut previous: Option<u64> = None;
    for lap in laps {
        deltas.push(previous.map(|prev| lap.split_ms as i64 - prev as i64));
        previous = Some(lap.split_ms);
    }
    deltas
}
