use std::fmt::Write as _;
use std::io::{self, Write};

use timer_core::{
    format_delta, format_duration, format_hms_cs, lap_deltas, lap_marks, DurationParts, LapMark, TimerState,
};

use crate::stopwatch::StopwatchState;

const CLEAR_HOME: &str = "\x1b[2J\x1b[H";
const NO_LAPS: &str = "No laps recorded yet";

pub const HELP_TEXT: &str = "STOPWATCH HELP\n\n\
     Enter  Start/Pause\n\
     Space  Start/Pause\n\
     l      Record lap (running)\n\
     r      Reset\n\
     k/j    Scroll laps\n\
     h      Help\n\
     q      Quit\n\n\
     Type a key and press Enter.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Controls {
    pub primary_label: &'static str,
    pub lap_enabled: bool,
    pub reset_enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LapRow {
    pub index: usize,
    pub split: String,
    pub mark: LapMark,
    pub delta: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub average: String,
}

/// Everything the screen shows, derived from the stopwatch at one instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayModel {
    pub time: DurationParts,
    pub time_text: String,
    pub status: TimerState,
    pub running: bool,
    pub controls: Controls,
    /// Most recent first.
    pub laps: Vec<LapRow>,
    pub older_hidden: usize,
    pub newer_hidden: usize,
    pub summary: Option<Summary>,
}

pub fn project(state: &StopwatchState, now_ms: u64, max_visible: usize) -> DisplayModel {
    let engine = &state.engine;
    let status = engine.state();
    let elapsed_ms = engine.tick(now_ms);
    let time = DurationParts::from_ms(elapsed_ms);

    let laps = engine.laps();
    let marks = lap_marks(laps);
    let deltas = lap_deltas(laps);
    let newer_hidden = state.lap_scroll_offset.min(laps.len());
    let rows: Vec<LapRow> = laps
        .iter()
        .zip(marks)
        .zip(deltas)
        .rev()
        .skip(newer_hidden)
        .take(max_visible)
        .map(|((lap, mark), delta)| LapRow {
            index: lap.index,
            split: format_duration(lap.split_ms),
            mark,
            delta: delta.map(format_delta),
        })
        .collect();
    let older_hidden = laps.len() - newer_hidden - rows.len();

    let summary = engine.stats().map(|stats| Summary {
        count: stats.count,
        average: format_duration(stats.average_ms),
    });

    DisplayModel {
        time,
        time_text: format_hms_cs(elapsed_ms),
        status,
        running: status == TimerState::Running,
        controls: Controls {
            primary_label: match status {
                TimerState::Idle => "Start",
                TimerState::Running => "Pause",
                TimerState::Paused => "Resume",
            },
            lap_enabled: status == TimerState::Running,
            reset_enabled: true,
        },
        laps: rows,
        older_hidden,
        newer_hidden,
        summary,
    }
}

fn status_label(status: TimerState) -> &'static str {
    match status {
        TimerState::Idle => "ready",
        TimerState::Running => "running",
        TimerState::Paused => "paused",
    }
}

pub fn render(model: &DisplayModel) -> String {
    let mut out = String::new();

    let icon = if model.running { "(*)" } else { "( )" };
    writeln!(out, "STOPWATCH  {} {}", icon, status_label(model.status)).ok();
    writeln!(out).ok();
    writeln!(out, "  {}", model.time_text).ok();
    writeln!(out).ok();

    if model.laps.is_empty() {
        writeln!(out, "{}", NO_LAPS).ok();
    } else {
        if model.newer_hidden > 0 {
            writeln!(out, "  ... {} newer", model.newer_hidden).ok();
        }
        for row in &model.laps {
            let mark = match row.mark {
                LapMark::Fastest => "fastest",
                LapMark::Slowest => "slowest",
                LapMark::Plain => "",
            };
            let delta = row.delta.as_deref().unwrap_or("");
            writeln!(out, "Lap {:2}  {:>11}  {:>12}  {}", row.index, row.split, delta, mark).ok();
        }
        if model.older_hidden > 0 {
            writeln!(out, "  ... {} older", model.older_hidden).ok();
        }
    }

    if let Some(summary) = &model.summary {
        writeln!(out).ok();
        writeln!(out, "Laps: {}   Average: {}", summary.count, summary.average).ok();
    }

    writeln!(out).ok();
    write!(out, "Enter={}", model.controls.primary_label).ok();
    if model.controls.lap_enabled {
        write!(out, "  l=lap").ok();
    }
    if model.controls.reset_enabled {
        write!(out, "  r=reset").ok();
    }
    writeln!(out, "  h=help  q=quit").ok();
    out
}

/// Applies rendered frames to a terminal.
pub struct Screen<W: Write> {
    out: W,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn draw_stopwatch(&mut self, model: &DisplayModel) -> io::Result<()> {
        self.draw(&render(model))
    }

    pub fn draw_help(&mut self) -> io::Result<()> {
        self.draw(HELP_TEXT)
    }

    fn draw(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}{}", CLEAR_HOME, text)?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }
}
