mod clock;
mod config;
mod error;
mod input;
mod pump;
mod stopwatch;
mod ui;

use std::io::{self, Write};
use std::sync::mpsc;

use num_traits::FromPrimitive;

use crate::clock::Ticktimer;
use crate::config::Configuration;
use crate::error::Error;
use crate::input::{command_for_key, Command};
use crate::pump::Pump;
use crate::stopwatch::{PumpAction, StopwatchState};
use crate::ui::Screen;

#[derive(Clone, Copy, PartialEq, Eq, Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
enum AppOp {
    Redraw = 0,
    Rawkeys,
    Pump,
    Quit,
}

/// Opcode plus two word-sized arguments, the only message shape passed
/// between threads.
#[derive(Clone, Copy, Debug)]
pub struct ScalarMessage {
    pub id: usize,
    pub arg1: usize,
    pub arg2: usize,
}

impl ScalarMessage {
    pub fn new(id: usize, arg1: usize, arg2: usize) -> Self {
        Self { id, arg1, arg2 }
    }
}

struct StopwatchApp<W: Write> {
    tt: Ticktimer,
    config: Configuration,
    screen: Screen<W>,
    pump: Pump,
    stopwatch: StopwatchState,
    help_visible: bool,
}

impl<W: Write> StopwatchApp<W> {
    fn new(config: Configuration, screen: Screen<W>, pump: Pump) -> Self {
        Self {
            tt: Ticktimer::new(),
            config,
            screen,
            pump,
            stopwatch: StopwatchState::new(),
            help_visible: false,
        }
    }

    fn now_ms(&self) -> u64 {
        self.tt.elapsed_ms()
    }

    fn anchor_ms(&self) -> Option<i64> {
        self.stopwatch.engine.timer().anchor_ms()
    }

    fn redraw(&mut self) -> Result<(), Error> {
        if self.help_visible {
            self.screen.draw_help()?;
            return Ok(());
        }
        let model = ui::project(&self.stopwatch, self.now_ms(), self.config.visible_laps());
        self.screen.draw_stopwatch(&model)?;
        Ok(())
    }

    fn apply(&mut self, action: PumpAction) {
        match action {
            PumpAction::Start => self.pump.start(self.config.refresh_ms()),
            PumpAction::Stop => self.pump.stop(),
        }
    }

    fn handle_pump(&mut self, generation: usize) -> Result<(), Error> {
        // Ticks queued before the last stop must not repaint
        if !self.pump.accepts(generation) || !self.stopwatch.engine.is_running() {
            log::trace!("dropping stale tick from generation {}", generation);
            return Ok(());
        }
        if self.help_visible {
            return Ok(());
        }
        self.redraw()
    }

    /// Returns `false` once the user asked to quit.
    fn handle_key(&mut self, key: char) -> Result<bool, Error> {
        // If help screen is showing, any key dismisses it
        if self.help_visible {
            self.help_visible = false;
            self.redraw()?;
            return Ok(true);
        }

        let command = match command_for_key(key, self.stopwatch.state()) {
            Some(command) => command,
            None => return Ok(true),
        };
        log::debug!("key {:?} -> {:?}", key, command);

        let now = self.now_ms();
        match command {
            Command::ToggleStartPause => {
                let action = self.stopwatch.toggle(now);
                if action == PumpAction::Start {
                    log::debug!("running, anchor {:?}", self.anchor_ms());
                }
                self.apply(action);
            }
            Command::RecordLap => {
                if let Some(lap) = self.stopwatch.record_lap(now) {
                    log::info!("lap {}: split {} ms, total {} ms", lap.index, lap.split_ms, lap.cumulative_ms);
                }
            }
            Command::Reset => {
                let action = self.stopwatch.reset();
                self.apply(action);
            }
            Command::ScrollUp => self.stopwatch.scroll_up(),
            Command::ScrollDown => self.stopwatch.scroll_down(self.config.visible_laps()),
            Command::Help => self.help_visible = true,
            Command::Quit => return Ok(false),
        }
        self.redraw()?;
        Ok(true)
    }

    fn shutdown(&mut self) {
        let now = self.now_ms();
        self.stopwatch.engine.pause(now);
        self.pump.shutdown();
    }
}

fn main() -> Result<(), Error> {
    let config = Configuration::from_args()?;
    env_logger::Builder::new()
        .parse_filters(config.log_level())
        .init();
    log::info!("Stopwatch PID is {}", std::process::id());

    let (main_conn, inbox) = mpsc::channel();
    let pump = Pump::spawn(main_conn.clone());
    input::spawn_reader(main_conn.clone());
    main_conn
        .send(ScalarMessage::new(AppOp::Redraw as usize, 0, 0))
        .map_err(|_| Error::Disconnected)?;
    drop(main_conn);

    let mut app = StopwatchApp::new(config, Screen::new(io::stdout()), pump);

    loop {
        let msg = inbox.recv().map_err(|_| Error::Disconnected)?;
        match FromPrimitive::from_usize(msg.id) {
            Some(AppOp::Redraw) => app.redraw()?,
            Some(AppOp::Rawkeys) => {
                let key = char::from_u32(msg.arg1 as u32).unwrap_or('\u{0000}');
                if key != '\u{0000}' && !app.handle_key(key)? {
                    break;
                }
            }
            Some(AppOp::Pump) => app.handle_pump(msg.arg1)?,
            Some(AppOp::Quit) => break,
            None => log::error!("unknown opcode: {:?}", msg),
        }
    }

    app.shutdown();
    println!();
    log::info!("Stopwatch exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> (StopwatchApp<Vec<u8>>, mpsc::Receiver<ScalarMessage>) {
        let (tx, rx) = mpsc::channel();
        let pump = Pump::spawn(tx);
        let app = StopwatchApp::new(Configuration::default(), Screen::new(Vec::new()), pump);
        (app, rx)
    }

    fn screen_len(app: &StopwatchApp<Vec<u8>>) -> usize {
        app.screen.output().len()
    }

    #[test]
    fn test_start_pause_drive_pump() {
        let (mut app, _rx) = app();
        assert!(app.handle_key('\n').unwrap());
        assert!(app.pump.is_running());
        assert!(app.stopwatch.engine.is_running());

        app.handle_key(' ').unwrap();
        assert!(!app.pump.is_running());
        assert!(!app.stopwatch.engine.is_running());
        app.shutdown();
    }

    #[test]
    fn test_anchor_only_while_running() {
        let (mut app, _rx) = app();
        assert_eq!(app.anchor_ms(), None);
        app.handle_key('\n').unwrap();
        let anchor = app.anchor_ms().unwrap();
        assert!(anchor <= app.now_ms() as i64);
        app.handle_key('\n').unwrap();
        assert_eq!(app.anchor_ms(), None);
        app.shutdown();
    }

    #[test]
    fn test_stale_tick_after_pause_does_not_redraw() {
        let (mut app, _rx) = app();
        app.handle_key('\n').unwrap();
        app.handle_key('\n').unwrap();
        let drawn = screen_len(&app);

        app.handle_pump(1).unwrap();
        assert_eq!(screen_len(&app), drawn);
        app.shutdown();
    }

    #[test]
    fn test_tick_of_old_generation_ignored_after_restart() {
        let (mut app, _rx) = app();
        app.handle_key('\n').unwrap();
        app.handle_key('r').unwrap();
        app.handle_key('\n').unwrap();
        let drawn = screen_len(&app);

        app.handle_pump(1).unwrap();
        assert_eq!(screen_len(&app), drawn);

        app.handle_pump(2).unwrap();
        assert!(screen_len(&app) > drawn);
        app.shutdown();
    }

    #[test]
    fn test_reset_stops_pump_and_clears_laps() {
        let (mut app, _rx) = app();
        app.handle_key('\n').unwrap();
        app.handle_key('l').unwrap();
        assert_eq!(app.stopwatch.engine.laps().len(), 1);

        app.handle_key('r').unwrap();
        assert!(!app.pump.is_running());
        assert!(app.stopwatch.engine.laps().is_empty());
        assert_eq!(app.stopwatch.engine.tick(app.now_ms()), 0);
        app.shutdown();
    }

    #[test]
    fn test_help_swallows_next_key() {
        let (mut app, _rx) = app();
        app.handle_key('h').unwrap();
        assert!(app.help_visible);
        app.handle_key('\n').unwrap();
        assert!(!app.help_visible);
        assert!(!app.stopwatch.engine.is_running());
        app.shutdown();
    }

    #[test]
    fn test_quit() {
        let (mut app, _rx) = app();
        assert!(!app.handle_key('q').unwrap());
        app.shutdown();
    }
}
