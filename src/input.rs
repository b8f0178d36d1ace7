use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use num_traits::ToPrimitive;
use timer_core::TimerState;

use crate::{AppOp, ScalarMessage};

const KEY_UP: char = '↑';
const KEY_DOWN: char = '↓';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    ToggleStartPause,
    RecordLap,
    Reset,
    ScrollUp,
    ScrollDown,
    Help,
    Quit,
}

/// Maps a key to an engine command. Lap recording is only offered while
/// the stopwatch is running.
pub fn command_for_key(key: char, state: TimerState) -> Option<Command> {
    match key {
        '\r' | '\n' | ' ' => Some(Command::ToggleStartPause),
        'l' | 'L' if state == TimerState::Running => Some(Command::RecordLap),
        'r' | 'R' => Some(Command::Reset),
        'k' | KEY_UP => Some(Command::ScrollUp),
        'j' | KEY_DOWN => Some(Command::ScrollDown),
        'h' | '?' => Some(Command::Help),
        'q' | 'Q' => Some(Command::Quit),
        _ => None,
    }
}

fn send_op(conn: &Sender<ScalarMessage>, op: AppOp, arg1: usize) -> bool {
    let id = op.to_usize().unwrap_or_default();
    conn.send(ScalarMessage::new(id, arg1, 0)).is_ok()
}

/// Forwards every key typed on `reader` to the main loop. An empty line is
/// Enter. End of input asks the loop to quit.
pub fn read_keys<R: BufRead>(reader: R, main_conn: Sender<ScalarMessage>) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("stdin read failed: {}", e);
                break;
            }
        };
        let keys: Vec<char> = if line.is_empty() {
            vec!['\n']
        } else {
            line.chars().collect()
        };
        for key in keys {
            if !send_op(&main_conn, AppOp::Rawkeys, key as usize) {
                return;
            }
        }
    }
    send_op(&main_conn, AppOp::Quit, 0);
}

pub fn spawn_reader(main_conn: Sender<ScalarMessage>) -> JoinHandle<()> {
    thread::spawn(move || read_keys(io::stdin().lock(), main_conn))
}
