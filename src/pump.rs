use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use num_traits::{FromPrimitive, ToPrimitive};

use crate::clock::Ticktimer;
use crate::{AppOp, ScalarMessage};

#[derive(Debug, num_derive::FromPrimitive, num_derive::ToPrimitive)]
enum PumpOp {
    Start = 0,
    Stop,
    Quit,
}

/// Handle to the repeating refresh task.
///
/// Each `start` opens a new generation; ticks are tagged with the generation
/// that produced them so the main loop can drop ticks queued before a stop.
pub struct Pump {
    conn: Sender<ScalarMessage>,
    thread: Option<JoinHandle<()>>,
    running: bool,
    generation: usize,
}

impl Pump {
    pub fn spawn(main_conn: Sender<ScalarMessage>) -> Self {
        let (conn, control) = mpsc::channel();
        let thread = thread::spawn(move || pump_thread(control, main_conn));
        Self {
            conn,
            thread: Some(thread),
            running: false,
            generation: 0,
        }
    }

    pub fn start(&mut self, interval_ms: u64) {
        if self.running {
            return;
        }
        self.running = true;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("pump start: {} ms, generation {}", interval_ms, self.generation);
        self.send(PumpOp::Start, interval_ms as usize, self.generation);
    }

    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::debug!("pump stop: generation {}", self.generation);
        self.send(PumpOp::Stop, 0, 0);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether a tick from `generation` belongs to the current run.
    pub fn accepts(&self, generation: usize) -> bool {
        self.running && generation == self.generation
    }

    pub fn shutdown(&mut self) {
        self.stop();
        self.send(PumpOp::Quit, 0, 0);
        if let Some(thread) = self.thread.take() {
            thread.join().ok();
        }
    }

    fn send(&self, op: PumpOp, arg1: usize, arg2: usize) {
        if let Some(id) = op.to_usize() {
            self.conn.send(ScalarMessage::new(id, arg1, arg2)).ok();
        }
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pump_thread(control: Receiver<ScalarMessage>, main_conn: Sender<ScalarMessage>) {
    let tt = Ticktimer::new();
    let pump_id = AppOp::Pump.to_usize().unwrap_or_default();
    let mut interval_ms = 10u64;
    let mut generation = 0usize;
    let mut running = false;

    loop {
        if running {
            tt.sleep_ms(interval_ms);
            if main_conn.send(ScalarMessage::new(pump_id, generation, 0)).is_err() {
                break;
            }
        }

        // Non-blocking while running, block-wait when stopped
        let msg = if running {
            match control.try_recv() {
                Ok(msg) => Some(msg),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            match control.recv() {
                Ok(msg) => Some(msg),
                Err(_) => break,
            }
        };

        if let Some(msg) = msg {
            match PumpOp::from_usize(msg.id) {
                Some(PumpOp::Start) => {
                    interval_ms = (msg.arg1 as u64).max(1);
                    generation = msg.arg2;
                    running = true;
                }
                Some(PumpOp::Stop) => running = false,
                Some(PumpOp::Quit) => break,
                None => log::error!("unknown pump opcode: {}", msg.id),
            }
        }
    }
}
