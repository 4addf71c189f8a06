//! Engine worker threads.
//!
//! Each engine-controlled side gets one long-lived thread that sleeps on a
//! command channel. A [`WorkerCommand::Resume`] asks it to take one turn: it
//! locks the session, checks that it is still allowed to move and, if so,
//! searches and commits a move. Wake-ups that arrive after the situation
//! changed are harmless no-ops.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::game::Session;
use crate::piece::Side;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerCommand {
    /// Take a turn if it is this side's move
    Resume,
    /// Ignore wake-ups until resumed
    Pause,
    /// Leave the loop and end the thread
    Stop,
}

/// Start the worker for `side`. Commands go through the returned sender.
pub(crate) fn spawn_worker(
    side: Side,
    session: Arc<Mutex<Session>>,
    delay: Duration,
) -> (Sender<WorkerCommand>, JoinHandle<()>) {
    let (tx, rx) = unbounded();
    let handle = thread::spawn(move || run(side, session, rx, delay));
    (tx, handle)
}

fn run(side: Side, session: Arc<Mutex<Session>>, commands: Receiver<WorkerCommand>, delay: Duration) {
    debug!(%side, "engine worker started");
    let mut paused = false;
    while let Ok(command) = commands.recv() {
        if !apply(command, &mut paused) {
            break;
        }
        if command != WorkerCommand::Resume {
            continue;
        }
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        // the newest command wins over a wake-up that is still being handled
        let mut stop = false;
        for queued in commands.try_iter() {
            if !apply(queued, &mut paused) {
                stop = true;
                break;
            }
        }
        if stop {
            break;
        }
        if paused {
            trace!(%side, "wake-up while paused");
            continue;
        }
        session.lock().engine_turn(side);
    }
    debug!(%side, "engine worker stopped");
}

/// Update the pause flag; `false` means the worker must stop.
fn apply(command: WorkerCommand, paused: &mut bool) -> bool {
    match command {
        WorkerCommand::Resume => *paused = false,
        WorkerCommand::Pause => *paused = true,
        WorkerCommand::Stop => return false,
    }
    true
}
