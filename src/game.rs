//! Game orchestration: turns, players, engine workers and history navigation.
//!
//! A [`Game`] owns the shared [`Session`] (board, engine and game phase) behind
//! a single lock. Human moves arrive through [`Game::apply_manual_move`]; engine
//! sides are driven by worker threads (see [`crate::worker`]) that are woken
//! whenever their side gets the move. The presentation layer learns about
//! changes through a [`GameObserver`].

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::board::{Board, GameResult, Terminal};
use crate::config::{PlayerKind, Settings};
use crate::error::Rejection;
use crate::moves::Move;
use crate::notation;
use crate::piece::Side;
use crate::search::SearchEngine;
use crate::square::SquareId;
use crate::worker::{spawn_worker, WorkerCommand};

// =============================================================================
// Observer
// =============================================================================

/// Callbacks to the presentation layer. Called with the session lock held, so
/// implementations must not call back into the [`Game`].
pub trait GameObserver: Send {
    fn turn_changed(&mut self, _side: Side) {}
    fn check(&mut self, _side: Side) {}
    fn move_appended(&mut self, _notation: &str) {}
    fn game_ended(&mut self, _terminal: Terminal) {}
}

/// Observer that ignores everything.
impl GameObserver for () {}

/// Observer that writes every event to the log.
#[derive(Debug, Default)]
pub struct LogObserver;

impl GameObserver for LogObserver {
    fn turn_changed(&mut self, side: Side) {
        debug!(%side, "turn changed");
    }

    fn check(&mut self, side: Side) {
        info!(%side, "check");
    }

    fn move_appended(&mut self, notation: &str) {
        info!(notation, "move");
    }

    fn game_ended(&mut self, terminal: Terminal) {
        info!(reason = terminal.reason(), result = %terminal.result(), "game ended");
    }
}

/// Event forwarded by a channel observer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    TurnChanged(Side),
    Check(Side),
    MoveAppended(String),
    Ended(Terminal),
}

/// Forward events to another thread. Send errors mean nobody listens anymore.
impl GameObserver for Sender<GameEvent> {
    fn turn_changed(&mut self, side: Side) {
        let _ = self.send(GameEvent::TurnChanged(side));
    }

    fn check(&mut self, side: Side) {
        let _ = self.send(GameEvent::Check(side));
    }

    fn move_appended(&mut self, notation: &str) {
        let _ = self.send(GameEvent::MoveAppended(notation.to_string()));
    }

    fn game_ended(&mut self, terminal: Terminal) {
        let _ = self.send(GameEvent::Ended(terminal));
    }
}

// =============================================================================
// Session
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Active,
    /// Edit mode: engines idle, history may be stepped through
    Paused,
    Ended,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied { notation: String },
    Rejected(Rejection),
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }
}

/// Outcome of replaying movetext.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub applied: usize,
    /// First token that did not match a legal move
    pub stopped_at: Option<String>,
}

/// State shared between the game handle and the engine workers.
pub(crate) struct Session {
    board: Board,
    engine: SearchEngine,
    settings: Settings,
    phase: Phase,
    result: GameResult,
    observer: Box<dyn GameObserver>,
    workers: [Option<Sender<WorkerCommand>>; 2],
}

impl Session {
    fn new(settings: Settings, board: Board, observer: Box<dyn GameObserver>) -> Self {
        let engine = match settings.seed {
            Some(seed) => SearchEngine::with_seed(settings.difficulty, seed),
            None => SearchEngine::new(settings.difficulty),
        };
        Self {
            board,
            engine,
            settings,
            phase: Phase::Active,
            result: GameResult::Ongoing,
            observer,
            workers: [None, None],
        }
    }

    fn is_engine(&self, side: Side) -> bool {
        self.settings.player(side) == PlayerKind::Engine
    }

    /// One engine turn, run by the worker of `side`.
    pub(crate) fn engine_turn(&mut self, side: Side) {
        if self.phase != Phase::Active || self.board.side_to_move() != side || !self.is_engine(side) {
            debug!(%side, "stale engine wake-up ignored");
            return;
        }
        match self.engine.best_move(&mut self.board) {
            Some(mv) => self.commit(mv),
            None => warn!(%side, "engine woken without a legal move"),
        }
    }

    fn manual_move(&mut self, from: SquareId, to: SquareId) -> MoveOutcome {
        if self.phase == Phase::Ended {
            return MoveOutcome::Rejected(Rejection::GameOver);
        }
        let side = self.board.side_to_move();
        let Some(piece) = self.board.piece_at(from) else {
            return MoveOutcome::Rejected(Rejection::NoPiece);
        };
        if piece.side != side {
            return MoveOutcome::Rejected(Rejection::WrongSide(side));
        }
        if self.phase == Phase::Active && self.is_engine(side) {
            return MoveOutcome::Rejected(Rejection::EngineTurn(side));
        }
        let Some(mv) = self.board.find_move(from, to).cloned() else {
            return MoveOutcome::Rejected(Rejection::IllegalMove);
        };
        self.commit(mv);
        let notation = self.board.last_move().map(Move::san).unwrap_or_default();
        MoveOutcome::Applied { notation }
    }

    /// Play a fresh move: any undone moves are discarded.
    fn commit(&mut self, mv: Move) {
        self.board.clear_future();
        self.board.apply_move(mv);
        self.switch_turn();
    }

    /// Hand the move to the other side after a move was applied.
    fn switch_turn(&mut self) {
        let side = self.board.side_to_move();
        self.observer.turn_changed(side);
        let terminal = self.board.evaluate_terminal();
        if let Some(last) = self.board.last_move() {
            self.observer.move_appended(&last.san());
        }
        if self.board.is_check() {
            self.observer.check(side);
        }
        match terminal {
            Some(terminal) => self.end(terminal),
            None => self.wake(side),
        }
    }

    fn wake(&self, side: Side) {
        if self.phase != Phase::Active || !self.is_engine(side) {
            return;
        }
        if let Some(worker) = &self.workers[side.index()] {
            let _ = worker.send(WorkerCommand::Resume);
        }
    }

    fn end(&mut self, terminal: Terminal) {
        self.phase = Phase::Ended;
        self.result = terminal.result();
        self.board.set_edit_mode(false);
        self.board.stamp_result(self.result);
        self.stop_workers();
        info!(%terminal, "game ended");
        self.observer.game_ended(terminal);
    }

    fn stop_workers(&mut self) {
        for worker in self.workers.iter_mut() {
            if let Some(tx) = worker.take() {
                let _ = tx.send(WorkerCommand::Stop);
            }
        }
    }

    fn pause(&mut self) {
        if self.phase == Phase::Paused {
            return;
        }
        if self.phase == Phase::Ended {
            self.result = GameResult::Ongoing;
        }
        self.phase = Phase::Paused;
        self.board.set_edit_mode(true);
        for worker in self.workers.iter().flatten() {
            let _ = worker.send(WorkerCommand::Pause);
        }
        debug!("game paused");
    }

    fn step_back(&mut self) -> bool {
        self.pause();
        if self.board.undo_last_move().is_none() {
            return false;
        }
        self.board.evaluate_terminal();
        self.observer.turn_changed(self.board.side_to_move());
        true
    }

    fn step_forward(&mut self) -> bool {
        self.pause();
        if self.board.redo_move().is_none() {
            return false;
        }
        self.switch_turn();
        true
    }

    fn import(&mut self, tokens: &[String]) -> ImportReport {
        let mut report = ImportReport::default();
        if self.phase == Phase::Ended {
            info!("import refused, the game has ended");
            report.stopped_at = tokens.first().cloned();
            return report;
        }
        let previous = self.phase;
        // replay without waking engines
        self.phase = Phase::Paused;
        for token in tokens {
            let found = notation::match_token(token, self.board.current_moves()).cloned();
            match found {
                Some(mv) if self.phase != Phase::Ended => {
                    self.commit(mv);
                    report.applied += 1;
                }
                _ => {
                    info!(token = token.as_str(), "import stopped at unmatched token");
                    report.stopped_at = Some(token.clone());
                    break;
                }
            }
        }
        if self.phase != Phase::Ended {
            self.phase = previous;
            self.wake(self.board.side_to_move());
        }
        report
    }

    fn pgn_tags(&self) -> Vec<(&'static str, String)> {
        let tags = &self.settings.tags;
        vec![
            ("Event", tags.event.clone()),
            ("Site", tags.site.clone()),
            ("Date", tags.date.clone()),
            ("Round", tags.round.to_string()),
            ("White", self.settings.player_name(Side::White)),
            ("Black", self.settings.player_name(Side::Black)),
            ("Result", self.result.tag().to_string()),
            ("Difficulty", self.settings.difficulty.name.to_string()),
        ]
    }
}

// =============================================================================
// Game
// =============================================================================

/// Handle to a running game. Dropping it stops and joins the engine workers.
pub struct Game {
    session: Arc<Mutex<Session>>,
    threads: Vec<JoinHandle<()>>,
}

impl Game {
    /// New game from the standard position. Engines wait for [`Game::start`].
    pub fn new(settings: Settings, observer: impl GameObserver + 'static) -> Self {
        let board = Board::new(settings.piece_values);
        Self::from_board(settings, board, observer)
    }

    /// New game continuing from a prepared board.
    pub fn from_board(settings: Settings, board: Board, observer: impl GameObserver + 'static) -> Self {
        let session = Session::new(settings, board, Box::new(observer));
        Self {
            session: Arc::new(Mutex::new(session)),
            threads: Vec::new(),
        }
    }

    /// Spawn the engine workers and let the side to move play.
    pub fn start(&mut self) {
        self.ensure_workers();
        let session = self.session.lock();
        info!(
            white = ?session.settings.white,
            black = ?session.settings.black,
            difficulty = %session.settings.difficulty,
            "game started"
        );
        session.wake(session.board.side_to_move());
    }

    fn ensure_workers(&mut self) {
        let mut session = self.session.lock();
        if session.phase == Phase::Ended {
            return;
        }
        let delay = session.settings.move_delay;
        for side in [Side::White, Side::Black] {
            if session.is_engine(side) && session.workers[side.index()].is_none() {
                let (tx, handle) = spawn_worker(side, Arc::clone(&self.session), delay);
                session.workers[side.index()] = Some(tx);
                self.threads.push(handle);
            }
        }
    }

    pub fn apply_manual_move(&self, from: SquareId, to: SquareId) -> MoveOutcome {
        self.session.lock().manual_move(from, to)
    }

    /// Wake the engine if it has the move.
    pub fn request_engine_move(&self) {
        let session = self.session.lock();
        session.wake(session.board.side_to_move());
    }

    /// Enter edit mode: engines idle and history can be stepped through.
    pub fn pause(&self) {
        self.session.lock().pause();
    }

    /// Leave edit mode. Undone moves are discarded and play continues from
    /// the displayed position.
    pub fn resume(&mut self) {
        {
            let mut session = self.session.lock();
            if session.phase != Phase::Paused {
                return;
            }
            session.board.set_edit_mode(false);
            session.board.clear_future();
            session.phase = Phase::Active;
            if let Some(terminal) = session.board.evaluate_terminal() {
                session.end(terminal);
                return;
            }
            debug!("game resumed");
        }
        self.ensure_workers();
        let session = self.session.lock();
        for worker in session.workers.iter().flatten() {
            let _ = worker.send(WorkerCommand::Resume);
        }
    }

    /// Take back one move (pausing the game). Returns whether a move was undone.
    pub fn step_back(&self) -> bool {
        self.session.lock().step_back()
    }

    /// Replay one undone move (pausing the game). Returns whether a move was redone.
    pub fn step_forward(&self) -> bool {
        self.session.lock().step_forward()
    }

    /// End the game as `side` resigning.
    pub fn resign(&self, side: Side) {
        let mut session = self.session.lock();
        if session.phase != Phase::Ended {
            session.end(Terminal::Resignation {
                winner: side.opponent(),
            });
        }
    }

    /// Replay move tokens from the current position.
    pub fn import_tokens(&self, tokens: &[String]) -> ImportReport {
        self.session.lock().import(tokens)
    }

    /// Tokenize movetext and replay it.
    pub fn import_movetext(&self, text: &str) -> ImportReport {
        self.import_tokens(&notation::tokenize_movetext(text))
    }

    pub fn export_pgn(&self) -> String {
        let session = self.session.lock();
        notation::export_pgn(&session.pgn_tags(), session.board.history(), session.result)
    }

    /// Notation of every committed move.
    pub fn history(&self) -> Vec<String> {
        self.session.lock().board.history().iter().map(Move::san).collect()
    }

    /// Run `f` with the board locked.
    pub fn with_board<R>(&self, f: impl FnOnce(&Board) -> R) -> R {
        f(&self.session.lock().board)
    }

    pub fn phase(&self) -> Phase {
        self.session.lock().phase
    }

    pub fn result(&self) -> GameResult {
        self.session.lock().result
    }

    pub fn side_to_move(&self) -> Side {
        self.session.lock().board.side_to_move()
    }

    /// Full-move number of the move about to be played.
    pub fn move_number(&self) -> usize {
        self.session.lock().board.history().len() / 2 + 1
    }

    pub fn player(&self, side: Side) -> PlayerKind {
        self.session.lock().settings.player(side)
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        {
            let mut session = self.session.lock();
            session.phase = Phase::Ended;
            session.stop_workers();
        }
        for handle in self.threads.drain(..) {
            if handle.join().is_err() {
                warn!("engine worker panicked");
            }
        }
    }
}
