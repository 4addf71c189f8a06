//! Line-based text console for playing against the engine.
//!
//! Each input line is a command with optional arguments, optionally preceded
//! by a numeric id. Responses start with `=` on success and `?` on failure,
//! followed by the id if one was given:
//!
//! ```text
//! 3 move e2e4
//! =3 e4 e5
//! ```
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `new [white|black|humans|engines]` - Start a new game; the argument is the human side
//! - `difficulty <random|easy|hard>` - Change the engine profile and start a new game
//! - `move <move>` - Play a move (`e2e4`, `Nf3`, `O-O`, ...) and wait for the engine's reply
//! - `go` - Let the engine move for the side to move
//! - `undo`, `redo` - Step through the history (pauses the game)
//! - `pause`, `resume` - Enter or leave edit mode
//! - `board`, `moves`, `history`, `pgn`, `status`
//! - `import <movetext>` - Replay moves from the current position
//! - `resign` - Resign for the side to move

use std::io::{self, BufRead, Write};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use tracing::debug;

use crate::config::{Difficulty, PlayerKind, Settings};
use crate::error::ChessError;
use crate::game::{Game, GameEvent, MoveOutcome, Phase};
use crate::notation;
use crate::piece::Side;

/// The list of known console commands.
const KNOWN_COMMANDS: &[&str] = &[
    "board",
    "difficulty",
    "go",
    "history",
    "import",
    "known_command",
    "list_commands",
    "move",
    "moves",
    "name",
    "new",
    "pause",
    "pgn",
    "quit",
    "redo",
    "resign",
    "resume",
    "status",
    "undo",
    "version",
];

/// Longest wait for a single engine reply.
const ENGINE_TIMEOUT: Duration = Duration::from_secs(120);

pub struct Console {
    game: Game,
    events: Receiver<GameEvent>,
    settings: Settings,
}

impl Console {
    pub fn new(settings: Settings) -> Self {
        let (game, events) = Self::start_game(&settings);
        let mut console = Self {
            game,
            events,
            settings,
        };
        console.await_engine();
        console
    }

    fn start_game(settings: &Settings) -> (Game, Receiver<GameEvent>) {
        let (tx, rx) = unbounded();
        let mut game = Game::new(settings.clone(), tx);
        game.start();
        (game, rx)
    }

    fn restart(&mut self) {
        let (game, events) = Self::start_game(&self.settings);
        self.game = game;
        self.events = events;
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        writeln!(stdout, "{}", self.board_text())?;
        stdout.flush()?;

        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(stdout, "{prefix}{id_str} {message}\n")?;
            stdout.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute a command and return (success, response).
    pub fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match self.dispatch(command, args) {
            Ok(response) => (true, response),
            Err(message) => (false, message),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String, String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().ok_or_else(|| missing("known_command"))?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "new" => {
                if let Some(mode) = args.first() {
                    self.set_players(mode)?;
                }
                self.restart();
                let replies = self.await_engine();
                Ok(replies.join(" "))
            }

            "difficulty" => {
                let name = args.first().ok_or_else(|| missing("difficulty"))?;
                let difficulty: Difficulty = name.parse().map_err(|e: ChessError| e.to_string())?;
                self.settings.difficulty = difficulty;
                self.settings.piece_values = difficulty.piece_values();
                self.restart();
                let replies = self.await_engine();
                Ok(replies.join(" "))
            }

            "move" => {
                let token = args.first().ok_or_else(|| missing("move"))?;
                let (from, to) = self
                    .game
                    .with_board(|board| {
                        notation::match_token(token, board.current_moves()).map(|mv| (mv.from, mv.to))
                    })
                    .ok_or_else(|| format!("illegal move: {token}"))?;
                match self.game.apply_manual_move(from, to) {
                    MoveOutcome::Applied { notation } => {
                        let mut reply = vec![notation];
                        reply.extend(self.await_engine());
                        Ok(reply.join(" "))
                    }
                    MoveOutcome::Rejected(rejection) => Err(rejection.to_string()),
                }
            }

            "go" => {
                let side = self.game.side_to_move();
                if self.game.player(side) != PlayerKind::Engine {
                    return Err(format!("{side} is not played by the engine"));
                }
                if self.game.phase() != Phase::Active {
                    return Err("the game is not running".to_string());
                }
                self.game.request_engine_move();
                Ok(self.await_engine().join(" "))
            }

            "undo" => {
                if self.game.step_back() {
                    Ok(String::new())
                } else {
                    Err("nothing to undo".to_string())
                }
            }

            "redo" => {
                if self.game.step_forward() {
                    Ok(self.game.history().last().cloned().unwrap_or_default())
                } else {
                    Err("nothing to redo".to_string())
                }
            }

            "pause" => {
                self.game.pause();
                Ok(String::new())
            }

            "resume" => {
                self.game.resume();
                Ok(self.await_engine().join(" "))
            }

            "board" => Ok(format!("\n{}", self.board_text())),

            "moves" => Ok(self.game.with_board(|board| {
                board
                    .current_moves()
                    .iter()
                    .map(|mv| mv.san())
                    .collect::<Vec<_>>()
                    .join(" ")
            })),

            "history" => Ok(self.game.history().join(" ")),

            "pgn" => Ok(format!("\n{}", self.game.export_pgn())),

            "status" => {
                let phase = self.game.phase();
                let result = self.game.result();
                Ok(format!(
                    "{phase:?} move {} {} to move {result}",
                    self.game.move_number(),
                    self.game.side_to_move()
                ))
            }

            "import" => {
                if args.is_empty() {
                    return Err(missing("import"));
                }
                let report = self.game.import_movetext(&args.join(" "));
                match report.stopped_at {
                    None => Ok(format!("{} moves", report.applied)),
                    Some(token) => Err(format!(
                        "stopped at {token} after {} moves",
                        report.applied
                    )),
                }
            }

            "resign" => {
                if self.game.phase() == Phase::Ended {
                    return Err("the game has ended".to_string());
                }
                self.game.resign(self.game.side_to_move());
                Ok(self.game.result().to_string())
            }

            _ => Err(ChessError::UnknownCommand(command.to_string()).to_string()),
        }
    }

    fn set_players(&mut self, mode: &str) -> Result<(), String> {
        let (white, black) = match mode.to_lowercase().as_str() {
            "humans" => (PlayerKind::Human, PlayerKind::Human),
            "engines" => (PlayerKind::Engine, PlayerKind::Engine),
            side => match side.parse::<Side>().map_err(|e| e.to_string())? {
                Side::White => (PlayerKind::Human, PlayerKind::Engine),
                Side::Black => (PlayerKind::Engine, PlayerKind::Human),
            },
        };
        self.settings.white = white;
        self.settings.black = black;
        Ok(())
    }

    fn board_text(&self) -> String {
        self.game.with_board(|board| board.to_string())
    }

    /// Block until the engine has made one move, if it is the engine's turn.
    ///
    /// Returns the notation of the moves played meanwhile, plus the reason if
    /// the game ended.
    fn await_engine(&mut self) -> Vec<String> {
        let before = self.game.history().len();
        loop {
            let side = self.game.side_to_move();
            let waiting = self.game.phase() == Phase::Active
                && self.game.player(side) == PlayerKind::Engine
                && self.game.history().len() == before;
            if !waiting {
                break;
            }
            if self.events.recv_timeout(ENGINE_TIMEOUT).is_err() {
                debug!("timed out waiting for the engine");
                break;
            }
        }
        let mut replies: Vec<String> = self.game.history().into_iter().skip(before).collect();
        for event in self.events.try_iter() {
            if let GameEvent::Ended(terminal) = event {
                replies.push(format!("({terminal})"));
            }
        }
        replies
    }
}

fn missing(command: &'static str) -> String {
    ChessError::MissingArgument(command).to_string()
}
