//! Single-owner game loop plumbing
//!
//! Ticks and key presses are queued as [`Command`]s on one channel and applied
//! to the [`Session`] strictly in arrival order by the thread that owns it.

use crate::game::{Game, GameState};
use crate::input::Input;
use crate::render::{self, Snapshot};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Work queued for the game loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fixed-interval timer tick
    Tick,
    Input(Input),
    /// The keyboard listener died; nothing can reach the game any more
    ListenerFailed(String),
}

/// Whether the loop should keep going after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
    /// Leave the loop and report the error once the terminal is restored
    Failed(String),
}

/// Owns the game and decides which inputs are legal in each state
pub struct Session {
    game: Game,
}

impl Session {
    pub fn new(game: Game) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_game(self) -> Game {
        self.game
    }

    /// Project the current state for display
    pub fn snapshot(&self) -> Snapshot {
        render::project(&self.game)
    }

    /// Apply one command using the wall clock
    pub fn apply(&mut self, command: Command) -> Flow {
        self.apply_at(command, Instant::now())
    }

    /// Apply one command as of `now`
    pub fn apply_at(&mut self, command: Command, now: Instant) -> Flow {
        match command {
            Command::Tick => {
                self.game.update_at(now);
                Flow::Continue
            }
            Command::Input(input) => self.handle_input(input, now),
            Command::ListenerFailed(reason) => {
                error!("input listener failed: {}", reason);
                Flow::Failed(reason)
            }
        }
    }

    fn handle_input(&mut self, input: Input, now: Instant) -> Flow {
        if input == Input::Interrupt {
            info!("interrupted");
            return Flow::Exit;
        }

        match (self.game.state, input) {
            (GameState::ConfirmingQuit, Input::Confirm(true)) => {
                info!("quit confirmed");
                Flow::Exit
            }
            (GameState::ConfirmingQuit, Input::Confirm(false)) => {
                self.game.cancel_quit();
                Flow::Continue
            }
            (GameState::ConfirmingQuit, _) => Flow::Continue,

            // A quit prompt cut short by a top-out still leaves on `y`
            (GameState::GameOver, Input::Quit | Input::Confirm(_)) => Flow::Exit,
            (GameState::GameOver, Input::Restart) => {
                self.game.restart(now);
                Flow::Continue
            }
            (GameState::GameOver, _) => Flow::Continue,

            (GameState::Playing, Input::Quit) => {
                self.game.request_quit();
                Flow::Continue
            }
            (GameState::Playing, Input::Action(action)) => {
                self.game.process_action(action);
                Flow::Continue
            }
            (GameState::Playing, _) => Flow::Continue,
        }
    }
}

/// Send a tick every `interval` until the receiving side goes away
pub fn spawn_ticker(tx: mpsc::Sender<Command>, interval: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            if tx.send(Command::Tick).is_err() {
                break;
            }
        }
        debug!("ticker stopped");
    })
}
