//! Keyboard input: key bindings and the background listener
//!
//! The listener thread only classifies key presses and forwards them; it never
//! touches game state.

use crate::game::Action;
use crate::session::Command;
use crate::settings::Settings;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error};

/// How often the listener wakes up to check for shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// A classified key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Action(Action),
    /// Quit key: prompt while playing, leave after game over
    Quit,
    /// Answer to a yes/no prompt
    Confirm(bool),
    Restart,
    /// Ctrl-C: leave immediately
    Interrupt,
}

/// Key bindings configuration - supports multiple keys per input
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub move_left: Vec<KeyCode>,
    pub move_right: Vec<KeyCode>,
    pub soft_drop: Vec<KeyCode>,
    pub hard_drop: Vec<KeyCode>,
    pub rotate: Vec<KeyCode>,
    pub toggle_ghost: Vec<KeyCode>,
    pub quit: Vec<KeyCode>,
    pub restart: Vec<KeyCode>,
    pub confirm_yes: Vec<KeyCode>,
    pub confirm_no: Vec<KeyCode>,
}

impl KeyBindings {
    /// Parse a key string into KeyCode
    fn parse_key(s: &str) -> Option<KeyCode> {
        match s.to_lowercase().as_str() {
            "left" => Some(KeyCode::Left),
            "right" => Some(KeyCode::Right),
            "up" => Some(KeyCode::Up),
            "down" => Some(KeyCode::Down),
            "space" => Some(KeyCode::Char(' ')),
            "enter" => Some(KeyCode::Enter),
            "tab" => Some(KeyCode::Tab),
            "esc" | "escape" => Some(KeyCode::Esc),
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(KeyCode::Char(c)),
                    _ => None,
                }
            }
        }
    }

    /// Parse a list of key strings into KeyCodes, skipping unknown names
    fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
        keys.iter()
            .filter_map(|s| {
                let code = Self::parse_key(s);
                if code.is_none() {
                    debug!("ignoring unknown key binding {:?}", s);
                }
                code
            })
            .collect()
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        Self {
            move_left: Self::parse_keys(&keys.move_left),
            move_right: Self::parse_keys(&keys.move_right),
            soft_drop: Self::parse_keys(&keys.soft_drop),
            hard_drop: Self::parse_keys(&keys.hard_drop),
            rotate: Self::parse_keys(&keys.rotate),
            toggle_ghost: Self::parse_keys(&keys.toggle_ghost),
            quit: Self::parse_keys(&keys.quit),
            restart: Self::parse_keys(&keys.restart),
            confirm_yes: Self::parse_keys(&keys.confirm_yes),
            confirm_no: Self::parse_keys(&keys.confirm_no),
        }
    }

    /// Classify a key press
    pub fn classify(&self, key: KeyEvent) -> Option<Input> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Input::Interrupt);
        }

        let code = normalize_key(key.code);
        let table = [
            (&self.move_left, Input::Action(Action::MoveLeft)),
            (&self.move_right, Input::Action(Action::MoveRight)),
            (&self.soft_drop, Input::Action(Action::SoftDrop)),
            (&self.hard_drop, Input::Action(Action::HardDrop)),
            (&self.rotate, Input::Action(Action::Rotate)),
            (&self.toggle_ghost, Input::Action(Action::ToggleGhost)),
            (&self.quit, Input::Quit),
            (&self.restart, Input::Restart),
            (&self.confirm_yes, Input::Confirm(true)),
            (&self.confirm_no, Input::Confirm(false)),
        ];
        table
            .into_iter()
            .find(|(codes, _)| codes.contains(&code))
            .map(|(_, input)| input)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Handle to the background key listener
pub struct InputListener {
    stop: Arc<AtomicBool>,
    done_rx: mpsc::Receiver<()>,
}

impl InputListener {
    /// Start listening for key presses, forwarding them as commands
    pub fn spawn(bindings: KeyBindings, tx: mpsc::Sender<Command>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = mpsc::channel();
        let thread_stop = Arc::clone(&stop);

        thread::spawn(move || {
            if let Err(e) = listen(&bindings, &tx, &thread_stop) {
                error!("Failed to read keyboard input: {}", e);
                let _ = tx.send(Command::ListenerFailed(e.to_string()));
            }
            debug!("input listener stopped");
            let _ = done_tx.send(());
        });

        Self { stop, done_rx }
    }

    /// Ask the listener to stop and wait up to `timeout` for it.
    /// Returns false if it did not finish in time.
    pub fn shutdown(self, timeout: Duration) -> bool {
        self.stop.store(true, Ordering::Relaxed);
        self.done_rx.recv_timeout(timeout).is_ok()
    }
}

fn listen(
    bindings: &KeyBindings,
    tx: &mpsc::Sender<Command>,
    stop: &AtomicBool,
) -> io::Result<()> {
    while !stop.load(Ordering::Relaxed) {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if let Some(input) = bindings.classify(key) {
            if tx.send(Command::Input(input)).is_err() {
                // Game loop is gone
                break;
            }
        }
    }
    Ok(())
}
