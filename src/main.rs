//! TERMTRIS binary: terminal setup, logging, and the game loop

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    io::{self, stdout},
    sync::mpsc,
    time::Duration,
};
use termtris::game::Game;
use termtris::input::{Input, InputListener, KeyBindings};
use termtris::session::{Flow, Session, spawn_ticker};
use termtris::settings::Settings;
use termtris::ui;
use tracing_subscriber::EnvFilter;

/// How long to wait for the input listener to stop on exit
const LISTENER_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

/// Get the termtris temp directory, creating it if needed
fn termtris_temp_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("termtris");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to log file; the terminal belongs to the game
    let log_dir = termtris_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("termtris=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "TERMTRIS starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load();

    // Setup terminal
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(Some(game)) => {
            println!("\nThanks for playing TERMTRIS!");
            println!("Final Score: {}", game.score.points);
            println!("Level: {} | Lines: {}", game.score.level, game.score.lines);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("game loop failed: {}", e);
            eprintln!("Error: {}", e);
        }
    }

    tracing::info!("TERMTRIS shutting down");
    Ok(())
}

/// Show the welcome screen, then play until the player leaves.
/// Returns the final game, or None if the player quit from the welcome screen.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &Settings,
) -> io::Result<Option<Game>> {
    let bindings = KeyBindings::from_settings(settings);

    terminal.draw(ui::render_welcome)?;
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if bindings.classify(key) == Some(Input::Interrupt) {
                return Ok(None);
            }
            break;
        }
    }

    let mut game = match settings.gameplay.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    };
    game.ghost_enabled = settings.visual.show_ghost;
    let mut session = Session::new(game);
    tracing::info!("game started");

    let (tx, rx) = mpsc::channel();
    let listener = InputListener::spawn(bindings, tx.clone());
    let tick = Duration::from_millis(settings.gameplay.tick_ms.max(1));
    let _ticker = spawn_ticker(tx, tick);

    let mut outcome = Ok(());
    loop {
        let snapshot = session.snapshot();
        if let Err(e) = terminal.draw(|frame| ui::render_game(frame, &snapshot, settings)) {
            outcome = Err(e);
            break;
        }

        // Ticker holds a sender for as long as we hold the receiver
        let Ok(command) = rx.recv() else {
            break;
        };
        match session.apply(command) {
            Flow::Continue => {}
            Flow::Exit => break,
            Flow::Failed(reason) => {
                outcome = Err(io::Error::other(format!(
                    "keyboard listener stopped: {}",
                    reason
                )));
                break;
            }
        }
    }

    drop(rx);
    if !listener.shutdown(LISTENER_SHUTDOWN_TIMEOUT) {
        tracing::warn!("input listener did not stop in time");
    }

    let game = session.into_game();
    outcome.map(|_| Some(game))
}
