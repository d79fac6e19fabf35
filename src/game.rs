//! Core game state and logic

use crate::board::Board;
use crate::piece::Piece;
use crate::randomizer::{PieceSource, RandomSource};
use crate::score::Score;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    /// Quit prompt is open; gameplay input is suspended but gravity keeps running
    ConfirmingQuit,
    /// Terminal for this game; only a restart leaves it
    GameOver,
}

/// Gameplay actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    ToggleGhost,
}

/// The main game struct
pub struct Game {
    /// The game board
    pub board: Board,
    /// Falling piece
    pub current: Piece,
    /// Pre-rolled piece shown as preview
    pub next: Piece,
    /// Score tracking
    pub score: Score,
    /// Current game state
    pub state: GameState,
    /// Whether the landing projection is drawn
    pub ghost_enabled: bool,
    /// When gravity next acts on the falling piece
    drop_deadline: Instant,
    /// Current gravity interval
    drop_interval: Duration,
    source: Box<dyn PieceSource>,
}

impl Game {
    /// Create a new game with a random seed
    pub fn new() -> Self {
        Self::with_source(Box::new(RandomSource::new()), Instant::now())
    }

    /// Create a new game whose pieces are reproducible from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_source(Box::new(RandomSource::with_seed(seed)), Instant::now())
    }

    /// Create a new game drawing pieces from `source`, started at `now`
    pub fn with_source(mut source: Box<dyn PieceSource>, now: Instant) -> Self {
        let current = Piece::new(source.pick_piece_kind());
        let next = Piece::new(source.pick_piece_kind());
        let score = Score::new();
        let drop_interval = score.drop_interval();

        Self {
            board: Board::new(),
            current,
            next,
            score,
            state: GameState::Playing,
            ghost_enabled: true,
            drop_deadline: now + drop_interval,
            drop_interval,
            source,
        }
    }

    pub fn drop_deadline(&self) -> Instant {
        self.drop_deadline
    }

    pub fn drop_interval(&self) -> Duration {
        self.drop_interval
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    /// Process an action. Ignored unless the game is being played.
    pub fn process_action(&mut self, action: Action) {
        if self.state != GameState::Playing {
            return;
        }
        match action {
            Action::MoveLeft => {
                self.move_by(-1, 0);
            }
            Action::MoveRight => {
                self.move_by(1, 0);
            }
            Action::SoftDrop => {
                self.move_by(0, 1);
            }
            Action::HardDrop => {
                self.hard_drop();
            }
            Action::Rotate => {
                self.rotate();
            }
            Action::ToggleGhost => self.toggle_ghost(),
        }
    }

    /// Advance gravity as of `now`. Call once per tick.
    /// Runs under the quit prompt too; only game over stops it.
    pub fn update_at(&mut self, now: Instant) {
        if self.state == GameState::GameOver || now < self.drop_deadline {
            return;
        }

        if self.board.collides(&self.current, 0, 1) {
            self.lock_piece();
        } else {
            self.current.y += 1;
        }
        self.drop_deadline = now + self.drop_interval;
    }

    /// Translate the falling piece if the target is free.
    /// Returns whether it moved.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        if self.state != GameState::Playing || self.board.collides(&self.current, dx, dy) {
            return false;
        }
        self.current.x += dx;
        self.current.y += dy;
        true
    }

    /// Rotate clockwise in place, keeping the old shape on collision.
    /// Returns whether it rotated.
    pub fn rotate(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let rotated = self.current.rotated();
        if self.board.collides(&rotated, 0, 0) {
            return false;
        }
        self.current = rotated;
        true
    }

    /// Drop the piece onto whatever is below it; it locks on the next gravity
    /// step. Returns the distance dropped.
    pub fn hard_drop(&mut self) -> u32 {
        let mut distance = 0;
        while self.move_by(0, 1) {
            distance += 1;
        }
        distance
    }

    pub fn toggle_ghost(&mut self) {
        self.ghost_enabled = !self.ghost_enabled;
    }

    /// Open the quit prompt. Returns false if the game was not in play.
    pub fn request_quit(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.state = GameState::ConfirmingQuit;
        true
    }

    /// Close the quit prompt
    pub fn cancel_quit(&mut self) {
        if self.state == GameState::ConfirmingQuit {
            self.state = GameState::Playing;
        }
    }

    /// Start over on an empty board, keeping the piece source and ghost toggle
    pub fn restart(&mut self, now: Instant) {
        info!(
            score = self.score.points,
            lines = self.score.lines,
            "restarting game"
        );
        self.board = Board::new();
        self.current = Piece::new(self.source.pick_piece_kind());
        self.next = Piece::new(self.source.pick_piece_kind());
        self.score = Score::new();
        self.state = GameState::Playing;
        self.drop_interval = self.score.drop_interval();
        self.drop_deadline = now + self.drop_interval;
    }

    /// Lock the current piece, clear lines, and bring in the next piece
    fn lock_piece(&mut self) {
        self.board.merge(&self.current);

        let lines_cleared = self.board.clear_lines();
        if lines_cleared > 0 {
            let awarded = self.score.add_clear(lines_cleared as u32);
            self.drop_interval = self.score.drop_interval();
            debug!(
                lines = lines_cleared,
                awarded,
                level = self.score.level,
                all_clear = self.board.is_empty(),
                "cleared lines"
            );
        }

        let spawned = Piece::new(self.source.pick_piece_kind());
        self.current = std::mem::replace(&mut self.next, spawned);

        // Top out
        if self.board.collides(&self.current, 0, 0) {
            self.state = GameState::GameOver;
            info!(
                score = self.score.points,
                level = self.score.level,
                lines = self.score.lines,
                "game over"
            );
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, BOARD_WIDTH};
    use crate::randomizer::ScriptedSource;
    use crate::tetromino::TetrominoType;

    fn game_with(kinds: &[TetrominoType]) -> (Game, Instant) {
        let start = Instant::now();
        let source = ScriptedSource::new(kinds.iter().copied());
        (Game::with_source(Box::new(source), start), start)
    }

    /// Fill a row except the given columns
    fn fill_row_except(board: &mut Board, y: i32, holes: &[i32]) {
        for x in 0..BOARD_WIDTH as i32 {
            if !holes.contains(&x) {
                board.set(x, y, Cell::Filled(TetrominoType::Z));
            }
        }
    }

    #[test]
    fn test_new_game() {
        let (game, start) = game_with(&[TetrominoType::T, TetrominoType::I]);
        assert_eq!(game.current.piece_type, TetrominoType::T);
        assert_eq!(game.next.piece_type, TetrominoType::I);
        assert_eq!(game.score, Score::new());
        assert_eq!(game.state, GameState::Playing);
        assert!(game.ghost_enabled);
        assert_eq!(game.drop_interval(), Duration::from_millis(500));
        assert_eq!(game.drop_deadline(), start + Duration::from_millis(500));
    }

    #[test]
    fn test_o_piece_falls_to_floor() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        assert_eq!((game.current.x, game.current.y), (4, 0));
        for _ in 0..18 {
            assert!(game.move_by(0, 1));
        }
        assert_eq!(game.current.y, 18);
        assert!(!game.move_by(0, 1));
        assert_eq!(game.current.y, 18);
    }

    #[test]
    fn test_move_blocked_by_wall() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        for _ in 0..4 {
            assert!(game.move_by(-1, 0));
        }
        assert_eq!(game.current.x, 0);
        assert!(!game.move_by(-1, 0));
        assert_eq!(game.current.x, 0);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let (mut game, _) = game_with(&[TetrominoType::T]);
        game.current.y = 5;
        assert!(game.rotate());
        assert_eq!(game.current.shape, TetrominoType::T.shape().rotated());
    }

    #[test]
    fn test_rotate_rejected_on_collision() {
        let (mut game, _) = game_with(&[TetrominoType::I]);
        // Horizontal I lying on the floor; vertical would poke below it
        game.current.y = 18;
        assert!(!game.board.collides(&game.current, 0, 0));
        let before = game.current.clone();
        assert!(!game.rotate());
        assert_eq!(game.current, before);
    }

    #[test]
    fn test_hard_drop() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        assert_eq!(game.hard_drop(), 18);
        assert_eq!(game.current.y, 18);
        // Not locked until gravity runs
        assert!(game.board.is_empty());
    }

    #[test]
    fn test_update_waits_for_deadline() {
        let (mut game, start) = game_with(&[TetrominoType::T]);
        game.update_at(start + Duration::from_millis(499));
        assert_eq!(game.current.y, 0);

        let deadline = game.drop_deadline();
        game.update_at(deadline);
        assert_eq!(game.current.y, 1);
        assert_eq!(game.drop_deadline(), deadline + Duration::from_millis(500));
    }

    #[test]
    fn test_lock_and_clear_two_lines() {
        let (mut game, _) = game_with(&[TetrominoType::O, TetrominoType::T, TetrominoType::L]);
        fill_row_except(&mut game.board, 18, &[4, 5]);
        fill_row_except(&mut game.board, 19, &[4, 5]);
        game.hard_drop();

        game.update_at(game.drop_deadline());

        assert!(game.board.is_empty());
        assert_eq!(game.score.points, 200);
        assert_eq!(game.score.lines, 2);
        assert_eq!(game.score.level, 1);
        assert_eq!(game.current.piece_type, TetrominoType::T);
        assert_eq!((game.current.x, game.current.y), (4, 0));
        assert_eq!(game.next.piece_type, TetrominoType::L);
        assert_eq!(game.state, GameState::Playing);
    }

    #[test]
    fn test_lock_without_clear() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        game.hard_drop();
        game.update_at(game.drop_deadline());
        assert_eq!(game.board.get(4, 19), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(game.board.get(5, 18), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(game.score.points, 0);
        assert_eq!(game.current.y, 0);
    }

    #[test]
    fn test_clear_scores_at_current_level_and_speeds_up() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        game.score = Score {
            points: 5000,
            level: 3,
            lines: 29,
        };
        fill_row_except(&mut game.board, 19, &[4, 5]);
        game.hard_drop();
        game.update_at(game.drop_deadline());

        assert_eq!(game.score.points, 5000 + 100 * 3);
        assert_eq!(game.score.lines, 30);
        assert_eq!(game.score.level, 4);
        assert_eq!(game.drop_interval(), Duration::from_millis(350));
    }

    #[test]
    fn test_new_deadline_uses_new_interval() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        game.score.lines = 9;
        fill_row_except(&mut game.board, 19, &[4, 5]);
        game.hard_drop();
        let now = game.drop_deadline();
        game.update_at(now);
        assert_eq!(game.drop_deadline(), now + Duration::from_millis(450));
    }

    #[test]
    fn test_top_out_is_game_over() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        game.board.set(4, 2, Cell::Filled(TetrominoType::S));
        game.board.set(5, 2, Cell::Filled(TetrominoType::S));
        game.update_at(game.drop_deadline());

        assert_eq!(game.state, GameState::GameOver);
        assert!(game.is_game_over());
    }

    #[test]
    fn test_game_over_is_one_way() {
        let (mut game, start) = game_with(&[TetrominoType::O]);
        game.board.set(4, 2, Cell::Filled(TetrominoType::S));
        game.update_at(game.drop_deadline());
        assert!(game.is_game_over());

        let board = game.board.clone();
        let piece = game.current.clone();
        let score = game.score.clone();
        for step in 1..20 {
            game.update_at(start + Duration::from_secs(step));
            game.process_action(Action::HardDrop);
            assert!(!game.move_by(1, 0));
            assert!(!game.rotate());
        }
        assert_eq!(game.board, board);
        assert_eq!(game.current, piece);
        assert_eq!(game.score, score);
        assert!(game.is_game_over());
        assert!(!game.request_quit());
    }

    #[test]
    fn test_process_action_dispatch() {
        let (mut game, _) = game_with(&[TetrominoType::T]);
        game.process_action(Action::MoveRight);
        assert_eq!(game.current.x, 5);
        game.process_action(Action::MoveLeft);
        game.process_action(Action::MoveLeft);
        assert_eq!(game.current.x, 3);
        game.process_action(Action::SoftDrop);
        assert_eq!(game.current.y, 1);
        game.process_action(Action::Rotate);
        assert_eq!(game.current.shape, TetrominoType::T.shape().rotated());
        game.process_action(Action::ToggleGhost);
        assert!(!game.ghost_enabled);
        game.process_action(Action::HardDrop);
        assert!(game.board.collides(&game.current, 0, 1));
    }

    #[test]
    fn test_gravity_runs_under_quit_prompt() {
        let (mut game, _) = game_with(&[TetrominoType::T]);
        assert!(game.request_quit());
        assert_eq!(game.state, GameState::ConfirmingQuit);

        game.update_at(game.drop_deadline());
        assert_eq!(game.current.y, 1);

        // Gameplay input is still held back
        game.process_action(Action::MoveLeft);
        game.process_action(Action::HardDrop);
        assert_eq!((game.current.x, game.current.y), (4, 1));

        let deadline = game.drop_deadline();
        game.cancel_quit();
        assert_eq!(game.state, GameState::Playing);
        assert_eq!(game.drop_deadline(), deadline);
    }

    #[test]
    fn test_piece_locks_under_quit_prompt() {
        let (mut game, _) = game_with(&[TetrominoType::O, TetrominoType::T]);
        game.hard_drop();
        game.request_quit();
        game.update_at(game.drop_deadline());

        assert_eq!(game.board.get(4, 19), Some(Cell::Filled(TetrominoType::O)));
        assert_eq!(game.current.piece_type, TetrominoType::T);
        assert_eq!(game.state, GameState::ConfirmingQuit);
    }

    #[test]
    fn test_top_out_under_quit_prompt_is_game_over() {
        let (mut game, _) = game_with(&[TetrominoType::O]);
        game.board.set(4, 2, Cell::Filled(TetrominoType::S));
        game.request_quit();
        game.update_at(game.drop_deadline());
        assert!(game.is_game_over());
    }

    #[test]
    fn test_restart_after_game_over() {
        let (mut game, start) = game_with(&[TetrominoType::O, TetrominoType::I]);
        game.board.set(4, 2, Cell::Filled(TetrominoType::S));
        game.ghost_enabled = false;
        game.update_at(game.drop_deadline());
        game.update_at(game.drop_deadline());
        assert!(game.is_game_over());

        let later = start + Duration::from_secs(30);
        game.restart(later);
        assert_eq!(game.state, GameState::Playing);
        assert!(game.board.is_empty());
        assert_eq!(game.score, Score::new());
        assert!(!game.ghost_enabled);
        assert_eq!(game.drop_deadline(), later + Duration::from_millis(500));
    }
}
