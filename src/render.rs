//! Read-only projection of the game into a drawable snapshot

use crate::board::{Cell, BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{Game, GameState};
use crate::piece::Piece;
use crate::tetromino::TetrominoType;

/// What a single board cell should look like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayCell {
    #[default]
    Empty,
    /// Landing projection of the falling piece
    Ghost,
    Filled(TetrominoType),
}

/// Everything the display needs for one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Board rows from top to bottom, with the falling piece and ghost drawn in
    pub board: [[DisplayCell; BOARD_WIDTH]; BOARD_HEIGHT],
    /// Next piece in its spawn orientation, rows from top to bottom
    pub preview: Vec<Vec<Option<TetrominoType>>>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub state: GameState,
    pub ghost_enabled: bool,
}

impl Snapshot {
    pub fn game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn confirming_quit(&self) -> bool {
        self.state == GameState::ConfirmingQuit
    }
}

/// Project the game state into a snapshot. Never mutates the game.
pub fn project(game: &Game) -> Snapshot {
    let mut board = [[DisplayCell::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
    for (row, cells) in board.iter_mut().zip(game.board.rows()) {
        for (display, cell) in row.iter_mut().zip(cells) {
            if let Cell::Filled(kind) = cell {
                *display = DisplayCell::Filled(*kind);
            }
        }
    }

    if game.ghost_enabled && !game.is_game_over() {
        let ghost = ghost_piece(game);
        for (x, y) in ghost.cells() {
            if let Some(display) = cell_mut(&mut board, x, y) {
                if *display == DisplayCell::Empty {
                    *display = DisplayCell::Ghost;
                }
            }
        }
    }

    for (x, y) in game.current.cells() {
        if let Some(display) = cell_mut(&mut board, x, y) {
            *display = DisplayCell::Filled(game.current.piece_type);
        }
    }

    Snapshot {
        board,
        preview: preview_grid(&game.next),
        score: game.score.points,
        level: game.score.level,
        lines: game.score.lines,
        state: game.state,
        ghost_enabled: game.ghost_enabled,
    }
}

/// Where the falling piece would come to rest
pub fn ghost_piece(game: &Game) -> Piece {
    let mut ghost = game.current.clone();
    while !game.board.collides(&ghost, 0, 1) {
        ghost.y += 1;
    }
    ghost
}

fn cell_mut(
    board: &mut [[DisplayCell; BOARD_WIDTH]; BOARD_HEIGHT],
    x: i32,
    y: i32,
) -> Option<&mut DisplayCell> {
    if x < 0 || y < 0 {
        return None;
    }
    board.get_mut(y as usize)?.get_mut(x as usize)
}

fn preview_grid(piece: &Piece) -> Vec<Vec<Option<TetrominoType>>> {
    let size = piece.shape.size();
    (0..size)
        .map(|row| {
            (0..size)
                .map(|col| piece.shape.is_filled(row, col).then_some(piece.piece_type))
                .collect()
        })
        .collect()
}
