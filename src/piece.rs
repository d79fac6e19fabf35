//! Active falling piece

use crate::board::BOARD_WIDTH;
use crate::tetromino::{Shape, TetrominoType};

/// A falling piece: a shape anchored at a board position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino (its color and identity)
    pub piece_type: TetrominoType,
    /// Current occupancy matrix; rotation replaces it
    pub shape: Shape,
    /// Board column of the shape's left edge
    pub x: i32,
    /// Board row of the shape's top edge (row 0 is the top of the board)
    pub y: i32,
}

impl Piece {
    /// Create a new piece at spawn position, horizontally centered on row 0
    pub fn new(piece_type: TetrominoType) -> Self {
        let shape = piece_type.shape();
        let x = BOARD_WIDTH as i32 / 2 - shape.width() as i32 / 2;
        Self {
            piece_type,
            shape,
            x,
            y: 0,
        }
    }

    /// Absolute board positions (x, y) of all occupied cells, offset by (dx, dy)
    pub fn cells_at(&self, dx: i32, dy: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(row, col)| (self.x + col as i32 + dx, self.y + row as i32 + dy))
    }

    /// Absolute board positions of all occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(0, 0)
    }

    /// Copy of this piece rotated 90 degrees clockwise in place
    pub fn rotated(&self) -> Piece {
        Piece {
            shape: self.shape.rotated(),
            ..self.clone()
        }
    }
}
