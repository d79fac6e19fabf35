//! Tetromino definitions and shapes
//!
//! All 7 standard tetrominoes with their spawn-orientation occupancy matrices.
//! Rotated orientations are derived by rotating the matrix, not looked up.

use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Magenta - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Light yellow - L-shape
}

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::O => Color::Yellow,
            TetrominoType::T => Color::Magenta,
            TetrominoType::S => Color::Green,
            TetrominoType::Z => Color::Red,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::LightYellow,
        }
    }

    /// Get all tetromino types, in a fixed order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Spawn-orientation shape as rows of '#' (occupied) and '.' (empty)
    fn pattern(&self) -> &'static [&'static str] {
        match self {
            TetrominoType::I => &["....", "####", "....", "...."],
            TetrominoType::O => &["##", "##"],
            TetrominoType::T => &[".#.", "###", "..."],
            TetrominoType::S => &[".##", "##.", "..."],
            TetrominoType::Z => &["##.", ".##", "..."],
            TetrominoType::J => &["#..", "###", "..."],
            TetrominoType::L => &["..#", "###", "..."],
        }
    }

    /// Get the spawn-orientation shape
    pub fn shape(&self) -> Shape {
        Shape::from_rows(
            self.pattern()
                .iter()
                .map(|row| row.chars().map(|c| c == '#').collect())
                .collect(),
        )
    }
}

/// Square boolean occupancy matrix, stored as [row][col] with row 0 on top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from its rows.
    ///
    /// Panics if the matrix is empty or not square; shapes only come from the
    /// fixed tables above, so a malformed one is a programming error.
    pub fn from_rows(cells: Vec<Vec<bool>>) -> Self {
        let size = cells.len();
        assert!(size > 0, "shape matrix must not be empty");
        assert!(
            cells.iter().all(|row| row.len() == size),
            "shape matrix must be square, got {} rows of widths {:?}",
            size,
            cells.iter().map(Vec::len).collect::<Vec<_>>()
        );
        Self { cells }
    }

    /// Side length of the bounding square
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Width of the matrix (first row length)
    pub fn width(&self) -> usize {
        self.cells[0].len()
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Iterate over occupied cells as (row, col)
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cols)| {
            cols.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(col, _)| (row, col))
        })
    }

    /// Rotate 90 degrees clockwise: rotated[x][size-1-y] = shape[y][x]
    pub fn rotated(&self) -> Shape {
        let size = self.size();
        let mut rotated = vec![vec![false; size]; size];
        for (y, row) in self.cells.iter().enumerate() {
            for (x, &filled) in row.iter().enumerate() {
                rotated[x][size - 1 - y] = filled;
            }
        }
        Shape { cells: rotated }
    }
}
