//! Piece selection
//!
//! Every spawn draws uniformly from the 7 tetrominoes. The source is a trait
//! so games can be driven by a seeded generator or a fixed script.

use crate::tetromino::TetrominoType;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Something that chooses the kind of the next spawned piece
pub trait PieceSource {
    fn pick_piece_kind(&mut self) -> TetrominoType;
}

/// Uniform random selection backed by a seeded ChaCha generator
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Create a source with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a reproducible source
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource for RandomSource {
    fn pick_piece_kind(&mut self) -> TetrominoType {
        let kinds = TetrominoType::all();
        kinds[self.rng.gen_range(0..kinds.len())]
    }
}

/// Replays a fixed list of kinds, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    queue: VecDeque<TetrominoType>,
}

impl ScriptedSource {
    /// Panics on an empty script.
    pub fn new(kinds: impl IntoIterator<Item = TetrominoType>) -> Self {
        let queue: VecDeque<_> = kinds.into_iter().collect();
        assert!(!queue.is_empty(), "scripted piece source needs at least one kind");
        Self { queue }
    }
}

impl PieceSource for ScriptedSource {
    fn pick_piece_kind(&mut self) -> TetrominoType {
        let kind = self.queue[0];
        self.queue.rotate_left(1);
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomSource::with_seed(42);
        let mut b = RandomSource::with_seed(42);
        for _ in 0..50 {
            assert_eq!(a.pick_piece_kind(), b.pick_piece_kind());
        }
    }

    #[test]
    fn test_random_source_covers_all_kinds() {
        let mut source = RandomSource::with_seed(7);
        let seen: HashSet<_> = (0..500).map(|_| source.pick_piece_kind()).collect();
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_scripted_source_cycles() {
        let mut source = ScriptedSource::new([TetrominoType::I, TetrominoType::O]);
        let picks: Vec<_> = (0..5).map(|_| source.pick_piece_kind()).collect();
        assert_eq!(
            picks,
            vec![
                TetrominoType::I,
                TetrominoType::O,
                TetrominoType::I,
                TetrominoType::O,
                TetrominoType::I
            ]
        );
    }
}
