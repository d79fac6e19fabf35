//! Scoring and level progression

use std::time::Duration;

/// Lines needed per level
const LINES_PER_LEVEL: u32 = 10;
/// Points per cleared line, multiplied by the level
const POINTS_PER_LINE: u64 = 100;
/// Gravity interval at level 1
const BASE_DROP_INTERVAL: Duration = Duration::from_millis(500);
/// Gravity speeds up by this much each level
const DROP_INTERVAL_STEP: Duration = Duration::from_millis(50);
/// Gravity never gets faster than this
const MIN_DROP_INTERVAL: Duration = Duration::from_millis(50);

/// Score, level and line tracking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    /// Current score
    pub points: u64,
    /// Current level, starting at 1
    pub level: u32,
    /// Total lines cleared
    pub lines: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            lines: 0,
        }
    }

    /// Award a line clear at the current level, then recompute the level.
    /// Returns the points awarded.
    pub fn add_clear(&mut self, lines: u32) -> u64 {
        let awarded = lines as u64 * POINTS_PER_LINE * self.level as u64;
        self.points += awarded;
        self.lines += lines;
        self.level = self.lines / LINES_PER_LEVEL + 1;
        awarded
    }

    /// Gravity interval for the current level
    pub fn drop_interval(&self) -> Duration {
        let speedup = DROP_INTERVAL_STEP.saturating_mul(self.level.saturating_sub(1));
        BASE_DROP_INTERVAL
            .saturating_sub(speedup)
            .max(MIN_DROP_INTERVAL)
    }
}
