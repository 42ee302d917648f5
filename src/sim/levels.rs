//! Difficulty table and per-level scaling
//!
//! Ten named tiers define flag speed and obstacle count. Levels beyond the
//! table reuse the last tier's values, but penalty and size scaling keep
//! growing with the raw level number - there is no level cap.

use serde::{Deserialize, Serialize};

/// One tier of the difficulty table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub name: &'static str,
    /// Multiplier applied to flag velocity directions each tick
    pub flag_speed: f32,
    /// Obstacles spawned at level start
    pub obstacle_count: u32,
}

/// Ordered difficulty tiers
pub const LEVELS: [LevelSpec; 10] = [
    LevelSpec { name: "Easy", flag_speed: 0.0, obstacle_count: 0 },
    LevelSpec { name: "Medium", flag_speed: 1.0, obstacle_count: 0 },
    LevelSpec { name: "Hard", flag_speed: 2.0, obstacle_count: 5 },
    LevelSpec { name: "Expert", flag_speed: 3.0, obstacle_count: 7 },
    LevelSpec { name: "Master", flag_speed: 3.5, obstacle_count: 8 },
    LevelSpec { name: "Champion", flag_speed: 4.0, obstacle_count: 9 },
    LevelSpec { name: "Legend", flag_speed: 4.5, obstacle_count: 10 },
    LevelSpec { name: "Mythic", flag_speed: 5.0, obstacle_count: 12 },
    LevelSpec { name: "Godlike", flag_speed: 5.5, obstacle_count: 15 },
    LevelSpec { name: "Impossible", flag_speed: 6.0, obstacle_count: 20 },
];

/// Look up the tier for a level (1-based), saturating at the last entry
pub fn spec_for_level(level: u32) -> &'static LevelSpec {
    let index = (level.saturating_sub(1) as usize).min(LEVELS.len() - 1);
    &LEVELS[index]
}

/// Obstacle penalty multiplier: +10% per level past the first, unbounded
pub fn penalty_multiplier(level: u32) -> f32 {
    1.0 + level.saturating_sub(1) as f32 * 0.1
}

/// Scaled obstacle penalties (score, time), rounded to nearest
pub fn obstacle_penalties(level: u32) -> (u32, u32) {
    use crate::consts::{SCORE_PENALTY, TIME_PENALTY};
    let m = penalty_multiplier(level);
    (
        (SCORE_PENALTY as f32 * m).round() as u32,
        (TIME_PENALTY as f32 * m).round() as u32,
    )
}

/// Obstacles shrink on higher levels, down to half their base size
pub fn obstacle_size_modifier(level: u32) -> f32 {
    (1.0 - level as f32 * 0.05).max(0.5)
}
