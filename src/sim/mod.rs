//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod levels;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::boxes_overlap;
pub use levels::{LEVELS, LevelSpec, obstacle_penalties, penalty_multiplier, spec_for_level};
pub use spawn::spawn_level;
pub use state::{Flag, GameEvent, GamePhase, GameState, Obstacle};
pub use tick::{TickInput, resize_arena, tick, timer_tick};
