//! Flag Rush - a flag-capture chase game for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `audio`: Procedural Web Audio sound effects
//! - `settings`: Audio preferences persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Flags to capture per level
    pub const FLAGS_PER_LEVEL: u32 = 6;
    /// Score reward per captured flag
    pub const POINTS_PER_FLAG: u32 = 50;
    /// Countdown timer per level (seconds)
    pub const GAME_DURATION_SECS: u32 = 60;

    /// Avatar bounding box (square, arena units)
    pub const AVATAR_SIZE: f32 = 30.0;
    /// Avatar step per tick toward the target
    pub const AVATAR_SPEED: f32 = 5.0;
    /// Distance below which avatar movement is suppressed (prevents jitter)
    pub const AVATAR_DEADZONE: f32 = 5.0;

    /// Flag bounding box
    pub const FLAG_WIDTH: f32 = 40.0;
    pub const FLAG_HEIGHT: f32 = 60.0;

    /// Obstacle base size range, scaled down by the level size modifier
    pub const OBSTACLE_MIN_SIZE: f32 = 50.0;
    pub const OBSTACLE_MAX_SIZE: f32 = 150.0;

    /// Base penalties for hitting an obstacle (before the level multiplier)
    pub const SCORE_PENALTY: u32 = 10;
    pub const TIME_PENALTY: u32 = 5;
    /// Timer never drops below this from a penalty
    pub const TIME_FLOOR_SECS: u32 = 1;

    /// Delay between clearing a level and starting the next (2 s at 60 Hz)
    pub const LEVEL_TRANSITION_TICKS: u32 = 2 * 60;

    /// Flag banner colors, cycled by spawn index
    pub const FLAG_COLORS: [&str; 6] = [
        "#e74c3c", "#3498db", "#2ecc71", "#f39c12", "#9b59b6", "#1abc9c",
    ];
}
