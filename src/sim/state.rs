//! Game state and core simulation types
//!
//! Everything the state machine owns lives here; mutation happens only
//! through the functions in `tick` and `spawn`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal gameplay: timer runs, flags move, collisions apply
    Active,
    /// All flags captured, waiting out the delay before the next level
    LevelTransition,
    /// Run ended (timer hit zero)
    GameOver,
}

/// Discrete events emitted by the simulation for the frontend collaborators
/// (audio, visual effects, overlays). Drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A flag was captured at the given center point
    FlagCaptured { points: u32, center: Vec2 },
    /// All flags captured; transition to `next_level` has begun
    LevelComplete { next_level: u32 },
    /// A new level became active
    LevelStarted { level: u32 },
    /// Avatar hit an obstacle and the scaled penalties were applied
    ObstacleHit { score_penalty: u32, time_penalty: u32 },
    /// Timer ran out
    GameOver { score: u32, level: u32 },
}

/// A flag entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flag {
    pub id: u32,
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    pub size: Vec2,
    /// Direction only, each axis in [-1, 1); scaled by the level's flag
    /// speed at move time
    pub vel: Vec2,
}

impl Flag {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A static obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG driving all procedural placement
    pub rng: Pcg32,
    /// Arena dimensions (width, height) in logical units
    pub arena: Vec2,
    /// Score (floor 0)
    pub score: u32,
    /// Countdown timer in whole seconds
    pub time_remaining: u32,
    /// Current level, starting at 1, unbounded
    pub level: u32,
    /// Flags captured so far this level
    pub flags_captured: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Ticks left in the level transition delay
    pub transition_ticks: u32,
    /// Avatar top-left corner
    pub avatar_pos: Vec2,
    /// Pointer target the avatar chases (arena-local)
    pub target_pos: Vec2,
    /// Whether the avatar is chasing the target
    pub moving: bool,
    /// Live flags (removed on capture)
    pub flags: Vec<Flag>,
    /// Live obstacles (replaced on level transition)
    pub obstacles: Vec<Obstacle>,
    /// Pending events for the frontend, drained each frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run at level 1 with the avatar centered and the first
    /// level's entities spawned.
    pub fn new(seed: u64, arena: Vec2) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            arena,
            score: 0,
            time_remaining: GAME_DURATION_SECS,
            level: 1,
            flags_captured: 0,
            phase: GamePhase::Active,
            transition_ticks: 0,
            avatar_pos: (arena - Vec2::splat(AVATAR_SIZE)) / 2.0,
            target_pos: arena / 2.0,
            moving: false,
            flags: Vec::new(),
            obstacles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };

        super::spawn::spawn_level(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Center of the avatar's bounding box
    pub fn avatar_center(&self) -> Vec2 {
        self.avatar_pos + Vec2::splat(AVATAR_SIZE / 2.0)
    }

    /// Queue an event for the frontend
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Final score line for the game-over display
    pub fn final_score_text(&self) -> String {
        format!("{} (Level {})", self.score, self.level)
    }
}
