//! Procedural entity placement
//!
//! Flags and obstacles are placed uniformly at random, each bounding box
//! fully inside the arena. Entities are allowed to overlap each other.

use glam::Vec2;
use rand::Rng;

use super::levels::{obstacle_size_modifier, spec_for_level};
use super::state::{Flag, GameState, Obstacle};
use crate::consts::*;

/// Populate the arena for the state's current level: exactly
/// `FLAGS_PER_LEVEL` flags, plus obstacles per the difficulty table.
/// Replaces any existing entities.
pub fn spawn_level(state: &mut GameState) {
    state.flags.clear();
    state.obstacles.clear();
    spawn_flags(state);
    spawn_obstacles(state);
    log::info!(
        "level {} spawned: {} flags, {} obstacles",
        state.level,
        state.flags.len(),
        state.obstacles.len()
    );
}

fn spawn_flags(state: &mut GameState) {
    let size = Vec2::new(FLAG_WIDTH, FLAG_HEIGHT);

    for _ in 0..FLAGS_PER_LEVEL {
        let id = state.next_entity_id();
        let pos = random_pos_inside(state, size);
        // Direction only - scaled by the level's flag speed at move time
        let vel = Vec2::new(
            state.rng.random_range(-1.0..1.0),
            state.rng.random_range(-1.0..1.0),
        );
        state.flags.push(Flag { id, pos, size, vel });
    }
}

fn spawn_obstacles(state: &mut GameState) {
    let count = spec_for_level(state.level).obstacle_count;
    let modifier = obstacle_size_modifier(state.level);

    for _ in 0..count {
        let id = state.next_entity_id();
        let size = Vec2::new(
            state.rng.random_range(OBSTACLE_MIN_SIZE..OBSTACLE_MAX_SIZE) * modifier,
            state.rng.random_range(OBSTACLE_MIN_SIZE..OBSTACLE_MAX_SIZE) * modifier,
        );
        let pos = random_pos_inside(state, size);
        state.obstacles.push(Obstacle { id, pos, size });
    }
}

/// Uniform random top-left corner such that a box of `size` fits in the arena
fn random_pos_inside(state: &mut GameState, size: Vec2) -> Vec2 {
    let max = (state.arena - size).max(Vec2::ZERO);
    Vec2::new(
        state.rng.random_range(0.0..=max.x),
        state.rng.random_range(0.0..=max.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_at_level(level: u32) -> GameState {
        let mut state = GameState::new(42, Vec2::new(800.0, 600.0));
        state.level = level;
        spawn_level(&mut state);
        state
    }

    #[test]
    fn flags_fit_inside_arena() {
        let state = state_at_level(1);
        assert_eq!(state.flags.len(), FLAGS_PER_LEVEL as usize);
        for flag in &state.flags {
            assert!(flag.pos.x >= 0.0 && flag.pos.y >= 0.0);
            assert!(flag.pos.x + flag.size.x <= state.arena.x);
            assert!(flag.pos.y + flag.size.y <= state.arena.y);
        }
    }

    #[test]
    fn flag_velocities_are_directions() {
        let state = state_at_level(1);
        for flag in &state.flags {
            assert!(flag.vel.x >= -1.0 && flag.vel.x < 1.0);
            assert!(flag.vel.y >= -1.0 && flag.vel.y < 1.0);
        }
    }

    #[test]
    fn obstacle_count_follows_table() {
        assert!(state_at_level(1).obstacles.is_empty());
        assert!(state_at_level(2).obstacles.is_empty());
        assert_eq!(state_at_level(3).obstacles.len(), 5);
        assert_eq!(state_at_level(10).obstacles.len(), 20);
        // Beyond the table: last entry's count
        assert_eq!(state_at_level(25).obstacles.len(), 20);
    }

    #[test]
    fn obstacles_fit_inside_arena() {
        let state = state_at_level(5);
        for obstacle in &state.obstacles {
            assert!(obstacle.pos.x >= 0.0 && obstacle.pos.y >= 0.0);
            assert!(obstacle.pos.x + obstacle.size.x <= state.arena.x);
            assert!(obstacle.pos.y + obstacle.size.y <= state.arena.y);
        }
    }

    #[test]
    fn obstacles_shrink_with_level() {
        // At level 10 the size modifier bottoms out at 0.5, so every axis
        // lands in [25, 75)
        let state = state_at_level(10);
        for obstacle in &state.obstacles {
            assert!(obstacle.size.x >= OBSTACLE_MIN_SIZE * 0.5);
            assert!(obstacle.size.x < OBSTACLE_MAX_SIZE * 0.5);
            assert!(obstacle.size.y >= OBSTACLE_MIN_SIZE * 0.5);
            assert!(obstacle.size.y < OBSTACLE_MAX_SIZE * 0.5);
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = GameState::new(123, Vec2::new(800.0, 600.0));
        let b = GameState::new(123, Vec2::new(800.0, 600.0));
        for (fa, fb) in a.flags.iter().zip(&b.flags) {
            assert_eq!(fa.pos, fb.pos);
            assert_eq!(fa.vel, fb.vel);
        }
    }
}
