//! Per-frame simulation tick and the 1 Hz countdown tick
//!
//! Both entry points mutate the state synchronously on the same logical
//! thread; the frontend drives `tick` from its frame loop and `timer_tick`
//! from a separate 1 Hz task.

use glam::Vec2;

use super::collision::boxes_overlap;
use super::levels::{obstacle_penalties, spec_for_level};
use super::spawn::spawn_level;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer moved: new target in arena-local coordinates
    pub target: Option<Vec2>,
    /// Pointer left the arena (or window blurred): stop chasing
    pub halt: bool,
}

/// Advance the game by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    // Any coordinate update sets the target and enables movement
    if let Some(target) = input.target {
        state.target_pos = target;
        state.moving = true;
    }
    if input.halt {
        state.moving = false;
    }

    match state.phase {
        GamePhase::Active => {
            move_avatar(state);
            check_flag_captures(state);
            // Capturing the last flag leaves Active; penalties and flag
            // motion only apply while the level is live
            if state.phase == GamePhase::Active {
                check_obstacle_collision(state);
                move_flags(state);
            }
        }

        GamePhase::LevelTransition => {
            // Avatar keeps following the pointer during the pause
            move_avatar(state);
            state.transition_ticks = state.transition_ticks.saturating_sub(1);
            if state.transition_ticks == 0 {
                advance_level(state);
            }
        }

        GamePhase::GameOver => unreachable!(),
    }
}

/// One second of countdown. Driven by an independent 1 Hz task; only runs
/// while the level is active (the transition delay does not burn time).
pub fn timer_tick(state: &mut GameState) {
    if state.phase != GamePhase::Active {
        return;
    }

    state.time_remaining = state.time_remaining.saturating_sub(1);
    if state.time_remaining == 0 {
        end_game(state);
    }
}

/// Reclamp all entity positions after the arena changed size
pub fn resize_arena(state: &mut GameState, arena: Vec2) {
    state.arena = arena;

    for flag in &mut state.flags {
        flag.pos = flag.pos.min(arena - flag.size).max(Vec2::ZERO);
    }
    for obstacle in &mut state.obstacles {
        obstacle.pos = obstacle.pos.min(arena - obstacle.size).max(Vec2::ZERO);
    }
}

/// Step the avatar toward the target, suppressing movement inside the
/// deadzone and never overshooting.
fn move_avatar(state: &mut GameState) {
    if !state.moving {
        return;
    }

    let delta = state.target_pos - state.avatar_center();
    let distance = delta.length();
    if distance > AVATAR_DEADZONE {
        let step = AVATAR_SPEED.min(distance);
        state.avatar_pos += delta / distance * step;
    }
}

/// Sweep flags in reverse index order so removal during iteration is safe
fn check_flag_captures(state: &mut GameState) {
    let avatar_size = Vec2::splat(AVATAR_SIZE);

    for i in (0..state.flags.len()).rev() {
        let flag = &state.flags[i];
        if boxes_overlap(state.avatar_pos, avatar_size, flag.pos, flag.size) {
            let flag = state.flags.remove(i);
            state.score += POINTS_PER_FLAG;
            state.flags_captured += 1;
            state.push_event(GameEvent::FlagCaptured {
                points: POINTS_PER_FLAG,
                center: flag.center(),
            });
        }
    }

    if state.flags_captured >= FLAGS_PER_LEVEL {
        begin_level_transition(state);
    }
}

/// At most one penalty per frame: stop at the first overlapping obstacle
fn check_obstacle_collision(state: &mut GameState) {
    let avatar_size = Vec2::splat(AVATAR_SIZE);
    let hit = state
        .obstacles
        .iter()
        .any(|o| boxes_overlap(state.avatar_pos, avatar_size, o.pos, o.size));

    if hit {
        let (score_penalty, time_penalty) = obstacle_penalties(state.level);
        state.score = state.score.saturating_sub(score_penalty);
        state.time_remaining = state
            .time_remaining
            .saturating_sub(time_penalty)
            .max(TIME_FLOOR_SECS);
        state.push_event(GameEvent::ObstacleHit {
            score_penalty,
            time_penalty,
        });
    }
}

/// Advance flags by their velocity scaled with the level's flag speed,
/// reflecting off arena edges. Positions are clamped to the boundary on the
/// tick they reflect, so a flag never leaves the arena.
fn move_flags(state: &mut GameState) {
    let speed = spec_for_level(state.level).flag_speed;
    if speed == 0.0 {
        return;
    }

    let arena = state.arena;
    for flag in &mut state.flags {
        flag.pos += flag.vel * speed;

        if flag.pos.x <= 0.0 {
            flag.pos.x = 0.0;
            flag.vel.x = -flag.vel.x;
        } else if flag.pos.x + flag.size.x >= arena.x {
            flag.pos.x = arena.x - flag.size.x;
            flag.vel.x = -flag.vel.x;
        }

        if flag.pos.y <= 0.0 {
            flag.pos.y = 0.0;
            flag.vel.y = -flag.vel.y;
        } else if flag.pos.y + flag.size.y >= arena.y {
            flag.pos.y = arena.y - flag.size.y;
            flag.vel.y = -flag.vel.y;
        }
    }
}

fn begin_level_transition(state: &mut GameState) {
    state.phase = GamePhase::LevelTransition;
    state.transition_ticks = LEVEL_TRANSITION_TICKS;
    state.push_event(GameEvent::LevelComplete {
        next_level: state.level + 1,
    });
    log::info!("level {} complete, score {}", state.level, state.score);
}

fn advance_level(state: &mut GameState) {
    state.level += 1;
    state.time_remaining = GAME_DURATION_SECS;
    state.flags_captured = 0;
    state.phase = GamePhase::Active;
    spawn_level(state);
    state.push_event(GameEvent::LevelStarted { level: state.level });
}

fn end_game(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.moving = false;
    state.push_event(GameEvent::GameOver {
        score: state.score,
        level: state.level,
    });
    log::info!("game over: {}", state.final_score_text());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    const ARENA: Vec2 = Vec2::new(800.0, 600.0);

    fn new_state() -> GameState {
        GameState::new(12345, ARENA)
    }

    /// Park every flag away from the centered avatar
    fn park_flags(state: &mut GameState, corner: Vec2) {
        for flag in &mut state.flags {
            flag.pos = corner;
            flag.vel = Vec2::ZERO;
        }
    }

    fn stack_flags_on_avatar(state: &mut GameState) {
        let avatar = state.avatar_pos;
        for flag in &mut state.flags {
            flag.pos = avatar;
        }
    }

    #[test]
    fn capturing_a_flag_scores_fifty() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        state.flags[0].pos = state.avatar_pos;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 50);
        assert_eq!(state.flags_captured, 1);
        assert_eq!(state.flags.len(), 5);
        assert_eq!(state.phase, GamePhase::Active);

        // The capture event carries the reward for on-screen feedback
        let events = state.drain_events();
        assert!(events.iter().any(
            |e| matches!(e, GameEvent::FlagCaptured { points, .. } if *points == POINTS_PER_FLAG)
        ));
    }

    #[test]
    fn capturing_all_flags_completes_the_level() {
        let mut state = new_state();
        stack_flags_on_avatar(&mut state);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 300);
        assert_eq!(state.flags_captured, FLAGS_PER_LEVEL);
        assert_eq!(state.phase, GamePhase::LevelTransition);

        let completes = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
            .count();
        assert_eq!(completes, 1);
    }

    #[test]
    fn transition_delay_then_next_level() {
        let mut state = new_state();
        state.time_remaining = 17;
        stack_flags_on_avatar(&mut state);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::LevelTransition);

        // Timer does not run during the transition
        timer_tick(&mut state);
        assert_eq!(state.time_remaining, 17);

        for _ in 0..LEVEL_TRANSITION_TICKS {
            tick(&mut state, &TickInput::default());
        }

        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.level, 2);
        assert_eq!(state.time_remaining, GAME_DURATION_SECS);
        assert_eq!(state.flags_captured, 0);
        assert_eq!(state.flags.len(), FLAGS_PER_LEVEL as usize);

        let events = state.drain_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::LevelStarted { level: 2 }))
        );
        // No second LevelComplete while waiting out the delay
        let completes = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelComplete { .. }))
            .count();
        assert_eq!(completes, 1);
    }

    #[test]
    fn obstacle_penalty_scales_with_level() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        state.level = 3;
        state.score = 100;
        state.time_remaining = 60;
        state.obstacles.push(Obstacle {
            id: 900,
            pos: state.avatar_pos,
            size: Vec2::splat(40.0),
        });

        tick(&mut state, &TickInput::default());

        // round(10 * 1.2) = 12, round(5 * 1.2) = 6
        assert_eq!(state.score, 88);
        assert_eq!(state.time_remaining, 54);
        assert_eq!(state.phase, GamePhase::Active);
        assert!(state.drain_events().iter().any(|e| matches!(
            e,
            GameEvent::ObstacleHit {
                score_penalty: 12,
                time_penalty: 6
            }
        )));
    }

    #[test]
    fn one_penalty_per_frame_even_with_stacked_obstacles() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        state.score = 100;
        for id in 0..3 {
            state.obstacles.push(Obstacle {
                id: 900 + id,
                pos: state.avatar_pos,
                size: Vec2::splat(40.0),
            });
        }

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 90);
    }

    #[test]
    fn penalties_floor_at_zero_score_and_one_second() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        state.level = 3;
        state.score = 5;
        state.time_remaining = 3;
        state.obstacles.push(Obstacle {
            id: 900,
            pos: state.avatar_pos,
            size: Vec2::splat(40.0),
        });

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 0);
        assert_eq!(state.time_remaining, 1);
    }

    #[test]
    fn timer_reaching_zero_ends_the_game() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));

        for _ in 0..GAME_DURATION_SECS {
            timer_tick(&mut state);
        }

        assert_eq!(state.time_remaining, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(
            state
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
        );

        // Further ticks are no-ops
        timer_tick(&mut state);
        assert_eq!(state.time_remaining, 0);
        let score = state.score;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, score);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn flag_bounces_off_left_wall() {
        let mut state = new_state();
        state.level = 2; // flag speed 1.0
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        state.flags[0].pos = Vec2::new(0.0, 100.0);
        state.flags[0].vel = Vec2::new(-0.5, 0.0);

        tick(&mut state, &TickInput::default());

        assert!(state.flags[0].vel.x > 0.0);
        assert!(state.flags[0].pos.x >= 0.0);
    }

    #[test]
    fn flag_bounces_off_right_wall() {
        let mut state = new_state();
        state.level = 2;
        park_flags(&mut state, Vec2::new(700.0, 100.0));
        let flag = &mut state.flags[0];
        flag.pos = Vec2::new(ARENA.x - flag.size.x, 100.0);
        flag.vel = Vec2::new(0.9, 0.0);

        tick(&mut state, &TickInput::default());

        let flag = &state.flags[0];
        assert!(flag.vel.x < 0.0);
        assert!(flag.pos.x + flag.size.x <= ARENA.x);
    }

    #[test]
    fn flags_do_not_move_on_level_one() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        state.flags[0].vel = Vec2::new(0.8, 0.8);
        let before = state.flags[0].pos;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.flags[0].pos, before);
    }

    #[test]
    fn avatar_steps_at_fixed_speed_toward_target() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        let start = state.avatar_center();

        let input = TickInput {
            target: Some(start + Vec2::new(100.0, 0.0)),
            halt: false,
        };
        tick(&mut state, &input);
        assert!((state.avatar_center().x - (start.x + AVATAR_SPEED)).abs() < 0.001);
        assert!((state.avatar_center().y - start.y).abs() < 0.001);

        // A target barely past the deadzone still gets a whole step: the
        // deadzone equals the step size, so any distance large enough to
        // move at all is at least one full step
        let here = state.avatar_center();
        let input = TickInput {
            target: Some(here + Vec2::new(6.0, 0.0)),
            halt: false,
        };
        tick(&mut state, &input);
        assert!((state.avatar_center().x - (here.x + AVATAR_SPEED)).abs() < 0.001);
    }

    #[test]
    fn deadzone_suppresses_movement() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        let start = state.avatar_pos;

        let input = TickInput {
            target: Some(state.avatar_center() + Vec2::new(3.0, 0.0)),
            halt: false,
        };
        tick(&mut state, &input);

        assert_eq!(state.avatar_pos, start);
        assert!(state.moving);
    }

    #[test]
    fn halt_disables_movement() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(700.0, 500.0));
        let target = state.avatar_center() + Vec2::new(100.0, 0.0);

        tick(
            &mut state,
            &TickInput {
                target: Some(target),
                halt: false,
            },
        );
        assert!(state.moving);

        let pos = state.avatar_pos;
        tick(
            &mut state,
            &TickInput {
                target: None,
                halt: true,
            },
        );
        assert!(!state.moving);
        assert_eq!(state.avatar_pos, pos);
    }

    #[test]
    fn resize_reclamps_entities_into_bounds() {
        let mut state = new_state();
        park_flags(&mut state, Vec2::new(750.0, 530.0));
        state.obstacles.push(Obstacle {
            id: 900,
            pos: Vec2::new(760.0, 560.0),
            size: Vec2::new(60.0, 60.0),
        });

        resize_arena(&mut state, Vec2::new(400.0, 300.0));

        for flag in &state.flags {
            assert!(flag.pos.x + flag.size.x <= 400.0);
            assert!(flag.pos.y + flag.size.y <= 300.0);
            assert!(flag.pos.x >= 0.0 && flag.pos.y >= 0.0);
        }
        let obstacle = &state.obstacles[0];
        assert!(obstacle.pos.x + obstacle.size.x <= 400.0);
        assert!(obstacle.pos.y + obstacle.size.y <= 300.0);
    }
}
