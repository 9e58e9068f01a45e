//! Per-frame simulation step
//!
//! Advances the craft, the obstacle stream, scoring and level progression by
//! one (variable) frame delta.

use super::entity::Entity;
use super::events::GameEvent;
use super::state::{GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Upward impulse (space/click/tap while running)
    pub impulse: bool,
}

/// Advance a running game by `dt` 60 Hz frames. Idle and Ended states do not
/// move.
///
/// Points scored this frame are applied before a collision ends the run, so the
/// final score includes an obstacle passed on the fatal frame.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase != GamePhase::Running {
        return;
    }

    if input.impulse {
        state.impulse();
    }

    state.time_ticks += 1;
    let ctx = state.frame_context(dt);

    let mut signals = Vec::new();
    state.craft.update(&ctx, &mut signals);

    let hitbox = state.craft.hitbox();
    let craft_x = state.craft.pos.x;
    let outcome = state.advance_obstacles(&ctx, &hitbox, craft_x, &mut signals);

    for _ in 0..outcome.passed {
        state.add_point();
    }

    let mut collision = None;
    for signal in signals {
        match signal {
            GameEvent::Collide { cause } => {
                collision.get_or_insert(cause);
            }
            other => state.push_event(other),
        }
    }
    if let Some(cause) = collision {
        state.end(cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Viewport;
    use crate::sim::events::CollisionCause;
    use crate::sim::obstacle::Obstacle;

    fn running() -> GameState {
        let mut state = GameState::new(12345, Viewport::new(1000.0, 800.0));
        state.start();
        state.drain_events();
        state
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut state = GameState::new(1, Viewport::new(1000.0, 800.0));
        let before = state.craft.pos;
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.craft.pos, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_impulse_input() {
        let mut state = running();
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), 1.0);
        }
        assert!(state.craft.velocity > 0.0);
        tick(&mut state, &TickInput { impulse: true }, 1.0);
        // impulse then one frame of gravity
        assert!((state.craft.velocity - (-5.5 + 0.25)).abs() < 1e-5);
        let events = state.drain_events();
        assert!(matches!(events.as_slice(), [GameEvent::Jump { .. }]));
    }

    #[test]
    fn test_falling_ends_run_once() {
        let mut state = running();
        let mut collides = 0;
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), 1.0);
            collides += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::Collide { .. }))
                .count();
        }
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.collision, Some(CollisionCause::Boundary));
        assert_eq!(collides, 1);
    }

    #[test]
    fn test_ended_is_frozen() {
        let mut state = running();
        state.end(CollisionCause::Obstacle);
        let pos = state.craft.pos;
        tick(&mut state, &TickInput { impulse: true }, 1.0);
        assert_eq!(state.craft.pos, pos);
    }

    #[test]
    fn test_passing_scores_and_promotes() {
        let mut state = running();
        state.score = 7;
        let x = state.craft.pos.x;
        // Trailing edge just ahead of the craft, gap around it
        state.obstacles.obstacles.push(Obstacle {
            x: x - 60.0 + 1.0,
            gap_top: state.craft.pos.y - 110.0,
            gap_size: 220.0,
            width: 60.0,
            passed: false,
            oscillates: false,
            phase: 0.0,
            base_gap_top: state.craft.pos.y - 110.0,
        });
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.score, 8);
        assert_eq!(state.tier_index, 1);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ScoreChanged { score: 8 }));
        assert!(events.contains(&GameEvent::TierChanged { tier: 1 }));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_obstacle_hit_ends_run() {
        let mut state = running();
        let pos = state.craft.pos;
        state.obstacles.obstacles.push(Obstacle {
            x: pos.x - 10.0,
            gap_top: pos.y + 100.0,
            gap_size: 220.0,
            width: 60.0,
            passed: false,
            oscillates: false,
            phase: 0.0,
            base_gap_top: pos.y + 100.0,
        });
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(state.collision, Some(CollisionCause::Obstacle));
    }

    #[test]
    fn test_determinism() {
        let mut a = running();
        let mut b = running();
        for i in 0..300 {
            let input = TickInput {
                impulse: i % 25 == 0,
            };
            tick(&mut a, &input, 1.0);
            tick(&mut b, &input, 1.0);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.obstacles.obstacles, b.obstacles.obstacles);
        assert_eq!(a.craft.pos, b.craft.pos);
    }
}
