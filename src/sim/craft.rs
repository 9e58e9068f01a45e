//! The player's craft

use std::collections::VecDeque;

use glam::Vec2;

use super::collision::Rect;
use super::entity::{Entity, FrameContext};
use super::events::{CollisionCause, GameEvent};
use super::levels::Tier;
use crate::Viewport;
use crate::consts::*;
use crate::renderer::{Color, DrawCommand, Surface, shapes};

/// The piloted craft: falls under gravity, climbs on impulses
#[derive(Debug, Clone)]
pub struct Craft {
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub velocity: f32,
    /// Nose angle in radians (positive is nose-down)
    pub rotation: f32,
    /// Exhaust trail, oldest first
    pub trail: VecDeque<Vec2>,
    frames: u64,
}

impl Craft {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            pos: Self::start_position(viewport),
            velocity: 0.0,
            rotation: 0.0,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY + 1),
            frames: 0,
        }
    }

    /// Where the craft sits at the start of a run
    pub fn start_position(viewport: Viewport) -> Vec2 {
        Vec2::new(
            viewport.width * CRAFT_START_X_FRACTION,
            viewport.height / 2.0,
        )
    }

    /// Set velocity to the tier's jump impulse and announce it
    pub fn apply_impulse(&mut self, tier: &Tier, events: &mut Vec<GameEvent>) {
        self.velocity = tier.jump_impulse;
        events.push(GameEvent::Jump {
            pos: Vec2::new(self.pos.x - TRAIL_OFFSET, self.pos.y),
            color: tier.color,
        });
    }

    /// Reduced collision box centered on the craft
    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, HITBOX_WIDTH, HITBOX_HEIGHT)
    }

    /// True once the sprite touches the top or bottom of the play area
    pub fn out_of_bounds(&self, viewport: Viewport) -> bool {
        let half = CRAFT_HEIGHT / 2.0;
        self.pos.y + half >= viewport.height || self.pos.y - half <= 0.0
    }

    fn record_trail(&mut self) {
        let heading = Vec2::new(self.rotation.cos(), self.rotation.sin());
        self.trail.push_back(self.pos - heading * TRAIL_OFFSET);
        while self.trail.len() > TRAIL_CAPACITY {
            self.trail.pop_front();
        }
    }
}

impl Entity for Craft {
    fn update(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>) {
        self.frames += 1;

        self.velocity += ctx.tier.gravity * ctx.dt;
        self.pos.y += self.velocity * ctx.dt;

        let target = (self.velocity * ROTATION_PER_VELOCITY).clamp(ROTATION_MIN, ROTATION_MAX);
        self.rotation += (target - self.rotation) * ROTATION_EASE_RATE * ctx.dt;

        if self.out_of_bounds(ctx.viewport) {
            events.push(GameEvent::Collide {
                cause: CollisionCause::Boundary,
            });
        }

        if self.frames.is_multiple_of(2) {
            self.record_trail();
        }
    }

    fn render(&self, ctx: &FrameContext, surface: &mut dyn Surface) {
        for (from, to, width, alpha) in shapes::trail_segments(&self.trail) {
            surface.draw(DrawCommand::Line {
                from,
                to,
                width,
                color: Color::WHITE,
                alpha,
            });
        }

        surface.draw(DrawCommand::Polygon {
            points: shapes::craft_hull(self.pos, self.rotation),
            color: Color::WHITE,
            glow: Some((ctx.tier.color, 20.0)),
        });
        surface.draw(DrawCommand::Ellipse {
            center: self.pos,
            radii: Vec2::new(8.0, 3.0),
            rotation: self.rotation,
            color: Color::COCKPIT,
        });

        let flicker = shapes::thruster_flicker(self.frames);
        for side in [1.0, -1.0] {
            surface.draw(DrawCommand::Polygon {
                points: shapes::thruster(self.pos, self.rotation, side, flicker),
                color: ctx.tier.color,
                glow: None,
            });
        }
    }

    fn reset(&mut self, viewport: Viewport) {
        self.pos = Self::start_position(viewport);
        self.velocity = 0.0;
        self.rotation = 0.0;
        self.trail.clear();
        self.frames = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::sim::levels::tier;

    fn ctx(dt: f32, tier_index: usize) -> FrameContext {
        FrameContext {
            dt,
            frame: 0,
            tier: tier(tier_index),
            viewport: Viewport::new(1000.0, 800.0),
        }
    }

    #[test]
    fn test_starts_left_of_center() {
        let craft = Craft::new(Viewport::new(1000.0, 800.0));
        assert_eq!(craft.pos, Vec2::new(150.0, 400.0));
        assert_eq!(craft.velocity, 0.0);
        assert!(craft.trail.is_empty());
    }

    #[test]
    fn test_gravity_integration() {
        let mut craft = Craft::new(Viewport::new(1000.0, 800.0));
        let mut events = Vec::new();
        craft.update(&ctx(1.0, 0), &mut events);
        assert!((craft.velocity - 0.25).abs() < 1e-6);
        assert!((craft.pos.y - 400.25).abs() < 1e-4);

        craft.update(&ctx(2.0, 0), &mut events);
        assert!((craft.velocity - 0.75).abs() < 1e-6);
        assert!(events.is_empty());
    }

    #[test]
    fn test_impulse_uses_tier_and_emits_jump() {
        let mut craft = Craft::new(Viewport::new(1000.0, 800.0));
        let mut events = Vec::new();
        craft.apply_impulse(tier(1), &mut events);
        assert_eq!(craft.velocity, -6.5);
        assert_eq!(
            events,
            vec![GameEvent::Jump {
                pos: Vec2::new(130.0, 400.0),
                color: tier(1).color,
            }]
        );
    }

    #[test]
    fn test_rotation_eases_within_limits() {
        let mut craft = Craft::new(Viewport::new(1000.0, 800.0));
        craft.velocity = 100.0;
        craft.pos.y = 300.0;
        let mut events = Vec::new();
        for _ in 0..200 {
            craft.velocity = 100.0;
            craft.pos.y = 300.0;
            craft.update(&ctx(1.0, 0), &mut events);
        }
        assert!(craft.rotation <= ROTATION_MAX + 1e-5);
        assert!((craft.rotation - ROTATION_MAX).abs() < 1e-3);

        for _ in 0..200 {
            craft.velocity = -100.0;
            craft.pos.y = 300.0;
            craft.update(&ctx(1.0, 0), &mut events);
        }
        assert!(craft.rotation >= ROTATION_MIN - 1e-5);
        assert!((craft.rotation - ROTATION_MIN).abs() < 1e-3);
    }

    #[test]
    fn test_boundary_signals_before_leaving_bounds() {
        let viewport = Viewport::new(1000.0, 800.0);
        let mut craft = Craft::new(viewport);
        let mut events = Vec::new();
        let mut frames = 0;
        while events.is_empty() && frames < 1000 {
            craft.update(&ctx(1.0, 6), &mut events);
            frames += 1;
        }
        assert_eq!(
            events,
            vec![GameEvent::Collide {
                cause: CollisionCause::Boundary
            }]
        );
        assert!(craft.pos.y + CRAFT_HEIGHT / 2.0 >= viewport.height);

        let mut craft = Craft::new(viewport);
        craft.pos.y = 10.0;
        let mut events = Vec::new();
        craft.update(&ctx(0.0, 0), &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_trail_every_other_frame_and_bounded() {
        let mut craft = Craft::new(Viewport::new(1000.0, 800.0));
        let mut events = Vec::new();
        craft.update(&ctx(0.0, 0), &mut events);
        assert!(craft.trail.is_empty());
        craft.update(&ctx(0.0, 0), &mut events);
        assert_eq!(craft.trail.len(), 1);
        assert_eq!(craft.trail[0], Vec2::new(130.0, 400.0));

        for _ in 0..100 {
            craft.update(&ctx(0.0, 0), &mut events);
        }
        assert_eq!(craft.trail.len(), TRAIL_CAPACITY);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let viewport = Viewport::new(1000.0, 800.0);
        let mut craft = Craft::new(viewport);
        let mut events = Vec::new();
        for _ in 0..10 {
            craft.update(&ctx(1.0, 2), &mut events);
        }
        craft.reset(viewport);
        assert_eq!(craft.pos, Craft::start_position(viewport));
        assert_eq!(craft.velocity, 0.0);
        assert_eq!(craft.rotation, 0.0);
        assert!(craft.trail.is_empty());
    }

    #[test]
    fn test_render_emits_hull_and_thrusters() {
        let mut craft = Craft::new(Viewport::new(1000.0, 800.0));
        let mut events = Vec::new();
        for _ in 0..6 {
            craft.update(&ctx(0.0, 0), &mut events);
        }
        let mut surface = RecordingSurface::new();
        craft.render(&ctx(0.0, 0), &mut surface);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Polygon { .. })), 3);
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Line { .. })), 2);
    }
}
