//! Gap obstacles and the stream that spawns, moves, scores and culls them

use rand::Rng;

use super::collision::{Rect, hitbox_vs_gap};
use super::entity::{Entity, FrameContext};
use super::events::{CollisionCause, GameEvent};
use super::levels::{Tier, oscillation_band};
use crate::Viewport;
use crate::consts::*;
use crate::renderer::{Color, DrawCommand, Surface, shapes};

/// A pair of solid regions with a passable vertical gap
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Top of the passable gap
    pub gap_top: f32,
    pub gap_size: f32,
    pub width: f32,
    /// Set once, when the trailing edge falls behind the craft
    pub passed: bool,
    pub oscillates: bool,
    /// Oscillation phase offset in radians
    pub phase: f32,
    /// Gap top the oscillation is centered on
    pub base_gap_top: f32,
}

impl Obstacle {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Oscillate, then keep the gap on screen
    fn oscillate(&mut self, frame: u64, tier_index: usize, viewport_height: f32) {
        let (rate, amplitude) = oscillation_band(tier_index);
        self.gap_top = self.base_gap_top + (frame as f32 * rate + self.phase).sin() * amplitude;

        let max = viewport_height - self.gap_size - OSCILLATION_MARGIN;
        if self.gap_top < OSCILLATION_MARGIN {
            self.gap_top = OSCILLATION_MARGIN;
        }
        if self.gap_top > max {
            self.gap_top = max;
        }
    }

    /// Whether the hitbox overlaps either solid region
    pub fn hits(&self, hitbox: &Rect) -> bool {
        hitbox_vs_gap(hitbox, self.x, self.width, self.gap_top, self.gap_size).is_some()
    }
}

impl Entity for Obstacle {
    fn update(&mut self, ctx: &FrameContext, _events: &mut Vec<GameEvent>) {
        self.x -= ctx.tier.speed * ctx.dt;
        if self.oscillates {
            self.oscillate(ctx.frame, ctx.tier.index, ctx.viewport.height);
        }
    }

    fn render(&self, ctx: &FrameContext, surface: &mut dyn Surface) {
        let pipes = [
            (shapes::upper_pipe(self.x, self.width, self.gap_top), [0.0, 0.0, 8.0, 8.0]),
            (
                shapes::lower_pipe(
                    self.x,
                    self.width,
                    self.gap_top,
                    self.gap_size,
                    ctx.viewport.height,
                ),
                [8.0, 8.0, 0.0, 0.0],
            ),
        ];
        for (rect, radii) in pipes {
            surface.draw(DrawCommand::RoundRect {
                rect,
                radii,
                fill: Color::HULL,
                fill_alpha: 0.9,
                stroke: ctx.tier.color,
                line_width: 3.0,
                glow: 15.0,
            });
        }
        for rect in shapes::pipe_vents(self.x, self.gap_top, self.gap_size) {
            surface.draw(DrawCommand::FillRect {
                rect,
                color: ctx.tier.color,
                alpha: 0.3,
            });
        }
    }

    fn reset(&mut self, _viewport: Viewport) {
        self.gap_top = self.base_gap_top;
        self.passed = false;
    }
}

/// What happened to the stream during one advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Obstacles newly passed this frame
    pub passed: u32,
    /// Whether any obstacle overlapped the hitbox
    pub collided: bool,
}

/// Ordered obstacles, oldest (leftmost) first
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    pub obstacles: Vec<Obstacle>,
    /// Frames since the last spawn
    pub spawn_timer: f32,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames between spawns so on-screen spacing is constant at any speed
    pub fn spawn_interval(tier: &Tier) -> f32 {
        OBSTACLE_SPACING / tier.speed
    }

    /// Spawn one obstacle at the right edge with a random gap that stays
    /// [`SPAWN_MARGIN`] away from the top and bottom.
    pub fn spawn<R: Rng>(&mut self, tier: &Tier, viewport: Viewport, rng: &mut R) {
        let min = SPAWN_MARGIN as i32;
        let max = (viewport.height - SPAWN_MARGIN - tier.gap_size) as i32;
        let gap_top = if max > min { rng.random_range(min..=max) } else { min };
        let gap_top = gap_top as f32;
        let phase = rng.random::<f32>() * std::f32::consts::TAU;

        log::debug!("Spawned obstacle: gap_top={}, gap={}", gap_top, tier.gap_size);

        self.obstacles.push(Obstacle {
            x: viewport.width,
            gap_top,
            gap_size: tier.gap_size,
            width: OBSTACLE_WIDTH,
            passed: false,
            oscillates: tier.oscillates,
            phase,
            base_gap_top: gap_top,
        });
    }

    /// Spawn on the timer, move every obstacle, then test collision and
    /// scoring against the craft. Fully off-screen obstacles are dropped.
    pub fn advance<R: Rng>(
        &mut self,
        ctx: &FrameContext,
        hitbox: &Rect,
        craft_x: f32,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> StreamOutcome {
        self.spawn_timer += ctx.dt;
        if self.spawn_timer > Self::spawn_interval(ctx.tier) {
            self.spawn_timer = 0.0;
            self.spawn(ctx.tier, ctx.viewport, rng);
        }

        let mut outcome = StreamOutcome::default();
        for obstacle in &mut self.obstacles {
            obstacle.update(ctx, events);

            if obstacle.hits(hitbox) {
                outcome.collided = true;
            }

            if !obstacle.passed && obstacle.right() < craft_x {
                obstacle.passed = true;
                outcome.passed += 1;
            }
        }
        if outcome.collided {
            events.push(GameEvent::Collide {
                cause: CollisionCause::Obstacle,
            });
        }

        self.obstacles.retain(|o| o.x >= -OFFSCREEN_BUFFER);
        outcome
    }

    pub fn render(&self, ctx: &FrameContext, surface: &mut dyn Surface) {
        for obstacle in &self.obstacles {
            obstacle.render(ctx, surface);
        }
    }

    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.spawn_timer = 0.0;
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }
}
