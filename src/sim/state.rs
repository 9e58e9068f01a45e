//! Game state and session lifecycle
//!
//! Everything the simulation mutates per frame lives in [`GameState`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::craft::Craft;
use super::entity::{Entity, FrameContext};
use super::events::{CollisionCause, GameEvent};
use super::levels::{Tier, tier, tier_for_score};
use super::obstacle::{ObstacleStream, StreamOutcome};
use crate::Viewport;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first action; nothing moves
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by a collision
    Ended,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pub viewport: Viewport,
    pub phase: GamePhase,
    pub craft: Craft,
    pub obstacles: ObstacleStream,
    /// Obstacles passed this run
    pub score: u32,
    /// Index into the tier table; only grows within a run
    pub tier_index: usize,
    /// Frames simulated this run
    pub time_ticks: u64,
    /// What ended the run, once it has ended
    pub collision: Option<CollisionCause>,
    /// Notifications not yet handed to the dispatcher
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game with the craft at its starting position
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            viewport,
            phase: GamePhase::Idle,
            craft: Craft::new(viewport),
            obstacles: ObstacleStream::new(),
            score: 0,
            tier_index: 0,
            time_ticks: 0,
            collision: None,
            events: Vec::new(),
        }
    }

    pub fn tier(&self) -> &'static Tier {
        tier(self.tier_index)
    }

    /// Per-frame context for entity updates and rendering
    pub fn frame_context(&self, dt: f32) -> FrameContext {
        FrameContext {
            dt,
            frame: self.time_ticks,
            tier: self.tier(),
            viewport: self.viewport,
        }
    }

    /// Reset every run-scoped value to its initial state (phase untouched)
    pub fn reset(&mut self) {
        self.craft.reset(self.viewport);
        self.obstacles.reset();
        self.score = 0;
        self.tier_index = 0;
        self.time_ticks = 0;
        self.collision = None;
    }

    /// Begin a run from Idle or Ended: full reset plus the opening impulse
    pub fn start(&mut self) {
        self.reset();
        self.phase = GamePhase::Running;
        let tier = self.tier();
        self.craft.apply_impulse(tier, &mut self.events);
        log::info!("Run started (seed {})", self.seed);
    }

    /// End the run. Only the first collision while running counts.
    pub fn end(&mut self, cause: CollisionCause) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Ended;
        self.collision = Some(cause);
        self.events.push(GameEvent::Collide { cause });
        log::info!("Run ended by {:?} with score {}", cause, self.score);
        true
    }

    /// Add one point and advance the tier if a threshold was reached
    pub fn add_point(&mut self) {
        self.score += 1;
        self.events.push(GameEvent::ScoreChanged { score: self.score });

        let next = tier_for_score(self.score);
        if next != self.tier_index {
            self.tier_index = next;
            self.events.push(GameEvent::TierChanged { tier: next });
            log::info!("Tier up: {} at score {}", self.tier().name, self.score);
        }
    }

    /// Apply an upward impulse (only while running)
    pub fn impulse(&mut self) {
        if self.phase == GamePhase::Running {
            let tier = self.tier();
            self.craft.apply_impulse(tier, &mut self.events);
        }
    }

    /// Track a new viewport size. An idle craft is re-centered.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.phase == GamePhase::Idle {
            self.craft.reset(viewport);
        }
    }

    /// Spawn, move, collide and score the obstacle stream for one frame
    pub(crate) fn advance_obstacles(
        &mut self,
        ctx: &FrameContext,
        hitbox: &Rect,
        craft_x: f32,
        signals: &mut Vec<GameEvent>,
    ) -> StreamOutcome {
        self.obstacles
            .advance(ctx, hitbox, craft_x, &mut self.rng, signals)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every queued notification, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
