//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Frame deltas supplied by the caller
//! - Stable iteration order (oldest obstacle first)
//! - No platform dependencies; rendering only through [`crate::renderer::Surface`]

pub mod clock;
pub mod collision;
pub mod craft;
pub mod entity;
pub mod events;
pub mod levels;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use clock::{FixedStepScheduler, Scheduler, frame_delta};
pub use collision::{GapHit, Rect, hitbox_vs_gap};
pub use craft::Craft;
pub use entity::{Entity, FrameContext};
pub use events::{CollisionCause, EventDispatcher, GameEvent, SubscriptionId};
pub use levels::{THRESHOLDS, TIERS, Threshold, Tier, tier, tier_for_score};
pub use obstacle::{Obstacle, ObstacleStream, StreamOutcome};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
