//! Shared capability for simulated, drawable things

use super::events::GameEvent;
use super::levels::Tier;
use crate::Viewport;
use crate::renderer::Surface;

/// Per-frame inputs every entity sees
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Frame delta in 60 Hz frames
    pub dt: f32,
    /// Running frame counter (incremented before entities update)
    pub frame: u64,
    /// Active difficulty tier
    pub tier: &'static Tier,
    pub viewport: Viewport,
}

/// Update / render / reset capability, implemented by `Craft` and `Obstacle`
pub trait Entity {
    /// Advance one frame; notifications go into `events`
    fn update(&mut self, ctx: &FrameContext, events: &mut Vec<GameEvent>);
    /// Emit drawing commands for the current state
    fn render(&self, ctx: &FrameContext, surface: &mut dyn Surface);
    /// Return to the initial state for the given viewport
    fn reset(&mut self, viewport: Viewport);
}
