//! Game notifications and the dispatcher that delivers them
//!
//! The simulation only *queues* events; the frame loop drains the queue after
//! each tick and hands every event to the subscribers registered on its
//! [`EventDispatcher`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::renderer::Color;

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionCause {
    /// Craft left the vertical play bounds
    Boundary,
    /// Craft hitbox overlapped an obstacle's solid region
    Obstacle,
}

/// Notifications emitted by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An upward impulse was applied (position is the exhaust point)
    Jump { pos: Vec2, color: Color },
    /// The craft collided
    Collide { cause: CollisionCause },
    /// Score changed to a new total
    ScoreChanged { score: u32 },
    /// Active tier changed
    TierChanged { tier: usize },
}

/// Handle returned by [`EventDispatcher::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Ordered list of event handlers owned by the game loop
#[derive(Default)]
pub struct EventDispatcher {
    handlers: Vec<(SubscriptionId, Handler)>,
    next_id: u32,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; handlers run in subscription order
    pub fn subscribe(&mut self, handler: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn dispatch(&mut self, event: &GameEvent) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }

    /// Drop every handler (teardown)
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
