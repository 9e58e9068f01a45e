//! Neon Glider - A side-scrolling arcade glider
//!
//! Core modules:
//! - `sim`: Simulation (craft physics, obstacle stream, levels, game state)
//! - `game`: Frame loop and Idle/Running/Ended state machine
//! - `effects`: Cosmetic particles and starfield background
//! - `renderer`: Immediate-mode 2D drawing commands
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `platform`: Browser scheduler and viewport glue

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod audio_gate;
pub mod effects;
pub mod game;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::Game;
pub use highscores::HighScore;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Display cadence the simulation is normalized to (dt == 1 at 60 Hz)
    pub const BASELINE_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest frame delta fed to the simulation (in 60 Hz frames)
    pub const MAX_FRAME_DT: f32 = 4.0;

    /// Craft sprite size (visual)
    pub const CRAFT_WIDTH: f32 = 30.0;
    pub const CRAFT_HEIGHT: f32 = 20.0;
    /// Collision hitbox, smaller than the sprite for forgiveness
    pub const HITBOX_WIDTH: f32 = 16.0;
    pub const HITBOX_HEIGHT: f32 = 12.0;
    /// Craft starts at this fraction of the viewport width
    pub const CRAFT_START_X_FRACTION: f32 = 0.15;
    /// Trail ring size, sampled every other frame
    pub const TRAIL_CAPACITY: usize = 20;
    pub const TRAIL_OFFSET: f32 = 20.0;
    /// Rotation easing
    pub const ROTATION_PER_VELOCITY: f32 = 0.08;
    pub const ROTATION_EASE_RATE: f32 = 0.15;
    pub const ROTATION_MIN: f32 = -std::f32::consts::FRAC_PI_3;
    pub const ROTATION_MAX: f32 = std::f32::consts::FRAC_PI_4;

    /// Obstacle geometry
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    /// Horizontal distance between consecutive obstacles
    pub const OBSTACLE_SPACING: f32 = 350.0;
    /// Minimum solid height above/below a freshly spawned gap
    pub const SPAWN_MARGIN: f32 = 50.0;
    /// Oscillating gaps are kept this far from the viewport edges
    pub const OSCILLATION_MARGIN: f32 = 30.0;
    /// Obstacles are discarded once this far past the left edge
    pub const OFFSCREEN_BUFFER: f32 = 100.0;
}

/// Default viewport used before the platform reports a real size
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

/// Size of the drawing surface the simulation plays on
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        DEFAULT_VIEWPORT
    }
}
