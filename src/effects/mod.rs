//! Cosmetic effects
//!
//! Nothing here affects gameplay. Effects draw their own randomness from a
//! separate RNG so they never perturb the simulation's seeded stream.

pub mod background;
pub mod particles;

pub use background::{Background, Star};
pub use particles::{Particle, ParticleSystem};
