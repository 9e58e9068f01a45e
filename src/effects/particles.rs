//! Jump bursts and explosions

use std::collections::VecDeque;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::{Color, DrawCommand, Surface};

/// Default capacity; the oldest particle is recycled beyond it
pub const MAX_PARTICLES: usize = 200;

/// Life lost per rendered frame
const LIFE_DECAY: f32 = 0.02;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// 1.0 at birth, removed at 0
    pub life: f32,
    pub size: f32,
}

/// Bounded particle pool, oldest first
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    capacity: usize,
    rng: Pcg32,
}

impl ParticleSystem {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            particles: VecDeque::with_capacity(capacity),
            capacity,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Change the cap; excess particles are dropped oldest first
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.particles.len() > capacity {
            self.particles.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Emit `count` particles in random directions at up to `4 * speed`
    pub fn create(&mut self, pos: Vec2, count: usize, color: Color, speed: f32) {
        if self.capacity == 0 {
            return;
        }
        for _ in 0..count {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let magnitude = self.rng.random::<f32>() * 4.0 * speed;
            let particle = Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * magnitude,
                color,
                life: 1.0,
                size: self.rng.random::<f32>() * 3.0 + 1.0,
            };

            if self.particles.len() >= self.capacity {
                self.particles.pop_front();
            }
            self.particles.push_back(particle);
        }
    }

    /// Small burst behind the craft on every impulse
    pub fn jump_burst(&mut self, pos: Vec2, color: Color) {
        self.create(pos, 8, Color::WHITE, 1.5);
        self.create(pos, 5, color, 2.0);
    }

    /// Large burst where the craft was destroyed
    pub fn explosion(&mut self, pos: Vec2, color: Color) {
        self.create(pos, 40, color, 4.0);
        self.create(pos, 30, Color::WHITE, 2.0);
        self.create(pos, 20, Color::EMBER, 3.0);
    }

    /// Move, fade and draw every particle. Runs once per rendered frame,
    /// independent of the frame delta.
    pub fn update_and_render(&mut self, surface: &mut dyn Surface) {
        self.particles.retain_mut(|p| {
            p.pos += p.vel;
            p.life -= LIFE_DECAY;
            p.life > 0.0
        });

        for p in &self.particles {
            surface.draw(DrawCommand::Circle {
                center: p.pos,
                radius: p.size,
                color: p.color,
                alpha: p.life,
            });
        }
    }

    pub fn has_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(MAX_PARTICLES, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;

    #[test]
    fn test_jump_burst_counts() {
        let mut ps = ParticleSystem::default();
        ps.jump_burst(Vec2::new(10.0, 20.0), Color::hex(0x4ade80));
        assert_eq!(ps.len(), 13);
        assert_eq!(ps.iter().filter(|p| p.color == Color::WHITE).count(), 8);
        assert!(ps.iter().all(|p| p.pos == Vec2::new(10.0, 20.0)));
        assert!(ps.iter().all(|p| p.vel.length() <= 8.0 + 1e-4));
        assert!(ps.iter().all(|p| (1.0..4.0).contains(&p.size)));
    }

    #[test]
    fn test_capacity_recycles_oldest() {
        let mut ps = ParticleSystem::default();
        ps.explosion(Vec2::ZERO, Color::hex(0xef4444));
        assert_eq!(ps.len(), 90);
        ps.explosion(Vec2::ZERO, Color::hex(0xef4444));
        ps.explosion(Vec2::new(5.0, 5.0), Color::hex(0xef4444));
        assert_eq!(ps.len(), MAX_PARTICLES);
        // The newest particles are the last explosion's embers
        assert_eq!(ps.iter().last().map(|p| p.color), Some(Color::EMBER));
        assert_eq!(ps.iter().last().map(|p| p.pos), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_particles_fade_out_after_about_fifty_frames() {
        let mut ps = ParticleSystem::default();
        let mut surface = RecordingSurface::new();
        ps.jump_burst(Vec2::ZERO, Color::WHITE);

        ps.update_and_render(&mut surface);
        assert_eq!(surface.commands.len(), 13);
        assert!(ps.has_active());

        for _ in 0..48 {
            ps.update_and_render(&mut surface);
        }
        assert!(ps.has_active());

        ps.update_and_render(&mut surface);
        ps.update_and_render(&mut surface);
        assert!(!ps.has_active());
    }

    #[test]
    fn test_zero_capacity_emits_nothing() {
        let mut ps = ParticleSystem::new(0, 1);
        ps.explosion(Vec2::ZERO, Color::WHITE);
        assert!(ps.is_empty());

        let mut ps = ParticleSystem::default();
        ps.explosion(Vec2::ZERO, Color::WHITE);
        ps.set_capacity(10);
        assert_eq!(ps.len(), 10);
        ps.clear();
        assert!(!ps.has_active());
    }
}
