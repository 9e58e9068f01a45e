//! Starfield, tier gradient and tech grid

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Viewport;
use crate::renderer::{Color, DrawCommand, Surface};
use crate::sim::{Rect, tier};

/// Distance of the grid lines from the top and bottom edges
const GRID_INSET: f32 = 150.0;
/// Share of the tier scroll speed added to every star
const PARALLAX: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// Scrolling backdrop. Follows the active tier through
/// [`Background::set_tier`].
#[derive(Debug, Clone)]
pub struct Background {
    stars: Vec<Star>,
    star_count: usize,
    tier_index: usize,
    viewport: Viewport,
    frames: u64,
    rng: Pcg32,
}

impl Background {
    pub fn new(viewport: Viewport, star_count: usize, seed: u64) -> Self {
        let mut background = Self {
            stars: Vec::with_capacity(star_count),
            star_count,
            tier_index: 0,
            viewport,
            frames: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        background.scatter_stars();
        background
    }

    fn scatter_stars(&mut self) {
        let Viewport { width, height } = self.viewport;
        self.stars = (0..self.star_count)
            .map(|_| Star {
                pos: Vec2::new(
                    self.rng.random::<f32>() * width,
                    self.rng.random::<f32>() * height,
                ),
                size: self.rng.random::<f32>() * 2.0,
                speed: self.rng.random::<f32>() * 0.8 + 0.2,
            })
            .collect();
    }

    pub fn set_tier(&mut self, tier_index: usize) {
        self.tier_index = tier_index;
    }

    pub fn tier_index(&self) -> usize {
        self.tier_index
    }

    /// New viewport: stars are scattered afresh over it
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scatter_stars();
    }

    /// Change the star count (quality preset)
    pub fn set_star_count(&mut self, star_count: usize) {
        self.star_count = star_count;
        self.scatter_stars();
    }

    /// Scroll stars leftward while a run is in progress, wrapping at the left
    /// edge. Advances once per rendered frame.
    pub fn update(&mut self, is_playing: bool) {
        self.frames += 1;
        if !is_playing {
            return;
        }

        let drift = tier(self.tier_index).speed * PARALLAX;
        let width = self.viewport.width;
        for star in &mut self.stars {
            star.pos.x -= star.speed + drift;
            if star.pos.x < 0.0 {
                star.pos.x = width;
            }
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        let Viewport { width, height } = self.viewport;
        let (top, bottom) = tier(self.tier_index).background;
        surface.draw(DrawCommand::VerticalGradient {
            rect: Rect::new(0.0, 0.0, width, height),
            top,
            bottom,
        });

        for star in &self.stars {
            surface.draw(DrawCommand::Circle {
                center: star.pos,
                radius: star.size,
                color: Color::WHITE,
                alpha: 0.4,
            });
        }

        for y in [GRID_INSET, height - GRID_INSET] {
            surface.draw(DrawCommand::Line {
                from: Vec2::new(0.0, y),
                to: Vec2::new(width, y),
                width: 1.0,
                color: Color::WHITE,
                alpha: 0.08,
            });
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}
