//! Axis-aligned collision tests
//!
//! Everything in Neon Glider collides as rectangles: the craft's reduced
//! hitbox against the solid regions above and below each gap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (y grows downward, like the canvas)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect of the given size centered on a point
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict horizontal span overlap (touching edges do not count)
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.x < right && self.right() > left
    }
}

/// Which solid part of a gap obstacle was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapHit {
    Top,
    Bottom,
}

/// Test a hitbox against a gap obstacle occupying `[left, left + width)`
/// horizontally, solid above `gap_top` and below `gap_top + gap_size`.
///
/// The solid regions extend past the viewport, so only the gap edges matter.
pub fn hitbox_vs_gap(
    hitbox: &Rect,
    left: f32,
    width: f32,
    gap_top: f32,
    gap_size: f32,
) -> Option<GapHit> {
    if !hitbox.overlaps_x(left, left + width) {
        return None;
    }
    if hitbox.y < gap_top {
        Some(GapHit::Top)
    } else if hitbox.bottom() > gap_top + gap_size {
        Some(GapHit::Bottom)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), 16.0, 12.0);
        assert_eq!(r, Rect::new(92.0, 44.0, 16.0, 12.0));
        assert_eq!(r.right(), 108.0);
        assert_eq!(r.bottom(), 56.0);
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps_x(10.0, 20.0));
        assert!(!a.overlaps_x(-10.0, 0.0));
        assert!(a.overlaps_x(9.5, 19.5));
    }

    #[test]
    fn test_hitbox_inside_gap_is_safe() {
        let hitbox = Rect::new(100.0, 300.0, 16.0, 12.0);
        assert_eq!(hitbox_vs_gap(&hitbox, 95.0, 60.0, 250.0, 200.0), None);
    }

    #[test]
    fn test_hitbox_clipping_top_and_bottom() {
        let high = Rect::new(100.0, 245.0, 16.0, 12.0);
        assert_eq!(hitbox_vs_gap(&high, 95.0, 60.0, 250.0, 200.0), Some(GapHit::Top));

        let low = Rect::new(100.0, 445.0, 16.0, 12.0);
        assert_eq!(hitbox_vs_gap(&low, 95.0, 60.0, 250.0, 200.0), Some(GapHit::Bottom));
    }

    #[test]
    fn test_no_hit_without_horizontal_overlap() {
        let hitbox = Rect::new(0.0, 0.0, 16.0, 12.0);
        assert_eq!(hitbox_vs_gap(&hitbox, 16.0, 60.0, 250.0, 200.0), None);
    }
}
