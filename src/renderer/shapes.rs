//! Shape generation for 2D primitives

use std::collections::VecDeque;

use glam::{Mat2, Vec2};

use crate::sim::Rect;

/// Craft hull outline in local space (nose pointing +x)
const HULL: [Vec2; 8] = [
    Vec2::new(20.0, 0.0),
    Vec2::new(-10.0, 8.0),
    Vec2::new(-15.0, 15.0),
    Vec2::new(-15.0, 5.0),
    Vec2::new(-20.0, 0.0),
    Vec2::new(-15.0, -5.0),
    Vec2::new(-15.0, -15.0),
    Vec2::new(-10.0, -8.0),
];

/// Rotate local points by `rotation` and move them to `pos`
pub fn transform(points: &[Vec2], pos: Vec2, rotation: f32) -> Vec<Vec2> {
    let rot = Mat2::from_angle(rotation);
    points.iter().map(|p| pos + rot * *p).collect()
}

/// World-space hull polygon
pub fn craft_hull(pos: Vec2, rotation: f32) -> Vec<Vec2> {
    transform(&HULL, pos, rotation)
}

/// One exhaust flame; `side` is +1 for the upper engine, -1 for the lower
pub fn thruster(pos: Vec2, rotation: f32, side: f32, flicker: f32) -> Vec<Vec2> {
    let local = [
        Vec2::new(-15.0, 5.0 * side),
        Vec2::new(-22.0 - flicker, 5.0 * side),
        Vec2::new(-15.0, 8.0 * side),
    ];
    transform(&local, pos, rotation)
}

/// Flame length jitter in [0, 4), stable for a given frame
pub fn thruster_flicker(frame: u64) -> f32 {
    let hash = (frame as u32).wrapping_mul(2654435761);
    (hash % 1000) as f32 / 1000.0 * 4.0
}

/// Trail line segments `(from, to, width, alpha)`, fading toward the tail.
pub fn trail_segments(trail: &VecDeque<Vec2>) -> Vec<(Vec2, Vec2, f32, f32)> {
    if trail.len() < 2 {
        return Vec::new();
    }
    let len = trail.len() as f32;
    trail
        .iter()
        .zip(trail.iter().skip(1))
        .enumerate()
        .map(|(i, (p1, p2))| {
            let t = i as f32 / len;
            (*p1, *p2, 1.0 + t * 6.0, t * 0.6)
        })
        .collect()
}

/// Solid region above a gap, extending past the top of the viewport
pub fn upper_pipe(x: f32, width: f32, gap_top: f32) -> Rect {
    Rect::new(x, -100.0, width, gap_top + 100.0)
}

/// Solid region below a gap, extending past the bottom of the viewport
pub fn lower_pipe(x: f32, width: f32, gap_top: f32, gap_size: f32, viewport_height: f32) -> Rect {
    Rect::new(x, gap_top + gap_size, width, viewport_height + 100.0)
}

/// Decorative vent slats drawn just inside each pipe mouth
pub fn pipe_vents(x: f32, gap_top: f32, gap_size: f32) -> [Rect; 4] {
    [
        Rect::new(x + 10.0, gap_top - 30.0, 40.0, 6.0),
        Rect::new(x + 10.0, gap_top - 15.0, 40.0, 6.0),
        Rect::new(x + 10.0, gap_top + gap_size + 10.0, 40.0, 6.0),
        Rect::new(x + 10.0, gap_top + gap_size + 25.0, 40.0, 6.0),
    ]
}
