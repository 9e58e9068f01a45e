//! 2D rendering module
//!
//! The simulation never touches a window-system resource. Every frame it emits
//! immediate-mode [`DrawCommand`]s into a [`Surface`]; the browser build backs
//! that with a canvas 2D context, tests record the commands.

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::CanvasSurface;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Rect;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const EMBER: Color = Color::hex(0xffaa00);
    /// Obstacle body fill
    pub const HULL: Color = Color::hex(0x0f172a);
    pub const COCKPIT: Color = Color::hex(0x111111);

    /// Build a color from a 0xRRGGBB literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// CSS color string with the given alpha
    pub fn css(&self, alpha: f32) -> String {
        if alpha >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.3})",
                self.r,
                self.g,
                self.b,
                alpha.clamp(0.0, 1.0)
            )
        }
    }
}

/// One immediate-mode drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole surface
    Clear,
    /// Fill a rect with a top-to-bottom gradient
    VerticalGradient { rect: Rect, top: Color, bottom: Color },
    /// Flat filled rectangle
    FillRect { rect: Rect, color: Color, alpha: f32 },
    /// Rounded rectangle with fill and glowing outline.
    /// Radii are top-left, top-right, bottom-right, bottom-left.
    RoundRect {
        rect: Rect,
        radii: [f32; 4],
        fill: Color,
        fill_alpha: f32,
        stroke: Color,
        line_width: f32,
        glow: f32,
    },
    /// Filled circle
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    /// Filled axis-rotated ellipse
    Ellipse {
        center: Vec2,
        radii: Vec2,
        rotation: f32,
        color: Color,
    },
    /// Straight line with round caps
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
        alpha: f32,
    },
    /// Closed filled polygon, optionally glowing
    Polygon {
        points: Vec<Vec2>,
        color: Color,
        glow: Option<(Color, f32)>,
    },
}

/// A drawing target
pub trait Surface {
    fn draw(&mut self, command: DrawCommand);
}

/// Surface that keeps every command, for tests and debugging
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything recorded so far
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands matching a predicate
    pub fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for RecordingSurface {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_and_css() {
        let c = Color::hex(0x4ade80);
        assert_eq!((c.r, c.g, c.b), (0x4a, 0xde, 0x80));
        assert_eq!(c.css(1.0), "#4ade80");
        assert_eq!(Color::WHITE.css(0.5), "rgba(255, 255, 255, 0.500)");
    }

    #[test]
    fn test_recording_surface_counts() {
        let mut surface = RecordingSurface::new();
        surface.draw(DrawCommand::Clear);
        surface.draw(DrawCommand::Circle {
            center: Vec2::ZERO,
            radius: 1.0,
            color: Color::WHITE,
            alpha: 1.0,
        });
        assert_eq!(surface.count(|c| matches!(c, DrawCommand::Circle { .. })), 1);
        surface.clear();
        assert!(surface.commands.is_empty());
    }
}
