//! Canvas 2D backend for [`Surface`]

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, DrawCommand, Surface};
use crate::Viewport;
use crate::sim::Rect;

/// Draws commands straight into a `<canvas>` 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Look up the canvas by id and acquire its 2D context
    pub fn from_element_id(id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no element #{}", id)))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", id)))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the viewport
    pub fn resize(&mut self, viewport: Viewport) {
        self.canvas.set_width(viewport.width as u32);
        self.canvas.set_height(viewport.height as u32);
    }

    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn path(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.x as f64, first.y as f64);
            for p in rest {
                self.ctx.line_to(p.x as f64, p.y as f64);
            }
        }
        self.ctx.close_path();
    }

    /// Rounded rect path; radii are top-left, top-right, bottom-right, bottom-left
    fn round_rect_path(&self, rect: &Rect, radii: [f32; 4]) {
        let (x, y, w, h) = (
            rect.x as f64,
            rect.y as f64,
            rect.width as f64,
            rect.height as f64,
        );
        let [tl, tr, br, bl] = radii.map(|r| (r as f64).min(w / 2.0).min(h / 2.0));
        let ctx = &self.ctx;
        ctx.begin_path();
        ctx.move_to(x + tl, y);
        ctx.line_to(x + w - tr, y);
        ctx.quadratic_curve_to(x + w, y, x + w, y + tr);
        ctx.line_to(x + w, y + h - br);
        ctx.quadratic_curve_to(x + w, y + h, x + w - br, y + h);
        ctx.line_to(x + bl, y + h);
        ctx.quadratic_curve_to(x, y + h, x, y + h - bl);
        ctx.line_to(x, y + tl);
        ctx.quadratic_curve_to(x, y, x + tl, y);
        ctx.close_path();
    }

    fn fill_style(&self, color: Color, alpha: f32) {
        self.ctx.set_fill_style_str(&color.css(alpha));
    }
}

impl Surface for CanvasSurface {
    fn draw(&mut self, command: DrawCommand) {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear => {
                ctx.clear_rect(0.0, 0.0, self.width(), self.height());
            }
            DrawCommand::VerticalGradient { rect, top, bottom } => {
                let gradient = ctx.create_linear_gradient(
                    0.0,
                    rect.y as f64,
                    0.0,
                    rect.bottom() as f64,
                );
                let _ = gradient.add_color_stop(0.0, &top.css(1.0));
                let _ = gradient.add_color_stop(1.0, &bottom.css(1.0));
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(
                    rect.x as f64,
                    rect.y as f64,
                    rect.width as f64,
                    rect.height as f64,
                );
            }
            DrawCommand::FillRect { rect, color, alpha } => {
                self.fill_style(color, alpha);
                ctx.fill_rect(
                    rect.x as f64,
                    rect.y as f64,
                    rect.width as f64,
                    rect.height as f64,
                );
            }
            DrawCommand::RoundRect {
                rect,
                radii,
                fill,
                fill_alpha,
                stroke,
                line_width,
                glow,
            } => {
                ctx.save();
                self.round_rect_path(&rect, radii);
                self.fill_style(fill, fill_alpha);
                ctx.fill();
                ctx.set_shadow_blur(glow as f64);
                ctx.set_shadow_color(&stroke.css(1.0));
                ctx.set_stroke_style_str(&stroke.css(1.0));
                ctx.set_line_width(line_width as f64);
                ctx.stroke();
                ctx.restore();
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
                alpha,
            } => {
                self.fill_style(color, alpha);
                ctx.begin_path();
                let _ = ctx.arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU);
                ctx.fill();
            }
            DrawCommand::Ellipse {
                center,
                radii,
                rotation,
                color,
            } => {
                self.fill_style(color, 1.0);
                ctx.begin_path();
                let _ = ctx.ellipse(
                    center.x as f64,
                    center.y as f64,
                    radii.x as f64,
                    radii.y as f64,
                    rotation as f64,
                    0.0,
                    TAU,
                );
                ctx.fill();
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color,
                alpha,
            } => {
                ctx.set_stroke_style_str(&color.css(alpha));
                ctx.set_line_width(width as f64);
                ctx.set_line_cap("round");
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCommand::Polygon {
                points,
                color,
                glow,
            } => {
                ctx.save();
                if let Some((glow_color, blur)) = glow {
                    ctx.set_shadow_blur(blur as f64);
                    ctx.set_shadow_color(&glow_color.css(1.0));
                }
                self.path(&points);
                self.fill_style(color, 1.0);
                ctx.fill();
                ctx.restore();
            }
        }
    }
}
