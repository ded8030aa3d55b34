//! Filled canvas shapes. Ratatui ships outline-only `Rectangle` and
//! `Circle`; the game draws solid tiles and discs, so these raster-scan
//! their bounding box and light every braille dot inside the shape.

use ratatui::{
    style::Color,
    widgets::canvas::{Painter, Shape},
};

/// Sub-pixel sampling step; half a canvas unit is finer than the braille
/// dot pitch at the bounds this crate uses, so no dot inside a shape is
/// skipped.
const SAMPLE_STEP: f64 = 0.5;

/// A filled axis-aligned rectangle covering `[x, x + width) x [y, y + height)`
/// in canvas coordinates.
#[derive(Debug, Clone)]
pub struct FilledRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: Color,
}

impl Shape for FilledRect {
    fn draw(&self, painter: &mut Painter) {
        let mut y = self.y;
        while y < self.y + self.height {
            let mut x = self.x;
            while x < self.x + self.width {
                if let Some((px, py)) = painter.get_point(x, y) {
                    painter.paint(px, py, self.color);
                }
                x += SAMPLE_STEP;
            }
            y += SAMPLE_STEP;
        }
    }
}

/// A filled disc centered on (x, y) in canvas coordinates
#[derive(Debug, Clone)]
pub struct FilledCircle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Color,
}

impl Shape for FilledCircle {
    fn draw(&self, painter: &mut Painter) {
        let r2 = self.radius * self.radius;
        let mut dy = -self.radius;
        while dy <= self.radius {
            let mut dx = -self.radius;
            while dx <= self.radius {
                if dx * dx + dy * dy <= r2 {
                    if let Some((px, py)) = painter.get_point(self.x + dx, self.y + dy) {
                        painter.paint(px, py, self.color);
                    }
                }
                dx += SAMPLE_STEP;
            }
            dy += SAMPLE_STEP;
        }
    }
}
