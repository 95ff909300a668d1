//! [`Canvas`] implementation for the pixel framebuffer.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

use super::font::draw_text;
use super::primitives::{draw_disc, draw_thick_line, fill_polygon};
use super::{Canvas, PointShape, TextStyle};

impl Canvas for Framebuffer {
    fn width(&self) -> u32 {
        Framebuffer::width(self)
    }

    fn height(&self) -> u32 {
        Framebuffer::height(self)
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let (x0, y0) = (x.min(x + w), y.min(y + h));
        let (x1, y1) = (x.max(x + w), y.max(y + h));
        let left = x0.round().max(0.0);
        let top = y0.round().max(0.0);
        let right = x1.round().max(0.0);
        let bottom = y1.round().max(0.0);
        if right > left && bottom > top {
            Framebuffer::fill_rect(
                self,
                left as u32,
                top as u32,
                (right - left) as u32,
                (bottom - top) as u32,
                color,
            );
        }
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba, width: f32) {
        draw_thick_line(self, (x0, y0), (x1, y1), width, color);
    }

    fn marker(&mut self, x: f32, y: f32, radius: f32, shape: PointShape, color: Rgba) {
        if let Some(outline) = shape.polygon(x, y, radius) {
            fill_polygon(self, &outline, color);
        } else if shape == PointShape::Circle {
            draw_disc(self, x, y, radius, color);
        } else {
            let stroke = (radius / 3.0).max(1.5);
            for [a, b] in shape.strokes(x, y, radius) {
                draw_thick_line(self, a, b, stroke, color);
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) {
        draw_text(self, x, y, text, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_fill_rect_negative_extent() {
        let mut fb = canvas();
        Canvas::fill_rect(&mut fb, 20.0, 20.0, -10.0, -10.0, Rgba::RED);
        assert_eq!(fb.count_color(Rgba::RED), 100);
        assert_eq!(fb.get_pixel(15, 15), Some(Rgba::RED));
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut fb = canvas();
        fb.stroke_rect(10.0, 10.0, 50.0, 50.0, Rgba::BLACK, 2.0);
        assert_eq!(fb.get_pixel(35, 35), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(35, 10), Some(Rgba::BLACK));
    }

    #[test]
    fn test_every_marker_shape_draws() {
        for shape in PointShape::PALETTE {
            let mut fb = canvas();
            fb.marker(50.0, 50.0, 4.0, shape, Rgba::BLUE);
            assert!(fb.count_color(Rgba::BLUE) > 4, "{shape:?}");
        }
    }

    #[test]
    fn test_polyline() {
        let mut fb = canvas();
        fb.polyline(&[(10.0, 10.0), (50.0, 10.0), (50.0, 50.0)], Rgba::BLACK, 3.0);
        assert_eq!(fb.get_pixel(30, 10), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 30), Some(Rgba::BLACK));
    }
}
