//! Drawing surface abstraction and rasterization.
//!
//! Plots are laid out once and drawn through the [`Canvas`] trait, which is
//! implemented both by the pixel [`Framebuffer`](crate::framebuffer::Framebuffer)
//! and by the vector [`SvgEncoder`](crate::output::SvgEncoder). The raster
//! side uses:
//!
//! - **Wu's Anti-aliased Line** for hairlines
//! - **Scanline polygon fill** for thick strokes and filled markers
//! - **Coverage-sampled discs** for circular markers
//! - A built-in 5×7 bitmap font for text
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod font;
mod primitives;
mod raster;

pub use font::{draw_text, glyph};
pub use primitives::{draw_disc, draw_line_aa, draw_thick_line, fill_polygon};

use crate::color::Rgba;

/// Horizontal alignment of a text run relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Marker glyph for point layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointShape {
    /// Filled circle.
    #[default]
    Circle,
    /// Filled upward triangle.
    Triangle,
    /// Filled square.
    Square,
    /// Open plus sign.
    Plus,
    /// Open diagonal cross.
    Cross,
    /// Filled diamond.
    Diamond,
}

impl PointShape {
    /// Shapes handed out to successive levels of a discrete shape mapping.
    pub const PALETTE: [PointShape; 6] = [
        PointShape::Circle,
        PointShape::Triangle,
        PointShape::Square,
        PointShape::Plus,
        PointShape::Cross,
        PointShape::Diamond,
    ];

    /// Outline vertices for the filled polygonal shapes, `None` otherwise.
    #[must_use]
    pub fn polygon(self, x: f32, y: f32, r: f32) -> Option<Vec<(f32, f32)>> {
        match self {
            PointShape::Triangle => {
                let h = r * 1.15;
                Some(vec![(x, y - h), (x + h, y + h * 0.75), (x - h, y + h * 0.75)])
            }
            PointShape::Square => {
                let s = r * 0.9;
                Some(vec![(x - s, y - s), (x + s, y - s), (x + s, y + s), (x - s, y + s)])
            }
            PointShape::Diamond => {
                let d = r * 1.25;
                Some(vec![(x, y - d), (x + d, y), (x, y + d), (x - d, y)])
            }
            PointShape::Circle | PointShape::Plus | PointShape::Cross => None,
        }
    }

    /// Stroke segments for the open shapes, empty otherwise.
    #[must_use]
    pub fn strokes(self, x: f32, y: f32, r: f32) -> Vec<[(f32, f32); 2]> {
        match self {
            PointShape::Plus => vec![[(x - r, y), (x + r, y)], [(x, y - r), (x, y + r)]],
            PointShape::Cross => {
                let d = r * 0.8;
                vec![[(x - d, y - d), (x + d, y + d)], [(x - d, y + d), (x + d, y - d)]]
            }
            _ => Vec::new(),
        }
    }
}

/// Font size, color and placement of a text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Nominal font size in pixels.
    pub size: f32,
    /// Text color.
    pub color: Rgba,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Rotate 90° counter-clockwise (reads bottom to top).
    pub vertical: bool,
}

impl TextStyle {
    /// Left-aligned horizontal text.
    #[must_use]
    pub const fn new(size: f32, color: Rgba) -> Self {
        Self { size, color, anchor: TextAnchor::Start, vertical: false }
    }

    /// Change the alignment.
    #[must_use]
    pub const fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Rotate to read bottom to top.
    #[must_use]
    pub const fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }
}

/// Estimated advance width of `text` at `size`, shared by every backend so
/// layout does not depend on the output format.
#[must_use]
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}

/// A 2D drawing surface in pixel coordinates, origin top-left.
///
/// Text is positioned by its anchor point horizontally and by the vertical
/// center of the line.
pub trait Canvas {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);

    /// Stroke the border of an axis-aligned rectangle.
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba, width: f32) {
        self.line(x, y, x + w, y, color, width);
        self.line(x + w, y, x + w, y + h, color, width);
        self.line(x + w, y + h, x, y + h, color, width);
        self.line(x, y + h, x, y, color, width);
    }

    /// Draw a straight segment.
    #[allow(clippy::too_many_arguments)]
    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba, width: f32);

    /// Draw connected segments through `points`.
    fn polyline(&mut self, points: &[(f32, f32)], color: Rgba, width: f32) {
        for pair in points.windows(2) {
            self.line(pair[0].0, pair[0].1, pair[1].0, pair[1].1, color, width);
        }
    }

    /// Draw a point marker centered at `(x, y)`.
    fn marker(&mut self, x: f32, y: f32, radius: f32, shape: PointShape, color: Rgba);

    /// Draw a single line of text.
    fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle);
}
