//! SVG output encoder.
//!
//! Collects vector elements drawn through [`Canvas`] and serializes them as a
//! standalone SVG document. Text stays as native `<text>` so figures remain
//! searchable and scale cleanly for print.

use crate::color::Rgba;
use crate::error::Result;
use crate::render::{Canvas, PointShape, TextAnchor, TextStyle};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Circle
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Line
    Line { x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32 },
    /// Open polyline
    Polyline { points: Vec<(f32, f32)>, stroke: Rgba, stroke_width: f32 },
    /// Filled polygon
    Polygon { points: Vec<(f32, f32)>, fill: Rgba },
    /// Text, optionally rotated to read bottom to top
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        vertical: bool,
    },
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Elements in drawing order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(64 * self.elements.len() + 256);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="sans-serif">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let fill = rgba_to_css(bg);
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{fill}"/>"#);
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

impl Canvas for SvgEncoder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.elements.push(SvgElement::Rect {
            x: x.min(x + w),
            y: y.min(y + h),
            width: w.abs(),
            height: h.abs(),
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba, width: f32) {
        self.elements.push(SvgElement::Rect {
            x,
            y,
            width: w,
            height: h,
            fill: None,
            stroke: Some(color),
            stroke_width: width,
        });
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba, width: f32) {
        self.elements.push(SvgElement::Line {
            x1: x0,
            y1: y0,
            x2: x1,
            y2: y1,
            stroke: color,
            stroke_width: width,
        });
    }

    fn polyline(&mut self, points: &[(f32, f32)], color: Rgba, width: f32) {
        if points.len() >= 2 {
            self.elements.push(SvgElement::Polyline {
                points: points.to_vec(),
                stroke: color,
                stroke_width: width,
            });
        }
    }

    fn marker(&mut self, x: f32, y: f32, radius: f32, shape: PointShape, color: Rgba) {
        if let Some(points) = shape.polygon(x, y, radius) {
            self.elements.push(SvgElement::Polygon { points, fill: color });
        } else if shape == PointShape::Circle {
            self.elements.push(SvgElement::Circle { cx: x, cy: y, r: radius, fill: color });
        } else {
            let stroke_width = (radius / 3.0).max(1.5);
            for [a, b] in shape.strokes(x, y, radius) {
                self.line(a.0, a.1, b.0, b.1, color, stroke_width);
            }
        }
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: TextStyle) {
        self.elements.push(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size: style.size,
            fill: style.color,
            anchor: style.anchor,
            vertical: style.vertical,
        });
    }
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, f32::from(color.a) / 255.0)
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn points_attr(points: &[(f32, f32)]) -> String {
    points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect::<Vec<_>>().join(" ")
}

/// Convert an SVG element to its string representation.
fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke, stroke_width } => {
            let fill_attr = fill.map_or_else(|| "none".to_string(), rgba_to_css);
            let stroke_attr = stroke
                .map(|s| format!(r#" stroke="{}" stroke-width="{stroke_width}""#, rgba_to_css(s)))
                .unwrap_or_default();
            format!(
                r#"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{fill_attr}"{stroke_attr}/>"#
            )
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            let fill = rgba_to_css(*fill);
            format!(r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{fill}"/>"#)
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => {
            format!(
                r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{}" stroke-width="{stroke_width}"/>"#,
                rgba_to_css(*stroke)
            )
        }
        SvgElement::Polyline { points, stroke, stroke_width } => {
            format!(
                r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{stroke_width}" stroke-linejoin="round"/>"#,
                points_attr(points),
                rgba_to_css(*stroke)
            )
        }
        SvgElement::Polygon { points, fill } => {
            format!(r#"<polygon points="{}" fill="{}"/>"#, points_attr(points), rgba_to_css(*fill))
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor, vertical } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let rotate = if *vertical {
                format!(r#" transform="rotate(-90 {x:.2} {y:.2})""#)
            } else {
                String::new()
            };
            format!(
                r#"<text x="{x:.2}" y="{y:.2}" font-size="{font_size}" fill="{}" text-anchor="{anchor_str}" dominant-baseline="central"{rotate}>{}</text>"#,
                rgba_to_css(*fill),
                escape_xml(text)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_encoder_new() {
        let svg = SvgEncoder::new(640, 480).render();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="640""#));
        assert!(svg.contains(r#"fill="rgb(255,255,255)""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(10, 10).background(None).render();
        assert!(!svg.contains("100%"));
    }

    #[test]
    fn test_canvas_fill_rect_normalizes() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.fill_rect(20.0, 20.0, -10.0, -5.0, Rgba::RED);
        assert_eq!(
            enc.elements()[0],
            SvgElement::Rect {
                x: 10.0,
                y: 15.0,
                width: 10.0,
                height: 5.0,
                fill: Some(Rgba::RED),
                stroke: None,
                stroke_width: 0.0
            }
        );
    }

    #[test]
    fn test_svg_markers() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.marker(10.0, 10.0, 3.0, PointShape::Circle, Rgba::BLUE);
        enc.marker(20.0, 10.0, 3.0, PointShape::Triangle, Rgba::BLUE);
        enc.marker(30.0, 10.0, 3.0, PointShape::Plus, Rgba::BLUE);
        let svg = enc.render();
        assert!(svg.contains("<circle"));
        assert!(svg.contains("<polygon"));
        assert_eq!(svg.matches("<line").count(), 2);
    }

    #[test]
    fn test_svg_rgba_alpha() {
        let mut enc = SvgEncoder::new(10, 10);
        enc.marker(5.0, 5.0, 2.0, PointShape::Circle, Rgba::new(255, 0, 0, 128));
        assert!(enc.render().contains("rgba(255,0,0,0.502)"));
    }

    #[test]
    fn test_svg_polyline_needs_two_points() {
        let mut enc = SvgEncoder::new(10, 10);
        enc.polyline(&[(1.0, 1.0)], Rgba::BLACK, 1.0);
        assert!(enc.elements().is_empty());
        enc.polyline(&[(1.0, 1.0), (2.0, 3.0)], Rgba::BLACK, 1.0);
        assert!(enc.render().contains(r#"points="1.00,1.00 2.00,3.00""#));
    }

    #[test]
    fn test_svg_text_escaping_and_rotation() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.text(50.0, 50.0, "Salary <$> & \"rank\"", TextStyle::new(11.0, Rgba::BLACK).vertical());
        let svg = enc.render();
        assert!(svg.contains("Salary &lt;$&gt; &amp; &quot;rank&quot;"));
        assert!(svg.contains("rotate(-90 50.00 50.00)"));
    }

    #[test]
    fn test_svg_text_anchor() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.text(50.0, 50.0, "mid", TextStyle::new(11.0, Rgba::BLACK).anchor(TextAnchor::Middle));
        enc.text(50.0, 60.0, "end", TextStyle::new(11.0, Rgba::BLACK).anchor(TextAnchor::End));
        let svg = enc.render();
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"text-anchor="end""#));
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.svg");
        let mut enc = SvgEncoder::new(50, 50);
        enc.line(0.0, 0.0, 50.0, 50.0, Rgba::BLACK, 1.0);
        enc.write_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<line"));
    }
}
