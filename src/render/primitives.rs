//! Rasterization of lines, polygons and discs into a framebuffer.
//!
//! Every primitive composites with [`Framebuffer::blend_pixel`] and touches
//! each pixel at most once, so translucent marks overlay correctly.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased hairline using Wu's algorithm.
///
/// Wu's algorithm draws two pixels at each step along the major axis,
/// weighting them by the fractional distance from the ideal line position.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut put = |major: i32, minor: i32, intensity: f32| {
        if steep {
            plot(fb, minor, major, color, intensity);
        } else {
            plot(fb, major, minor, color, intensity);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1 + 1, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    if xpxl2 != xpxl1 {
        put(xpxl2, ypxl2, rfpart(yend) * xgap);
        put(xpxl2, ypxl2 + 1, fpart(yend) * xgap);
    }

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Draw a segment of the given stroke width.
///
/// Widths up to one pixel fall back to [`draw_line_aa`]; wider strokes are
/// filled as a rectangle around the segment.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    (x0, y0): (f32, f32),
    (x1, y1): (f32, f32),
    width: f32,
    color: Rgba,
) {
    if width <= 1.0 {
        draw_line_aa(fb, x0, y0, x1, y1, color);
        return;
    }
    let half = width / 2.0;
    let len = (x1 - x0).hypot(y1 - y0);
    if len < f32::EPSILON {
        let (left, right, top, bottom) = (x0 - half, x0 + half, y0 - half, y0 + half);
        fill_polygon(fb, &[(left, top), (right, top), (right, bottom), (left, bottom)], color);
        return;
    }
    let nx = -(y1 - y0) / len * half;
    let ny = (x1 - x0) / len * half;
    fill_polygon(
        fb,
        &[(x0 + nx, y0 + ny), (x1 + nx, y1 + ny), (x1 - nx, y1 - ny), (x0 - nx, y0 - ny)],
        color,
    );
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 && intensity > 0.0 {
        fb.blend_pixel(x as u32, y as u32, color.with_opacity(intensity));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Area Fills
// ============================================================================

/// Fill a simple polygon with the even-odd rule, sampling pixel centers.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[(f32, f32)], color: Rgba) {
    if points.len() < 3 {
        return;
    }
    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));
    if !min_y.is_finite() || !max_y.is_finite() {
        return;
    }
    let row_start = min_y.floor().max(0.0) as u32;
    let row_end = (max_y.ceil().max(0.0) as u32).min(fb.height());
    let max_col = fb.width() as f32 - 1.0;

    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
    for row in row_start..row_end {
        let sy = row as f32 + 0.5;
        crossings.clear();
        for (i, &(xa, ya)) in points.iter().enumerate() {
            let (xb, yb) = points[(i + 1) % points.len()];
            if (ya <= sy && yb > sy) || (yb <= sy && ya > sy) {
                crossings.push(xa + (sy - ya) / (yb - ya) * (xb - xa));
            }
        }
        crossings.sort_by(f32::total_cmp);
        for span in crossings.chunks_exact(2) {
            let first = (span[0] - 0.5).ceil().max(0.0);
            let last = (span[1] - 0.5).floor().min(max_col);
            if last >= first {
                fb.fill_rect(first as u32, row, (last - first) as u32 + 1, 1, color);
            }
        }
    }
}

/// Fill a disc with a one-pixel anti-aliased rim.
pub fn draw_disc(fb: &mut Framebuffer, cx: f32, cy: f32, radius: f32, color: Rgba) {
    if radius <= 0.0 {
        return;
    }
    let reach = radius + 1.0;
    let x_start = (cx - reach).floor().max(0.0) as u32;
    let y_start = (cy - reach).floor().max(0.0) as u32;
    let x_end = ((cx + reach).ceil().max(0.0) as u32).min(fb.width());
    let y_end = ((cy + reach).ceil().max(0.0) as u32).min(fb.height());

    for y in y_start..y_end {
        for x in x_start..x_end {
            let d = (x as f32 + 0.5 - cx).hypot(y as f32 + 0.5 - cy);
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage > 0.0 {
                fb.blend_pixel(x, y, color.with_opacity(coverage));
            }
        }
    }
}
