//! Layout and drawing of a built plot onto a [`Canvas`].
//!
//! Everything is measured with [`text_width`] so the raster and vector
//! backends place elements identically.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::render::{text_width, Canvas, TextAnchor, TextStyle};
use crate::scale::{LinearScale, Scale};

use super::facet::{Facet, Panel};
use super::ggplot::{BuiltGGPlot, PanelScene};
use super::legend::{Guide, KeyGlyph, Legend};
use super::marks::{point_radius, Mark};
use super::theme::{LegendPosition, Theme};

const MAJOR_GRID: f32 = 1.0;
const MINOR_GRID: f32 = 0.5;
const BORDER: f32 = 1.0;
const COLOR_BAR_SLICES: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Rect {
    fn right(&self) -> f32 {
        self.x + self.w
    }

    fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Positions of every element, derived from the canvas size and the text
/// that must fit around the panels.
struct Layout {
    /// Panels plus strips.
    area: Rect,
    panel_w: f32,
    panel_h: f32,
    col_step: f32,
    row_step: f32,
    /// Height of the strips above a panel.
    top_strip: f32,
    title_y: f32,
    subtitle_y: f32,
    caption_y: f32,
    x_title_y: f32,
    y_title_x: f32,
    /// Top-left corner of the legend block.
    legend_at: (f32, f32),
    legend_sizes: Vec<(f32, f32)>,
}

impl Layout {
    fn compute(plot: &BuiltGGPlot) -> Result<Self> {
        let t = &plot.theme;
        let hl = t.half_line();
        let small = t.small_size();
        let tick = if t.ticks.is_some() { t.tick_length() } else { 0.0 };
        let gap = hl / 2.0;

        let (mut left, mut right) = (hl, plot.width as f32 - hl);
        let (mut top, mut bottom) = (hl, plot.height as f32 - hl);

        let mut title_y = 0.0;
        if plot.labels.title.is_some() {
            title_y = top + t.title_size() / 2.0;
            top += t.title_size() + gap;
        }
        let mut subtitle_y = 0.0;
        if plot.labels.subtitle.is_some() {
            subtitle_y = top + t.base_size / 2.0;
            top += t.base_size + gap;
        }
        let mut caption_y = 0.0;
        if plot.labels.caption.is_some() {
            caption_y = bottom - small / 2.0;
            bottom -= small + gap;
        }

        let horizontal = t.legend_position == LegendPosition::Bottom;
        let legend_sizes: Vec<(f32, f32)> = if t.legend_position == LegendPosition::None {
            Vec::new()
        } else {
            plot.legends.iter().map(|l| measure_legend(l, t, horizontal)).collect()
        };
        let spacing = 2.0 * hl;
        let mut legend_at = (0.0, 0.0);
        if !legend_sizes.is_empty() {
            if horizontal {
                let height = legend_sizes.iter().map(|s| s.1).fold(0.0, f32::max);
                bottom -= height + hl;
                legend_at.1 = bottom + hl;
            } else {
                let width = legend_sizes.iter().map(|s| s.0).fold(0.0, f32::max);
                right -= width + spacing;
                legend_at.0 = right + spacing;
            }
        }

        let mut x_title_y = 0.0;
        if !plot.x_title.is_empty() {
            x_title_y = bottom - t.base_size / 2.0;
            bottom -= t.base_size + gap;
        }
        let axis_h = tick + gap + small;
        bottom -= axis_h;

        let mut y_title_x = 0.0;
        if !plot.y_title.is_empty() {
            y_title_x = left + t.base_size / 2.0;
            left += t.base_size + gap;
        }
        let label_w = plot
            .panels
            .iter()
            .flat_map(|s| s.y.labels.iter())
            .map(|l| text_width(l, small))
            .fold(0.0, f32::max);
        let axis_w = label_w + gap + tick;
        left += axis_w;

        let layout = &plot.layout;
        let strip = t.strip_size();
        let top_strip = plot.facet.top_strips() as f32 * strip;
        right -= plot.facet.side_strips() as f32 * strip;
        let (nrow, ncol) = (layout.nrow.max(1) as f32, layout.ncol.max(1) as f32);
        let scales = plot.facet.facet_scales();
        let (hgap, vgap, strips_per_row) = match plot.facet {
            Facet::None => (0.0, 0.0, 0.0),
            Facet::Wrap { .. } => {
                let inner_x = scales.free_x()
                    || layout.panels.iter().any(|p| layout.is_bottom(p) && p.row + 1 < layout.nrow);
                let hgap = t.panel_spacing() + if scales.free_y() { axis_w } else { 0.0 };
                let vgap = t.panel_spacing() + if inner_x { axis_h } else { 0.0 };
                (hgap, vgap, nrow)
            }
            Facet::Grid { .. } => (t.panel_spacing(), t.panel_spacing(), 1.0),
        };

        let panel_w = (right - left - (ncol - 1.0) * hgap) / ncol;
        let panel_h = (bottom - top - strips_per_row * top_strip - (nrow - 1.0) * vgap) / nrow;
        if panel_w < 1.0 || panel_h < 1.0 {
            return Err(Error::Rendering(format!(
                "{}x{} px is too small for {} x {} panels",
                plot.width, plot.height, layout.nrow, layout.ncol
            )));
        }
        let row_step = panel_h + vgap + if strips_per_row > 1.0 { top_strip } else { 0.0 };

        let area = Rect {
            x: left,
            y: top,
            w: right - left + plot.facet.side_strips() as f32 * strip,
            h: bottom - top,
        };
        if !legend_sizes.is_empty() {
            if horizontal {
                let total: f32 = legend_sizes.iter().map(|s| s.0).sum::<f32>()
                    + spacing * (legend_sizes.len() - 1) as f32;
                legend_at.0 = (area.x + area.w / 2.0 - total / 2.0).max(hl);
            } else {
                let total: f32 = legend_sizes.iter().map(|s| s.1).sum::<f32>()
                    + spacing * (legend_sizes.len() - 1) as f32;
                legend_at.1 = (area.y + area.h / 2.0 - total / 2.0).max(hl);
            }
        }

        Ok(Self {
            area,
            panel_w,
            panel_h,
            col_step: panel_w + hgap,
            row_step,
            top_strip,
            title_y,
            subtitle_y,
            caption_y,
            x_title_y,
            y_title_x,
            legend_at,
            legend_sizes,
        })
    }

    fn panel_rect(&self, panel: &Panel) -> Rect {
        Rect {
            x: self.area.x + panel.col as f32 * self.col_step,
            y: self.area.y + self.top_strip + panel.row as f32 * self.row_step,
            w: self.panel_w,
            h: self.panel_h,
        }
    }
}

/// Draw `plot` onto `canvas`.
pub(super) fn render(plot: &BuiltGGPlot, canvas: &mut dyn Canvas) -> Result<()> {
    let t = &plot.theme;
    let layout = Layout::compute(plot)?;
    canvas.fill_rect(0.0, 0.0, plot.width as f32, plot.height as f32, t.background);

    for (panel, scene) in plot.layout.panels.iter().zip(&plot.panels) {
        let rect = layout.panel_rect(panel);
        let xs = scene.x.to_pixels((rect.x, rect.right()))?;
        let ys = scene.y.to_pixels((rect.bottom(), rect.y))?;

        canvas.fill_rect(rect.x, rect.y, rect.w, rect.h, t.panel_background);
        draw_grid(canvas, t, scene, &xs, &ys, rect);
        for mark in &scene.marks {
            draw_mark(canvas, mark, &xs, &ys, rect);
        }
        if let Some(border) = t.panel_border {
            canvas.stroke_rect(rect.x, rect.y, rect.w, rect.h, border, BORDER);
        }
        let (show_x, show_y) = axes_shown(plot, panel);
        if show_x {
            draw_x_axis(canvas, t, scene, &xs, rect);
        }
        if show_y {
            draw_y_axis(canvas, t, scene, &ys, rect);
        }
        draw_strips(canvas, plot, &layout, panel, rect);
    }

    draw_titles(canvas, plot, &layout);
    draw_legends(canvas, plot, &layout);
    Ok(())
}

fn axes_shown(plot: &BuiltGGPlot, panel: &Panel) -> (bool, bool) {
    let scales = plot.facet.facet_scales();
    match plot.facet {
        Facet::None => (true, true),
        Facet::Wrap { .. } => {
            (plot.layout.is_bottom(panel) || scales.free_x(), panel.col == 0 || scales.free_y())
        }
        Facet::Grid { .. } => (panel.row + 1 == plot.layout.nrow, panel.col == 0),
    }
}

// ============================================================================
// Panels
// ============================================================================

fn draw_grid(
    canvas: &mut dyn Canvas,
    t: &Theme,
    scene: &PanelScene,
    xs: &LinearScale,
    ys: &LinearScale,
    r: Rect,
) {
    if let Some(minor) = t.grid_minor {
        for &x in &scene.x.minor {
            let px = xs.scale(x);
            canvas.line(px, r.y, px, r.bottom(), minor, MINOR_GRID);
        }
        if t.grid_minor_y {
            for &y in &scene.y.minor {
                let py = ys.scale(y);
                canvas.line(r.x, py, r.right(), py, minor, MINOR_GRID);
            }
        }
    }
    if let Some(major) = t.grid_major {
        if t.grid_major_x {
            for &x in &scene.x.breaks {
                let px = xs.scale(x);
                canvas.line(px, r.y, px, r.bottom(), major, MAJOR_GRID);
            }
        }
        for &y in &scene.y.breaks {
            let py = ys.scale(y);
            canvas.line(r.x, py, r.right(), py, major, MAJOR_GRID);
        }
    }
}

fn draw_mark(canvas: &mut dyn Canvas, mark: &Mark, xs: &LinearScale, ys: &LinearScale, r: Rect) {
    match mark {
        Mark::Point { x, y, color, radius, shape } => {
            canvas.marker(xs.scale(*x), ys.scale(*y), *radius, *shape, *color);
        }
        Mark::Path { points, color, width } => {
            let pixels: Vec<(f32, f32)> =
                points.iter().map(|&(x, y)| (xs.scale(x), ys.scale(y))).collect();
            canvas.polyline(&pixels, *color, *width);
        }
        Mark::Rect { xmin, xmax, ymin, ymax, fill, outline } => {
            let (x0, x1) = (xs.scale(*xmin), xs.scale(*xmax));
            let (y0, y1) = (ys.scale(*ymax), ys.scale(*ymin));
            canvas.fill_rect(x0, y0, x1 - x0, y1 - y0, *fill);
            if let Some(outline) = outline {
                canvas.stroke_rect(x0, y0, x1 - x0, y1 - y0, *outline, MINOR_GRID);
            }
        }
        Mark::Errorbar { x, ymin, ymax, half_width, color, width } => {
            let (left, right) = (xs.scale(x - half_width), xs.scale(x + half_width));
            let px = xs.scale(*x);
            let (top, bottom) = (ys.scale(*ymax), ys.scale(*ymin));
            canvas.line(px, top, px, bottom, *color, *width);
            canvas.line(left, top, right, top, *color, *width);
            canvas.line(left, bottom, right, bottom, *color, *width);
        }
        Mark::HLine { y, color, width } => {
            let py = ys.scale(*y);
            canvas.line(r.x, py, r.right(), py, *color, *width);
        }
        Mark::VLine { x, color, width } => {
            let px = xs.scale(*x);
            canvas.line(px, r.y, px, r.bottom(), *color, *width);
        }
    }
}

fn draw_x_axis(canvas: &mut dyn Canvas, t: &Theme, scene: &PanelScene, xs: &LinearScale, r: Rect) {
    let tick = t.ticks.map_or(0.0, |_| t.tick_length());
    let style = TextStyle::new(t.small_size(), t.axis_text).anchor(TextAnchor::Middle);
    if let Some(line) = t.axis_line {
        canvas.line(r.x, r.bottom(), r.right(), r.bottom(), line, BORDER);
    }
    for (&value, label) in scene.x.breaks.iter().zip(&scene.x.labels) {
        let px = xs.scale(value);
        if let Some(color) = t.ticks {
            canvas.line(px, r.bottom(), px, r.bottom() + tick, color, BORDER);
        }
        let ty = r.bottom() + tick + t.half_line() / 2.0 + t.small_size() / 2.0;
        canvas.text(px, ty, label, style);
    }
}

fn draw_y_axis(canvas: &mut dyn Canvas, t: &Theme, scene: &PanelScene, ys: &LinearScale, r: Rect) {
    let tick = t.ticks.map_or(0.0, |_| t.tick_length());
    let style = TextStyle::new(t.small_size(), t.axis_text).anchor(TextAnchor::End);
    if let Some(line) = t.axis_line {
        canvas.line(r.x, r.y, r.x, r.bottom(), line, BORDER);
    }
    for (&value, label) in scene.y.breaks.iter().zip(&scene.y.labels) {
        let py = ys.scale(value);
        if let Some(color) = t.ticks {
            canvas.line(r.x - tick, py, r.x, py, color, BORDER);
        }
        canvas.text(r.x - tick - t.half_line() / 2.0, py, label, style);
    }
}

fn draw_strip(canvas: &mut dyn Canvas, t: &Theme, r: Rect, label: &str, vertical: bool) {
    if let Some(fill) = t.strip_background {
        canvas.fill_rect(r.x, r.y, r.w, r.h, fill);
    }
    if let Some(border) = t.strip_border {
        canvas.stroke_rect(r.x, r.y, r.w, r.h, border, BORDER);
    }
    let style = TextStyle::new(t.small_size(), t.strip_text).anchor(TextAnchor::Middle);
    let style = if vertical { style.vertical() } else { style };
    canvas.text(r.x + r.w / 2.0, r.y + r.h / 2.0, label, style);
}

fn draw_strips(
    canvas: &mut dyn Canvas,
    plot: &BuiltGGPlot,
    layout: &Layout,
    panel: &Panel,
    r: Rect,
) {
    let t = &plot.theme;
    let strip = t.strip_size();
    match plot.facet {
        Facet::None => {}
        Facet::Wrap { .. } => {
            let band = Rect { x: r.x, y: r.y - layout.top_strip, w: r.w, h: layout.top_strip };
            draw_strip(canvas, t, band, &panel.label(), false);
        }
        Facet::Grid { .. } => {
            if panel.row == 0 {
                for (i, key) in panel.col_keys.iter().enumerate() {
                    let y = r.y - layout.top_strip + i as f32 * strip;
                    let band = Rect { x: r.x, y, w: r.w, h: strip };
                    draw_strip(canvas, t, band, key, false);
                }
            }
            if panel.col + 1 == plot.layout.ncol {
                for (i, key) in panel.row_keys.iter().enumerate() {
                    let band = Rect { x: r.right() + i as f32 * strip, y: r.y, w: strip, h: r.h };
                    draw_strip(canvas, t, band, key, true);
                }
            }
        }
    }
}

// ============================================================================
// Titles and legends
// ============================================================================

fn draw_titles(canvas: &mut dyn Canvas, plot: &BuiltGGPlot, layout: &Layout) {
    let t = &plot.theme;
    let area = layout.area;
    if let Some(title) = &plot.labels.title {
        canvas.text(area.x, layout.title_y, title, TextStyle::new(t.title_size(), t.text_color));
    }
    if let Some(subtitle) = &plot.labels.subtitle {
        canvas.text(area.x, layout.subtitle_y, subtitle, TextStyle::new(t.base_size, t.text_color));
    }
    if let Some(caption) = &plot.labels.caption {
        let style = TextStyle::new(t.small_size(), t.text_color).anchor(TextAnchor::End);
        canvas.text(area.right(), layout.caption_y, caption, style);
    }
    let centered = TextStyle::new(t.base_size, t.text_color).anchor(TextAnchor::Middle);
    if !plot.x_title.is_empty() {
        canvas.text(area.x + area.w / 2.0, layout.x_title_y, &plot.x_title, centered);
    }
    if !plot.y_title.is_empty() {
        canvas.text(layout.y_title_x, area.y + area.h / 2.0, &plot.y_title, centered.vertical());
    }
}

/// Side of the box drawn for each key: large points get more room.
fn key_box(legend: &Legend, t: &Theme) -> f32 {
    match &legend.guide {
        Guide::Keys { keys, layers } => keys
            .iter()
            .flat_map(|k| {
                layers.iter().filter(|l| l.glyph == KeyGlyph::Point).map(move |l| l.styled(k))
            })
            .map(|style| 2.0 * point_radius(style.size) + 4.0)
            .fold(t.key_size(), f32::max),
        Guide::ColorBar { .. } => t.key_size(),
    }
}

fn measure_legend(legend: &Legend, t: &Theme, horizontal: bool) -> (f32, f32) {
    let hl = t.half_line();
    let title_h = t.base_size + hl / 2.0;
    let title_w = text_width(&legend.title, t.base_size);
    let small = t.small_size();
    match &legend.guide {
        Guide::Keys { keys, .. } => {
            let side = key_box(legend, t);
            let labels = keys.iter().map(|k| text_width(&k.label, small));
            if horizontal {
                let row: f32 = labels.map(|w| side + hl / 2.0 + w + hl).sum();
                (title_w.max(row), title_h + side)
            } else {
                let widest = labels.fold(0.0, f32::max);
                (title_w.max(side + hl / 2.0 + widest), title_h + side * keys.len() as f32)
            }
        }
        Guide::ColorBar { ticks, .. } => {
            let widest = ticks.iter().map(|(_, l)| text_width(l, small)).fold(0.0, f32::max);
            let bar = t.key_size();
            if horizontal {
                (title_w.max(bar * 5.0 + widest), title_h + bar + hl / 2.0 + small)
            } else {
                (title_w.max(bar + hl / 2.0 + widest), title_h + bar * 5.0)
            }
        }
    }
}

fn draw_legends(canvas: &mut dyn Canvas, plot: &BuiltGGPlot, layout: &Layout) {
    let t = &plot.theme;
    let horizontal = t.legend_position == LegendPosition::Bottom;
    let spacing = 2.0 * t.half_line();
    let (mut x, mut y) = layout.legend_at;
    for (legend, &(w, h)) in plot.legends.iter().zip(&layout.legend_sizes) {
        draw_legend(canvas, legend, t, x, y, horizontal);
        if horizontal {
            x += w + spacing;
        } else {
            y += h + spacing;
        }
    }
}

fn draw_legend(
    canvas: &mut dyn Canvas,
    legend: &Legend,
    t: &Theme,
    x: f32,
    y: f32,
    horizontal: bool,
) {
    let hl = t.half_line();
    let small = t.small_size();
    canvas.text(x, y + t.base_size / 2.0, &legend.title, TextStyle::new(t.base_size, t.text_color));
    let top = y + t.base_size + hl / 2.0;
    let label_style = TextStyle::new(small, t.text_color);

    match &legend.guide {
        Guide::Keys { keys, layers } => {
            let side = key_box(legend, t);
            let mut kx = x;
            for (i, key) in keys.iter().enumerate() {
                let ky = if horizontal { top } else { top + i as f32 * side };
                canvas.fill_rect(kx, ky, side, side, t.legend_key);
                let (cx, cy) = (kx + side / 2.0, ky + side / 2.0);
                for layer in layers {
                    let style = layer.styled(key);
                    match layer.glyph {
                        KeyGlyph::Rect => {
                            let (inset, inner) = (1.0, side - 2.0);
                            let fill = style.fill.with_opacity(style.alpha);
                            canvas.fill_rect(kx + inset, ky + inset, inner, inner, fill);
                            if let Some(outline) = style.outline {
                                let (x0, y0) = (kx + inset, ky + inset);
                                canvas.stroke_rect(x0, y0, inner, inner, outline, MINOR_GRID);
                            }
                        }
                        KeyGlyph::Path => {
                            let color = style.color.with_opacity(style.alpha);
                            let width = style.stroke_px();
                            canvas.line(kx + 2.0, cy, kx + side - 2.0, cy, color, width);
                        }
                        KeyGlyph::Point => {
                            let color = style.color.with_opacity(style.alpha);
                            canvas.marker(cx, cy, point_radius(style.size), style.shape, color);
                        }
                    }
                }
                canvas.text(kx + side + hl / 2.0, cy, &key.label, label_style);
                if horizontal {
                    kx += side + hl / 2.0 + text_width(&key.label, small) + hl;
                }
            }
        }
        Guide::ColorBar { low, high, ticks } => {
            let bar = t.key_size();
            let (bw, bh) = if horizontal { (bar * 5.0, bar) } else { (bar, bar * 5.0) };
            for s in 0..COLOR_BAR_SLICES {
                let f0 = s as f32 / COLOR_BAR_SLICES as f32;
                let f1 = (s + 1) as f32 / COLOR_BAR_SLICES as f32;
                let color = low.lerp(*high, (f0 + f1) / 2.0);
                if horizontal {
                    canvas.fill_rect(x + f0 * bw, top, (f1 - f0) * bw + 0.5, bh, color);
                } else {
                    canvas.fill_rect(x, top + bh - f1 * bh, bw, (f1 - f0) * bh + 0.5, color);
                }
            }
            for (pos, label) in ticks {
                if horizontal {
                    let px = x + pos * bw;
                    canvas.line(px, top + bh - 3.0, px, top + bh, Rgba::WHITE, BORDER);
                    let style = label_style.anchor(TextAnchor::Middle);
                    canvas.text(px, top + bh + hl / 2.0 + small / 2.0, label, style);
                } else {
                    let py = top + bh - pos * bh;
                    canvas.line(x + bw - 3.0, py, x + bw, py, Rgba::WHITE, BORDER);
                    canvas.text(x + bw + hl / 2.0, py, label, label_style);
                }
            }
        }
    }
}
