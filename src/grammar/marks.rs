//! Layer statistics and the marks they produce.
//!
//! Marks live in data coordinates; only drawing maps them to pixels.

use std::collections::BTreeMap;

use log::warn;

use crate::color::Rgba;
use crate::data::{Column, DataFrame};
use crate::error::{Error, Result};
use crate::render::PointShape;

use super::aes::{Aes, Channel};
use super::geom::{Geom, GeomType, PT};
use super::scales::{AesScale, AestheticScales, Mapped};
use super::stat::{Bins, PolyFit, SmoothMethod, SMOOTH_POINTS};

/// Color drawn for missing values of a mapped color or fill.
pub const NA_COLOR: Rgba = Rgba::GREY;
/// Point size in millimetres when neither mapped nor set.
pub const DEFAULT_POINT_SIZE: f32 = 1.5;

/// Point outline stroke (0.5 mm) adds half its width to the glyph.
const POINT_STROKE: f32 = 0.5 * 96.0 / 25.4 / 2.0;

/// Pixel radius of a point of `size` millimetres.
#[must_use]
pub fn point_radius(size: f32) -> f32 {
    (size * PT + POINT_STROKE) / 2.0
}

/// A drawable element in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Point marker; `radius` is in pixels.
    Point {
        /// X position.
        x: f32,
        /// Y position.
        y: f32,
        /// Final color including opacity.
        color: Rgba,
        /// Radius in pixels.
        radius: f32,
        /// Glyph.
        shape: PointShape,
    },
    /// Connected line; `width` is in pixels.
    Path {
        /// Vertices in drawing order.
        points: Vec<(f32, f32)>,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f32,
    },
    /// Filled rectangle, optionally outlined.
    Rect {
        /// Left edge.
        xmin: f32,
        /// Right edge.
        xmax: f32,
        /// Bottom edge.
        ymin: f32,
        /// Top edge.
        ymax: f32,
        /// Fill color.
        fill: Rgba,
        /// Outline color.
        outline: Option<Rgba>,
    },
    /// Vertical interval with horizontal caps.
    Errorbar {
        /// X position.
        x: f32,
        /// Lower end.
        ymin: f32,
        /// Upper end.
        ymax: f32,
        /// Half the cap width in data units.
        half_width: f32,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f32,
    },
    /// Horizontal line across the panel.
    HLine {
        /// Y position.
        y: f32,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f32,
    },
    /// Vertical line across the panel.
    VLine {
        /// X position.
        x: f32,
        /// Stroke color.
        color: Rgba,
        /// Stroke width in pixels.
        width: f32,
    },
}

impl Mark {
    /// Horizontal data extent, `None` for marks spanning the whole panel.
    #[must_use]
    pub fn x_extent(&self) -> Option<(f32, f32)> {
        match self {
            Mark::Point { x, .. } | Mark::VLine { x, .. } => Some((*x, *x)),
            Mark::Path { points, .. } => span(points.iter().map(|p| p.0)),
            Mark::Rect { xmin, xmax, .. } => Some((*xmin, *xmax)),
            Mark::Errorbar { x, half_width, .. } => Some((x - half_width, x + half_width)),
            Mark::HLine { .. } => None,
        }
    }

    /// Vertical data extent, `None` for marks spanning the whole panel.
    #[must_use]
    pub fn y_extent(&self) -> Option<(f32, f32)> {
        match self {
            Mark::Point { y, .. } | Mark::HLine { y, .. } => Some((*y, *y)),
            Mark::Path { points, .. } => span(points.iter().map(|p| p.1)),
            Mark::Rect { ymin, ymax, .. } => Some((*ymin, *ymax)),
            Mark::Errorbar { ymin, ymax, .. } => Some((*ymin, *ymax)),
            Mark::VLine { .. } => None,
        }
    }

    /// The mark restricted to the given limits, or `None` if it falls
    /// outside. Paths keep only the vertices inside.
    #[must_use]
    pub fn within(self, xlim: Option<(f32, f32)>, ylim: Option<(f32, f32)>) -> Option<Mark> {
        let inside =
            |v: f32, lim: Option<(f32, f32)>| lim.map_or(true, |(lo, hi)| v >= lo && v <= hi);
        if let Mark::Path { points, color, width } = self {
            let points: Vec<(f32, f32)> =
                points.into_iter().filter(|&(x, y)| inside(x, xlim) && inside(y, ylim)).collect();
            return (points.len() >= 2).then_some(Mark::Path { points, color, width });
        }
        let fits = |extent: Option<(f32, f32)>, lim| {
            extent.map_or(true, |(lo, hi)| inside(lo, lim) && inside(hi, lim))
        };
        (fits(self.x_extent(), xlim) && fits(self.y_extent(), ylim)).then_some(self)
    }
}

/// Union of extents.
#[must_use]
pub fn union_extent(a: Option<(f32, f32)>, b: Option<(f32, f32)>) -> Option<(f32, f32)> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a.0.min(b.0), a.1.max(b.1))),
        (a, None) => a,
        (None, b) => b,
    }
}

fn span(values: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    values.filter(|v| v.is_finite()).fold(None, |acc, v| union_extent(acc, Some((v, v))))
}

// ============================================================================
// Styles
// ============================================================================

/// Resolved appearance of one row (or one legend key) of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Stroke or point color.
    pub color: Rgba,
    /// Area fill.
    pub fill: Rgba,
    /// Bar outline.
    pub outline: Option<Rgba>,
    /// Point glyph.
    pub shape: PointShape,
    /// Point size in millimetres.
    pub size: f32,
    /// Opacity.
    pub alpha: f32,
    /// Stroke width in millimetres.
    pub linewidth: f32,
}

impl Style {
    /// Fixed settings of a layer, falling back to geometry defaults.
    #[must_use]
    pub fn defaults(geom: &Geom, aes: &Aes) -> Self {
        let color = aes.color_value.unwrap_or_else(|| geom.default_color());
        let (fill, outline) = if geom.is_area() {
            (aes.fill_value.unwrap_or_else(|| geom.default_color()), aes.color_value)
        } else {
            (aes.fill_value.unwrap_or(color), None)
        };
        Self {
            color,
            fill,
            outline,
            shape: aes.shape_value.unwrap_or(PointShape::Circle),
            size: aes.size_value.unwrap_or(DEFAULT_POINT_SIZE),
            alpha: aes.alpha_value.unwrap_or(1.0),
            linewidth: geom.linewidth.unwrap_or_else(|| geom.default_linewidth()),
        }
    }

    /// Stroke width in pixels.
    #[must_use]
    pub fn stroke_px(&self) -> f32 {
        self.linewidth * PT
    }
}

// ============================================================================
// Layer statistics
// ============================================================================

/// One layer bound to its data and the plot's trained scales.
pub struct LayerContext<'a> {
    geom: &'a Geom,
    aes: &'a Aes,
    data: &'a DataFrame,
    scales: &'a AestheticScales,
    x_levels: Option<&'a [String]>,
    y_levels: Option<&'a [String]>,
    bins: Option<Bins>,
}

impl<'a> LayerContext<'a> {
    /// Bind a layer. Histogram bins are fixed here over every row of the
    /// layer so that all panels share them.
    ///
    /// # Errors
    ///
    /// Returns an error if a histogram maps a categorical `x`.
    pub fn new(
        geom: &'a Geom,
        aes: &'a Aes,
        data: &'a DataFrame,
        scales: &'a AestheticScales,
        x_levels: Option<&'a [String]>,
        y_levels: Option<&'a [String]>,
    ) -> Result<Self> {
        let bins = match (&geom.geom_type, aes.x.as_deref()) {
            (GeomType::Histogram { bins }, Some(x)) => {
                let values = data.numeric(x)?;
                span(values.iter().copied()).map(|range| Bins::centered(range, *bins))
            }
            _ => None,
        };
        Ok(Self {
            geom,
            aes,
            data,
            scales,
            x_levels,
            y_levels,
            bins,
        })
    }

    /// Marks for the given rows of the layer's data.
    ///
    /// # Errors
    ///
    /// Returns an error if a mapped column has the wrong kind for the geometry.
    pub fn marks(&self, rows: &[usize]) -> Result<Vec<Mark>> {
        match &self.geom.geom_type {
            GeomType::Point => self.points(rows),
            GeomType::Line => self.lines(rows),
            GeomType::Histogram { .. } => self.histogram(rows),
            GeomType::Col { dodge } => self.bars(rows, *dodge),
            GeomType::Smooth { method } => self.smooth(rows, *method),
            GeomType::Errorbar => self.errorbars(rows),
            GeomType::Hline { yintercept } => {
                let style = Style::defaults(self.geom, self.aes);
                Ok(vec![Mark::HLine {
                    y: *yintercept,
                    color: faded(style.color, style.alpha),
                    width: style.stroke_px(),
                }])
            }
            GeomType::Vline { xintercept } => {
                let style = Style::defaults(self.geom, self.aes);
                Ok(vec![Mark::VLine {
                    x: *xintercept,
                    color: faded(style.color, style.alpha),
                    width: style.stroke_px(),
                }])
            }
        }
    }

    fn mapped_column(&self, channel: Channel) -> Option<&'a Column> {
        self.aes.column(channel).and_then(|name| self.data.column(name).ok())
    }

    fn lookup<T, S: AesScale<T>>(
        &self,
        channel: Channel,
        scale: Option<&Mapped<S>>,
        row: usize,
    ) -> Option<Option<T>> {
        let column = self.mapped_column(channel)?;
        Some(scale.and_then(|m| m.scale.map(column, row)))
    }

    /// Appearance of `row`: mapped channels override fixed settings.
    fn style(&self, row: usize) -> Style {
        let scales = self.scales;
        let mut style = Style::defaults(self.geom, self.aes);
        if let Some(color) = self.lookup::<Rgba, _>(Channel::Color, scales.color.as_ref(), row) {
            let color = color.unwrap_or(NA_COLOR);
            style.color = color;
            if self.geom.is_area() {
                style.outline = Some(color);
            }
        }
        if let Some(fill) = self.lookup::<Rgba, _>(Channel::Fill, scales.fill.as_ref(), row) {
            style.fill = fill.unwrap_or(NA_COLOR);
        }
        let shape = self.lookup::<PointShape, _>(Channel::Shape, scales.shape.as_ref(), row);
        if let Some(Some(shape)) = shape {
            style.shape = shape;
        }
        if let Some(Some(size)) = self.lookup::<f32, _>(Channel::Size, scales.size.as_ref(), row) {
            style.size = size;
        }
        if let Some(Some(alpha)) = self.lookup::<f32, _>(Channel::Alpha, scales.alpha.as_ref(), row)
        {
            style.alpha = alpha;
        }
        style
    }

    /// Data-space position of `row` on a position channel. Categorical
    /// values sit at their 1-based level index.
    fn position(&self, channel: Channel, row: usize) -> f32 {
        let levels = if channel == Channel::X { self.x_levels } else { self.y_levels };
        match self.mapped_column(channel) {
            Some(Column::Numeric(values)) => values[row],
            Some(Column::Categorical(f)) => levels
                .and_then(|levels| levels.iter().position(|l| l == f.label(row)))
                .map_or(f32::NAN, |i| (i + 1) as f32),
            None => f32::NAN,
        }
    }

    fn xy(&self, row: usize) -> Option<(f32, f32)> {
        let (x, y) = (self.position(Channel::X, row), self.position(Channel::Y, row));
        (x.is_finite() && y.is_finite()).then_some((x, y))
    }

    /// Rows split by the `group` column, else by every discrete legend
    /// channel. Groups come out in level order.
    fn groups(&self, rows: &[usize]) -> Vec<Vec<usize>> {
        let keys: Vec<&Column> = match self.mapped_column(Channel::Group) {
            Some(column) => vec![column],
            None => [Channel::Color, Channel::Fill, Channel::Shape, Channel::Size, Channel::Alpha]
                .into_iter()
                .filter_map(|ch| self.mapped_column(ch))
                .filter(|c| matches!(c, Column::Categorical(_)))
                .collect(),
        };
        let mut groups: BTreeMap<Vec<u64>, Vec<usize>> = BTreeMap::new();
        for &row in rows {
            let key = keys
                .iter()
                .map(|c| match c {
                    Column::Categorical(f) => u64::from(f.codes()[row]),
                    Column::Numeric(v) => u64::from(v[row].to_bits()),
                })
                .collect();
            groups.entry(key).or_default().push(row);
        }
        groups.into_values().collect()
    }

    fn points(&self, rows: &[usize]) -> Result<Vec<Mark>> {
        Ok(rows
            .iter()
            .filter_map(|&row| {
                let (x, y) = self.xy(row)?;
                let style = self.style(row);
                Some(Mark::Point {
                    x,
                    y,
                    color: faded(style.color, style.alpha),
                    radius: point_radius(style.size),
                    shape: style.shape,
                })
            })
            .collect())
    }

    fn lines(&self, rows: &[usize]) -> Result<Vec<Mark>> {
        Ok(self
            .groups(rows)
            .into_iter()
            .filter_map(|group| {
                let mut points: Vec<(f32, f32)> =
                    group.iter().filter_map(|&r| self.xy(r)).collect();
                points.sort_by(|a, b| a.0.total_cmp(&b.0));
                let style = self.style(*group.first()?);
                (points.len() >= 2).then(|| Mark::Path {
                    points,
                    color: faded(style.color, style.alpha),
                    width: style.stroke_px(),
                })
            })
            .collect())
    }

    fn histogram(&self, rows: &[usize]) -> Result<Vec<Mark>> {
        let Some(bins) = self.bins else {
            return Ok(Vec::new());
        };
        let x = self
            .aes
            .x
            .as_deref()
            .map(|name| self.data.numeric(name))
            .transpose()?
            .unwrap_or_default();
        let mut stacked = vec![0.0f32; bins.count];
        let mut marks = Vec::new();
        // first group ends up on top of the stack
        for group in self.groups(rows).into_iter().rev() {
            let Some(&first) = group.first() else { continue };
            let style = self.style(first);
            let counts = bins.counts(group.iter().map(|&r| x[r]));
            for (i, &count) in counts.iter().enumerate() {
                if count == 0 {
                    continue;
                }
                let (xmin, xmax) = bins.edges(i);
                let ymin = stacked[i];
                stacked[i] += count as f32;
                marks.push(Mark::Rect {
                    xmin,
                    xmax,
                    ymin,
                    ymax: stacked[i],
                    fill: faded(style.fill, style.alpha),
                    outline: style.outline,
                });
            }
        }
        Ok(marks)
    }

    fn bars(&self, rows: &[usize], dodge: bool) -> Result<Vec<Mark>> {
        let resolution = match self.x_levels {
            Some(_) => 1.0,
            None => resolution(rows.iter().map(|&r| self.position(Channel::X, r))),
        };
        let width = self.geom.width.unwrap_or_else(|| self.geom.default_width()) * resolution;
        let groups = self.groups(rows);
        let n = groups.len().max(1) as f32;
        let mut stacks: BTreeMap<u32, (f32, f32)> = BTreeMap::new();
        let mut marks = Vec::new();
        for (g, group) in groups.iter().enumerate() {
            for &row in group {
                let Some((x, y)) = self.xy(row) else { continue };
                let style = self.style(row);
                let (xmin, xmax, ymin, ymax) = if dodge {
                    let left = x - width / 2.0 + g as f32 * width / n;
                    (left, left + width / n, 0.0f32.min(y), 0.0f32.max(y))
                } else {
                    let (below, above) = stacks.entry(x.to_bits()).or_insert((0.0, 0.0));
                    if y >= 0.0 {
                        *above += y;
                        (x - width / 2.0, x + width / 2.0, *above - y, *above)
                    } else {
                        *below += y;
                        (x - width / 2.0, x + width / 2.0, *below, *below - y)
                    }
                };
                marks.push(Mark::Rect {
                    xmin,
                    xmax,
                    ymin,
                    ymax,
                    fill: faded(style.fill, style.alpha),
                    outline: style.outline,
                });
            }
        }
        Ok(marks)
    }

    fn smooth(&self, rows: &[usize], method: SmoothMethod) -> Result<Vec<Mark>> {
        let SmoothMethod::Lm { degree } = method;
        let mut marks = Vec::new();
        for group in self.groups(rows) {
            let Some(&first) = group.first() else { continue };
            let (xs, ys): (Vec<f32>, Vec<f32>) = group.iter().filter_map(|&r| self.xy(r)).unzip();
            let Some(fit) = PolyFit::fit(&xs, &ys, degree) else {
                warn!(
                    "{}: skipping group of {} rows, degree {} needs at least {} distinct x values",
                    self.geom.name(),
                    group.len(),
                    degree,
                    degree + 1
                );
                continue;
            };
            let Some((lo, hi)) = span(xs.iter().copied()) else { continue };
            let style = self.style(first);
            marks.push(Mark::Path {
                points: fit.curve(lo, hi, SMOOTH_POINTS),
                color: faded(style.color, style.alpha),
                width: style.stroke_px(),
            });
        }
        Ok(marks)
    }

    fn errorbars(&self, rows: &[usize]) -> Result<Vec<Mark>> {
        if let Some(Column::Categorical(_)) = self.mapped_column(Channel::Ymin) {
            return Err(Error::ColumnType {
                column: self.aes.ymin.clone().unwrap_or_default(),
                expected: "numeric",
                found: "categorical",
            });
        }
        let half_width = self.geom.width.unwrap_or_else(|| self.geom.default_width()) / 2.0;
        Ok(rows
            .iter()
            .filter_map(|&row| {
                let x = self.position(Channel::X, row);
                let ymin = self.position(Channel::Ymin, row);
                let ymax = self.position(Channel::Ymax, row);
                if !(x.is_finite() && ymin.is_finite() && ymax.is_finite()) {
                    return None;
                }
                let style = self.style(row);
                Some(Mark::Errorbar {
                    x,
                    ymin: ymin.min(ymax),
                    ymax: ymin.max(ymax),
                    half_width,
                    color: faded(style.color, style.alpha),
                    width: style.stroke_px(),
                })
            })
            .collect())
    }
}

fn faded(color: Rgba, alpha: f32) -> Rgba {
    color.with_opacity(alpha)
}

/// Smallest gap between distinct finite values, or 1.
fn resolution(values: impl Iterator<Item = f32>) -> f32 {
    let mut sorted: Vec<f32> = values.filter(|v| v.is_finite()).collect();
    sorted.sort_by(f32::total_cmp);
    sorted.dedup();
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > 0.0)
        .min_by(f32::total_cmp)
        .unwrap_or(1.0)
}
