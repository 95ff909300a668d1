//! Trained scales: position axes and the color, shape, size and alpha
//! mappings behind legends.
//!
//! A scale is trained on every layer that maps its channel, so all layers
//! (and all facet panels) agree on which level gets which color.

use crate::color::{hue_palette, Rgba};
use crate::data::Column;
use crate::error::{Error, Result};
use crate::render::PointShape;
use crate::scale::{expand_range, nice_breaks, LabelFormat, LinearScale};

use super::aes::Channel;

/// Continuous ranges are padded by this fraction on each side.
pub const CONTINUOUS_EXPAND: f32 = 0.05;
/// Discrete ranges are padded by this many positions on each side.
pub const DISCRETE_EXPAND: f32 = 0.6;
/// Point size range (millimetres) for size mappings.
pub const SIZE_RANGE: (f32, f32) = (1.0, 6.0);
/// Opacity range for alpha mappings.
pub const ALPHA_RANGE: (f32, f32) = (0.1, 1.0);

/// User settings for a position scale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScaleSpec {
    /// Axis title override.
    pub title: Option<String>,
    /// Data range shown; marks outside are dropped.
    pub limits: Option<(f32, f32)>,
    /// Explicit tick positions.
    pub breaks: Option<Vec<f32>>,
    /// Tick label format.
    pub format: LabelFormat,
}

impl ScaleSpec {
    /// Default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axis title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Fix the data range.
    #[must_use]
    pub fn limits(mut self, min: f32, max: f32) -> Self {
        self.limits = Some((min.min(max), min.max(max)));
        self
    }

    /// Place ticks at `breaks`.
    #[must_use]
    pub fn breaks(mut self, breaks: Vec<f32>) -> Self {
        self.breaks = Some(breaks);
        self
    }

    /// Place ticks every `step` from `from` to `to` inclusive.
    #[must_use]
    pub fn breaks_seq(self, from: f32, to: f32, step: f32) -> Self {
        if step <= 0.0 {
            return self;
        }
        let count = ((to - from) / step + 1e-4).floor().max(0.0) as usize;
        self.breaks((0..=count).map(|i| from + i as f32 * step).collect())
    }

    /// Set the tick label format.
    #[must_use]
    pub fn format(mut self, format: LabelFormat) -> Self {
        self.format = format;
        self
    }
}

// ============================================================================
// Position scales
// ============================================================================

/// A trained x or y scale for one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionScale {
    /// Expanded data range mapped onto the panel.
    pub range: (f32, f32),
    /// Major tick positions.
    pub breaks: Vec<f32>,
    /// Tick labels, one per break.
    pub labels: Vec<String>,
    /// Minor grid positions.
    pub minor: Vec<f32>,
}

impl PositionScale {
    /// Continuous scale over `extent` (the data range of every mark).
    #[must_use]
    pub fn continuous(extent: Option<(f32, f32)>, spec: &ScaleSpec) -> Self {
        let limits = spec.limits.or(extent).unwrap_or((0.0, 1.0));
        let range = expand_range(limits, CONTINUOUS_EXPAND);
        let breaks: Vec<f32> = match &spec.breaks {
            Some(explicit) => {
                explicit.iter().copied().filter(|b| *b >= range.0 && *b <= range.1).collect()
            }
            None => nice_breaks(range.0, range.1, 5),
        };
        let labels = spec.format.format_breaks(&breaks);
        let minor = minor_breaks(&breaks, range);
        Self { range, breaks, labels, minor }
    }

    /// Discrete scale placing `levels` at positions `1..=k`.
    ///
    /// `extent` widens the range to cover marks drawn off the integer
    /// positions, such as bars and dodged groups.
    #[must_use]
    pub fn discrete(levels: &[String], extent: Option<(f32, f32)>) -> Self {
        let k = levels.len().max(1) as f32;
        let (lo, hi) = extent.unwrap_or((1.0, k));
        let range = ((1.0 - DISCRETE_EXPAND).min(lo), (k + DISCRETE_EXPAND).max(hi));
        let breaks = (1..=levels.len()).map(|i| i as f32).collect();
        Self { range, breaks, labels: levels.to_vec(), minor: Vec::new() }
    }

    /// Map this scale onto a pixel interval.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is degenerate.
    pub fn to_pixels(&self, pixels: (f32, f32)) -> Result<LinearScale> {
        LinearScale::new(self.range, pixels)
    }

    /// Whether `value` lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.range.0 && value <= self.range.1
    }
}

fn minor_breaks(breaks: &[f32], range: (f32, f32)) -> Vec<f32> {
    if breaks.len() < 2 {
        return Vec::new();
    }
    let step = breaks[1] - breaks[0];
    let first = breaks[0] - step / 2.0;
    (0..=breaks.len())
        .map(|i| first + i as f32 * step)
        .filter(|m| *m > range.0 && *m < range.1)
        .collect()
}

// ============================================================================
// Aesthetic scales
// ============================================================================

/// Value assigned to each level of a discrete mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteMap<T> {
    levels: Vec<String>,
    values: Vec<T>,
}

impl<T: Copy> DiscreteMap<T> {
    fn new(levels: Vec<String>, values: Vec<T>) -> Self {
        Self { levels, values }
    }

    /// Levels in legend order.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Value for a level.
    #[must_use]
    pub fn get(&self, level: &str) -> Option<T> {
        self.levels.iter().position(|l| l == level).map(|i| self.values[i])
    }

    /// `(level, value)` pairs in legend order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, T)> + '_ {
        self.levels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}

/// Color or fill mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    /// One palette color per level.
    Discrete(DiscreteMap<Rgba>),
    /// Linear blend between two colors.
    Gradient {
        /// Data range.
        domain: (f32, f32),
        /// Color at the low end.
        low: Rgba,
        /// Color at the high end.
        high: Rgba,
    },
}

/// Size or alpha mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericScale {
    /// Evenly spaced values per level.
    Discrete(DiscreteMap<f32>),
    /// Continuous interpolation.
    Continuous {
        /// Data range.
        domain: (f32, f32),
        /// Output range.
        range: (f32, f32),
        /// Interpolate by area (square root) instead of linearly.
        area: bool,
    },
}

/// Shape mapping (discrete only).
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeScale(pub DiscreteMap<PointShape>);

/// Map a data cell through a trained scale.
pub trait AesScale<T> {
    /// Value for row `row` of `column`; `None` for missing or foreign data.
    fn map(&self, column: &Column, row: usize) -> Option<T>;
}

impl AesScale<Rgba> for ColorScale {
    fn map(&self, column: &Column, row: usize) -> Option<Rgba> {
        match (self, column) {
            (ColorScale::Discrete(map), Column::Categorical(f)) => map.get(f.label(row)),
            (ColorScale::Gradient { .. }, Column::Numeric(values)) => self.gradient(values[row]),
            _ => None,
        }
    }
}

impl ColorScale {
    /// Color for a numeric value on a gradient scale.
    #[must_use]
    pub fn gradient(&self, value: f32) -> Option<Rgba> {
        match self {
            ColorScale::Gradient { domain, low, high } if value.is_finite() => {
                Some(low.lerp(*high, unit(value, *domain)))
            }
            _ => None,
        }
    }
}

impl AesScale<f32> for NumericScale {
    fn map(&self, column: &Column, row: usize) -> Option<f32> {
        match (self, column) {
            (NumericScale::Discrete(map), Column::Categorical(f)) => map.get(f.label(row)),
            (NumericScale::Continuous { .. }, Column::Numeric(values)) => self.value(values[row]),
            _ => None,
        }
    }
}

impl NumericScale {
    /// Output for a numeric value on a continuous scale.
    #[must_use]
    pub fn value(&self, value: f32) -> Option<f32> {
        match self {
            NumericScale::Continuous { domain, range, area } if value.is_finite() => {
                let t = unit(value, *domain);
                let t = if *area { t.sqrt() } else { t };
                Some(range.0 + t * (range.1 - range.0))
            }
            _ => None,
        }
    }
}

impl AesScale<PointShape> for ShapeScale {
    fn map(&self, column: &Column, row: usize) -> Option<PointShape> {
        match column {
            Column::Categorical(f) => self.0.get(f.label(row)),
            Column::Numeric(_) => None,
        }
    }
}

/// Position of `value` within `domain`, clamped to `[0, 1]`.
fn unit(value: f32, (lo, hi): (f32, f32)) -> f32 {
    if hi > lo {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

/// A trained scale plus the column it was first mapped from.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapped<S> {
    /// Column name, used for legend titles and merging.
    pub column: String,
    /// The trained scale.
    pub scale: S,
}

/// Every non-position scale of a plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AestheticScales {
    /// Stroke and point color.
    pub color: Option<Mapped<ColorScale>>,
    /// Area fill.
    pub fill: Option<Mapped<ColorScale>>,
    /// Point glyph.
    pub shape: Option<Mapped<ShapeScale>>,
    /// Point size.
    pub size: Option<Mapped<NumericScale>>,
    /// Opacity.
    pub alpha: Option<Mapped<NumericScale>>,
}

impl AestheticScales {
    /// Column behind a legend channel, if mapped.
    #[must_use]
    pub fn column(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Color => self.color.as_ref().map(|m| m.column.as_str()),
            Channel::Fill => self.fill.as_ref().map(|m| m.column.as_str()),
            Channel::Shape => self.shape.as_ref().map(|m| m.column.as_str()),
            Channel::Size => self.size.as_ref().map(|m| m.column.as_str()),
            Channel::Alpha => self.alpha.as_ref().map(|m| m.column.as_str()),
            _ => None,
        }
    }

    /// Levels of a discrete scale, or `None` for continuous or unmapped
    /// channels.
    #[must_use]
    pub fn levels(&self, channel: Channel) -> Option<&[String]> {
        fn color(m: &Option<Mapped<ColorScale>>) -> Option<&[String]> {
            match m.as_ref().map(|m| &m.scale) {
                Some(ColorScale::Discrete(map)) => Some(map.levels()),
                _ => None,
            }
        }
        fn numeric(m: &Option<Mapped<NumericScale>>) -> Option<&[String]> {
            match m.as_ref().map(|m| &m.scale) {
                Some(NumericScale::Discrete(map)) => Some(map.levels()),
                _ => None,
            }
        }
        match channel {
            Channel::Color => color(&self.color),
            Channel::Fill => color(&self.fill),
            Channel::Shape => self.shape.as_ref().map(|m| m.scale.0.levels()),
            Channel::Size => numeric(&self.size),
            Channel::Alpha => numeric(&self.alpha),
            _ => None,
        }
    }
}

// ============================================================================
// Training
// ============================================================================

/// Shared discrete levels of position columns, `None` when they are numeric.
///
/// # Errors
///
/// Returns an error if the columns mix kinds.
pub fn position_levels(columns: &[Trainee<'_>]) -> Result<Option<Vec<String>>> {
    if columns.is_empty() || !kind_check(columns)? {
        return Ok(None);
    }
    Ok(Some(union_levels(columns)))
}

/// Columns mapped to one channel across layers, with their names.
pub type Trainee<'a> = (&'a str, &'a Column);

/// Levels occurring in categorical columns, in the first column's level
/// order, followed by unseen levels of later columns.
fn union_levels(columns: &[Trainee<'_>]) -> Vec<String> {
    let mut levels: Vec<String> = Vec::new();
    for (_, column) in columns {
        if let Column::Categorical(f) = column {
            for level in f.present_levels() {
                if !levels.contains(&level) {
                    levels.push(level);
                }
            }
        }
    }
    levels
}

fn union_range(columns: &[Trainee<'_>]) -> (f32, f32) {
    let (lo, hi) = columns
        .iter()
        .filter_map(|(_, c)| match c {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        })
        .flat_map(|v| v.iter().copied().filter(|x| x.is_finite()))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)));
    if lo.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

fn kind_check(columns: &[Trainee<'_>]) -> Result<bool> {
    let discrete = matches!(columns.first(), Some((_, Column::Categorical(_))));
    for (name, column) in columns {
        if matches!(column, Column::Categorical(_)) != discrete {
            return Err(Error::ColumnType {
                column: (*name).to_string(),
                expected: if discrete { "categorical" } else { "numeric" },
                found: column.kind(),
            });
        }
    }
    Ok(discrete)
}

/// Train a color or fill scale.
///
/// # Errors
///
/// Returns an error if the columns mix kinds or a manual palette has fewer
/// colors than there are levels.
pub fn train_color(columns: &[Trainee<'_>], manual: Option<&[Rgba]>) -> Result<ColorScale> {
    if kind_check(columns)? {
        let levels = union_levels(columns);
        let colors = match manual {
            Some(values) if values.len() < levels.len() => {
                return Err(Error::Palette(format!(
                    "insufficient values in manual scale: {} needed but only {} provided",
                    levels.len(),
                    values.len()
                )));
            }
            Some(values) => values[..levels.len()].to_vec(),
            None => hue_palette(levels.len()),
        };
        Ok(ColorScale::Discrete(DiscreteMap::new(levels, colors)))
    } else {
        Ok(ColorScale::Gradient {
            domain: union_range(columns),
            low: Rgba::GRADIENT_LOW,
            high: Rgba::GRADIENT_HIGH,
        })
    }
}

/// Train a shape scale.
///
/// # Errors
///
/// Returns an error for numeric columns or more than six levels.
pub fn train_shape(columns: &[Trainee<'_>]) -> Result<ShapeScale> {
    for (name, column) in columns {
        if let Column::Numeric(_) = column {
            return Err(Error::ColumnType {
                column: (*name).to_string(),
                expected: "categorical",
                found: "numeric",
            });
        }
    }
    let levels = union_levels(columns);
    if levels.len() > PointShape::PALETTE.len() {
        return Err(Error::Palette(format!(
            "the shape palette can deal with a maximum of {} discrete values, {} requested",
            PointShape::PALETTE.len(),
            levels.len()
        )));
    }
    let shapes = PointShape::PALETTE[..levels.len()].to_vec();
    Ok(ShapeScale(DiscreteMap::new(levels, shapes)))
}

/// Train a size (`area = true`) or alpha scale over `range`.
///
/// # Errors
///
/// Returns an error if the columns mix kinds.
pub fn train_numeric(
    columns: &[Trainee<'_>],
    range: (f32, f32),
    area: bool,
) -> Result<NumericScale> {
    if kind_check(columns)? {
        let levels = union_levels(columns);
        let n = levels.len();
        let step = if n <= 1 { 0.0 } else { (range.1 - range.0) / (n - 1) as f32 };
        let values = (0..n)
            .map(|i| if n <= 1 { range.1 } else { range.0 + step * i as f32 })
            .collect();
        Ok(NumericScale::Discrete(DiscreteMap::new(levels, values)))
    } else {
        Ok(NumericScale::Continuous { domain: union_range(columns), range, area })
    }
}

/// Legend break values for a continuous domain, aiming for four keys.
#[must_use]
pub fn legend_breaks((lo, hi): (f32, f32)) -> Vec<f32> {
    if hi <= lo {
        return vec![lo];
    }
    let candidates: Vec<Vec<f32>> =
        [4, 5, 3, 6, 7, 8, 2].iter().map(|&t| nice_breaks(lo, hi, t)).collect();
    if let Some(exact) = candidates.iter().find(|b| b.len() == 4) {
        return exact.clone();
    }
    if let Some(more) = candidates.iter().find(|b| b.len() > 4) {
        return more[..4].to_vec();
    }
    candidates
        .into_iter()
        .max_by_key(Vec::len)
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| vec![lo, hi])
}

/// Label format for legend values of a continuous domain.
#[must_use]
pub fn legend_format((lo, hi): (f32, f32)) -> LabelFormat {
    if lo.abs().max(hi.abs()) >= 10_000.0 {
        LabelFormat::Comma
    } else {
        LabelFormat::Plain
    }
}
