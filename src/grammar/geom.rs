//! Geometry types for Grammar of Graphics.
//!
//! Defines visual representations of data.

use crate::color::Rgba;
use crate::render::PointShape;

use super::aes::{Aes, Channel};
use super::stat::{SmoothMethod, Stat};

/// Points per millimetre; sizes and line widths are given in millimetres.
pub const PT: f32 = 72.27 / 25.4;

/// Geometry type specification.
#[derive(Debug, Clone, PartialEq)]
pub enum GeomType {
    /// Scatter marks.
    Point,
    /// Lines connecting points in x order within each group.
    Line,
    /// Binned counts of `x`.
    Histogram {
        /// Number of bins.
        bins: usize,
    },
    /// Bars with heights taken from `y`.
    Col {
        /// Place bars of different groups side by side.
        dodge: bool,
    },
    /// Fitted curve.
    Smooth {
        /// Fitting method.
        method: SmoothMethod,
    },
    /// Vertical intervals from `ymin` to `ymax` with end caps.
    Errorbar,
    /// Horizontal reference line.
    Hline {
        /// Y intercept.
        yintercept: f32,
    },
    /// Vertical reference line.
    Vline {
        /// X intercept.
        xintercept: f32,
    },
}

/// A geometry layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Geom {
    /// The geometry type.
    pub geom_type: GeomType,
    /// Layer-specific aesthetics, including fixed settings.
    pub aes: Option<Aes>,
    /// Bar or cap width as a fraction of the x resolution.
    pub width: Option<f32>,
    /// Stroke width in millimetres.
    pub linewidth: Option<f32>,
}

impl Geom {
    fn of(geom_type: GeomType) -> Self {
        Self { geom_type, aes: None, width: None, linewidth: None }
    }

    /// Create a point geometry.
    #[must_use]
    pub fn point() -> Self {
        Self::of(GeomType::Point)
    }

    /// Create a line geometry.
    #[must_use]
    pub fn line() -> Self {
        Self::of(GeomType::Line)
    }

    /// Create a histogram with 30 bins.
    #[must_use]
    pub fn histogram() -> Self {
        Self::of(GeomType::Histogram { bins: 30 })
    }

    /// Create a bar geometry whose heights come from `y`.
    #[must_use]
    pub fn col() -> Self {
        Self::of(GeomType::Col { dodge: false })
    }

    /// Create a fitted straight line.
    #[must_use]
    pub fn smooth() -> Self {
        Self::of(GeomType::Smooth { method: SmoothMethod::default() })
    }

    /// Create an error bar geometry.
    #[must_use]
    pub fn errorbar() -> Self {
        Self::of(GeomType::Errorbar)
    }

    /// Create a horizontal reference line.
    #[must_use]
    pub fn hline(yintercept: f32) -> Self {
        Self::of(GeomType::Hline { yintercept })
    }

    /// Create a vertical reference line.
    #[must_use]
    pub fn vline(xintercept: f32) -> Self {
        Self::of(GeomType::Vline { xintercept })
    }

    /// Set the number of histogram bins (minimum 1).
    #[must_use]
    pub fn bins(mut self, bins: usize) -> Self {
        if let GeomType::Histogram { bins: b } = &mut self.geom_type {
            *b = bins.max(1);
        }
        self
    }

    /// Set the smoothing method.
    #[must_use]
    pub fn method(mut self, method: SmoothMethod) -> Self {
        if let GeomType::Smooth { method: m } = &mut self.geom_type {
            *m = method;
        }
        self
    }

    /// Place bars of different groups side by side.
    #[must_use]
    pub fn dodge(mut self) -> Self {
        if let GeomType::Col { dodge } = &mut self.geom_type {
            *dodge = true;
        }
        self
    }

    /// Set the bar or error bar cap width.
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width.max(0.0));
        self
    }

    /// Set the stroke width in millimetres.
    #[must_use]
    pub fn linewidth(mut self, linewidth: f32) -> Self {
        self.linewidth = Some(linewidth.max(0.0));
        self
    }

    /// Set a fixed stroke or point color.
    #[must_use]
    pub fn color(self, color: Rgba) -> Self {
        self.with_aes(|aes| aes.color_value(color))
    }

    /// Set a fixed fill color.
    #[must_use]
    pub fn fill(self, fill: Rgba) -> Self {
        self.with_aes(|aes| aes.fill_value(fill))
    }

    /// Set a fixed opacity.
    #[must_use]
    pub fn alpha(self, alpha: f32) -> Self {
        self.with_aes(|aes| aes.alpha_value(alpha))
    }

    /// Set a fixed point size in millimetres.
    #[must_use]
    pub fn size(self, size: f32) -> Self {
        self.with_aes(|aes| aes.size_value(size))
    }

    /// Set a fixed point shape.
    #[must_use]
    pub fn shape(self, shape: PointShape) -> Self {
        self.with_aes(|aes| aes.shape_value(shape))
    }

    /// Add layer-specific aesthetics; later calls take precedence.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = Some(match self.aes.take() {
            Some(existing) => existing.merge(&aes),
            None => aes,
        });
        self
    }

    fn with_aes(mut self, f: impl FnOnce(Aes) -> Aes) -> Self {
        self.aes = Some(f(self.aes.take().unwrap_or_default()));
        self
    }

    /// Statistical transformation applied before drawing.
    #[must_use]
    pub fn stat(&self) -> Stat {
        match &self.geom_type {
            GeomType::Histogram { bins } => Stat::Bin { bins: *bins },
            GeomType::Smooth { method } => Stat::Smooth { method: *method },
            _ => Stat::Identity,
        }
    }

    /// Name used in plotting code and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.geom_type {
            GeomType::Point => "geom_point",
            GeomType::Line => "geom_line",
            GeomType::Histogram { .. } => "geom_histogram",
            GeomType::Col { .. } => "geom_col",
            GeomType::Smooth { .. } => "geom_smooth",
            GeomType::Errorbar => "geom_errorbar",
            GeomType::Hline { .. } => "geom_hline",
            GeomType::Vline { .. } => "geom_vline",
        }
    }

    /// Channels that must be mapped for this geometry to draw.
    #[must_use]
    pub fn required(&self) -> &'static [Channel] {
        match self.geom_type {
            GeomType::Point | GeomType::Line | GeomType::Col { .. } | GeomType::Smooth { .. } => {
                &[Channel::X, Channel::Y]
            }
            GeomType::Histogram { .. } => &[Channel::X],
            GeomType::Errorbar => &[Channel::X, Channel::Ymin, Channel::Ymax],
            GeomType::Hline { .. } | GeomType::Vline { .. } => &[],
        }
    }

    /// Whether the layer draws filled areas rather than strokes or points.
    #[must_use]
    pub fn is_area(&self) -> bool {
        matches!(self.geom_type, GeomType::Histogram { .. } | GeomType::Col { .. })
    }

    /// Color used when neither a mapping nor a fixed color applies.
    #[must_use]
    pub fn default_color(&self) -> Rgba {
        match self.geom_type {
            GeomType::Smooth { .. } => Rgba::rgb(0x33, 0x66, 0xFF),
            GeomType::Histogram { .. } | GeomType::Col { .. } => Rgba::rgb(89, 89, 89),
            _ => Rgba::BLACK,
        }
    }

    /// Stroke width in millimetres when not set explicitly.
    #[must_use]
    pub fn default_linewidth(&self) -> f32 {
        match self.geom_type {
            GeomType::Smooth { .. } => 1.0,
            _ => 0.5,
        }
    }

    /// Bar or cap width when not set explicitly.
    #[must_use]
    pub fn default_width(&self) -> f32 {
        match self.geom_type {
            GeomType::Errorbar => 0.5,
            _ => 0.9,
        }
    }
}
