//! Aesthetic mappings for Grammar of Graphics.
//!
//! Maps data columns to visual properties.

use crate::color::Rgba;
use crate::render::PointShape;

/// A visual property a column can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Stroke and point color.
    Color,
    /// Area fill color.
    Fill,
    /// Point glyph.
    Shape,
    /// Point size or line width.
    Size,
    /// Opacity.
    Alpha,
    /// Grouping for lines and fits, without a visual property of its own.
    Group,
    /// Lower end of an interval.
    Ymin,
    /// Upper end of an interval.
    Ymax,
}

impl Channel {
    /// Non-position channels that produce legends, in legend order.
    pub const LEGEND: [Channel; 5] =
        [Channel::Color, Channel::Fill, Channel::Shape, Channel::Size, Channel::Alpha];

    /// Lower-case channel name as written in plotting code.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Channel::X => "x",
            Channel::Y => "y",
            Channel::Color => "color",
            Channel::Fill => "fill",
            Channel::Shape => "shape",
            Channel::Size => "size",
            Channel::Alpha => "alpha",
            Channel::Group => "group",
            Channel::Ymin => "ymin",
            Channel::Ymax => "ymax",
        }
    }
}

/// Aesthetic mapping specification.
///
/// Maps data columns to visual properties like x, y, color, size, shape.
/// The `*_value` fields set a property to a constant for every mark instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aes {
    /// X position mapping (column name).
    pub x: Option<String>,
    /// Y position mapping (column name).
    pub y: Option<String>,
    /// Color mapping (column name).
    pub color: Option<String>,
    /// Fill color mapping (column name).
    pub fill: Option<String>,
    /// Shape mapping (column name).
    pub shape: Option<String>,
    /// Size mapping (column name).
    pub size: Option<String>,
    /// Alpha/opacity mapping (column name).
    pub alpha: Option<String>,
    /// Group mapping (column name).
    pub group: Option<String>,
    /// Interval lower bound (column name).
    pub ymin: Option<String>,
    /// Interval upper bound (column name).
    pub ymax: Option<String>,

    // Fixed values (not data-mapped)
    /// Fixed color value.
    pub color_value: Option<Rgba>,
    /// Fixed fill value.
    pub fill_value: Option<Rgba>,
    /// Fixed shape value.
    pub shape_value: Option<PointShape>,
    /// Fixed size value.
    pub size_value: Option<f32>,
    /// Fixed alpha value.
    pub alpha_value: Option<f32>,
}

impl Aes {
    /// Create a new aesthetic mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map x position to a column.
    #[must_use]
    pub fn x(mut self, column: &str) -> Self {
        self.x = Some(column.to_string());
        self
    }

    /// Map y position to a column.
    #[must_use]
    pub fn y(mut self, column: &str) -> Self {
        self.y = Some(column.to_string());
        self
    }

    /// Map color to a column.
    #[must_use]
    pub fn color(mut self, column: &str) -> Self {
        self.color = Some(column.to_string());
        self
    }

    /// Map fill color to a column.
    #[must_use]
    pub fn fill(mut self, column: &str) -> Self {
        self.fill = Some(column.to_string());
        self
    }

    /// Map shape to a column.
    #[must_use]
    pub fn shape(mut self, column: &str) -> Self {
        self.shape = Some(column.to_string());
        self
    }

    /// Map size to a column.
    #[must_use]
    pub fn size(mut self, column: &str) -> Self {
        self.size = Some(column.to_string());
        self
    }

    /// Map alpha/opacity to a column.
    #[must_use]
    pub fn alpha(mut self, column: &str) -> Self {
        self.alpha = Some(column.to_string());
        self
    }

    /// Map group to a column.
    #[must_use]
    pub fn group(mut self, column: &str) -> Self {
        self.group = Some(column.to_string());
        self
    }

    /// Map the lower interval bound to a column.
    #[must_use]
    pub fn ymin(mut self, column: &str) -> Self {
        self.ymin = Some(column.to_string());
        self
    }

    /// Map the upper interval bound to a column.
    #[must_use]
    pub fn ymax(mut self, column: &str) -> Self {
        self.ymax = Some(column.to_string());
        self
    }

    /// Set a fixed color value.
    #[must_use]
    pub fn color_value(mut self, color: Rgba) -> Self {
        self.color_value = Some(color);
        self
    }

    /// Set a fixed fill value.
    #[must_use]
    pub fn fill_value(mut self, fill: Rgba) -> Self {
        self.fill_value = Some(fill);
        self
    }

    /// Set a fixed point shape.
    #[must_use]
    pub fn shape_value(mut self, shape: PointShape) -> Self {
        self.shape_value = Some(shape);
        self
    }

    /// Set a fixed size value.
    #[must_use]
    pub fn size_value(mut self, size: f32) -> Self {
        self.size_value = Some(size.max(0.0));
        self
    }

    /// Set a fixed alpha value.
    #[must_use]
    pub fn alpha_value(mut self, alpha: f32) -> Self {
        self.alpha_value = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Column mapped to `channel`, if any.
    #[must_use]
    pub fn column(&self, channel: Channel) -> Option<&str> {
        let slot = match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::Color => &self.color,
            Channel::Fill => &self.fill,
            Channel::Shape => &self.shape,
            Channel::Size => &self.size,
            Channel::Alpha => &self.alpha,
            Channel::Group => &self.group,
            Channel::Ymin => &self.ymin,
            Channel::Ymax => &self.ymax,
        };
        slot.as_deref()
    }

    /// Every mapped `(channel, column)` pair.
    #[must_use]
    pub fn mappings(&self) -> Vec<(Channel, &str)> {
        [
            Channel::X,
            Channel::Y,
            Channel::Color,
            Channel::Fill,
            Channel::Shape,
            Channel::Size,
            Channel::Alpha,
            Channel::Group,
            Channel::Ymin,
            Channel::Ymax,
        ]
        .into_iter()
        .filter_map(|ch| self.column(ch).map(|col| (ch, col)))
        .collect()
    }

    /// Merge another Aes, with other taking precedence.
    ///
    /// Setting a fixed value in `other` overrides a column mapping of the
    /// same channel in `self`, and vice versa.
    #[must_use]
    pub fn merge(&self, other: &Aes) -> Aes {
        fn pick(
            mine: &Option<String>,
            theirs: &Option<String>,
            fixed_override: bool,
        ) -> Option<String> {
            if theirs.is_some() {
                theirs.clone()
            } else if fixed_override {
                None
            } else {
                mine.clone()
            }
        }

        // a column mapping in `other` clears any fixed value
        fn fixed<T>(mapped: &Option<String>, mine: Option<T>, theirs: Option<T>) -> Option<T> {
            if mapped.is_some() {
                None
            } else {
                theirs.or(mine)
            }
        }

        Aes {
            x: other.x.clone().or_else(|| self.x.clone()),
            y: other.y.clone().or_else(|| self.y.clone()),
            color: pick(&self.color, &other.color, other.color_value.is_some()),
            fill: pick(&self.fill, &other.fill, other.fill_value.is_some()),
            shape: pick(&self.shape, &other.shape, other.shape_value.is_some()),
            size: pick(&self.size, &other.size, other.size_value.is_some()),
            alpha: pick(&self.alpha, &other.alpha, other.alpha_value.is_some()),
            group: other.group.clone().or_else(|| self.group.clone()),
            ymin: other.ymin.clone().or_else(|| self.ymin.clone()),
            ymax: other.ymax.clone().or_else(|| self.ymax.clone()),
            color_value: fixed(&other.color, self.color_value, other.color_value),
            fill_value: fixed(&other.fill, self.fill_value, other.fill_value),
            shape_value: fixed(&other.shape, self.shape_value, other.shape_value),
            size_value: fixed(&other.size, self.size_value, other.size_value),
            alpha_value: fixed(&other.alpha, self.alpha_value, other.alpha_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aes_builder() {
        let aes = Aes::new().x("xvar").y("yvar").color("category").size_value(5.0);

        assert_eq!(aes.x, Some("xvar".to_string()));
        assert_eq!(aes.y, Some("yvar".to_string()));
        assert_eq!(aes.color, Some("category".to_string()));
        assert_eq!(aes.size_value, Some(5.0));
    }

    #[test]
    fn test_aes_merge() {
        let base = Aes::new().x("x").y("y").color_value(Rgba::RED);
        let override_aes = Aes::new().y("y2").size_value(3.0);

        let merged = base.merge(&override_aes);
        assert_eq!(merged.x, Some("x".to_string()));
        assert_eq!(merged.y, Some("y2".to_string()));
        assert_eq!(merged.color_value, Some(Rgba::RED));
        assert_eq!(merged.size_value, Some(3.0));
    }

    #[test]
    fn test_fixed_value_overrides_mapping() {
        let base = Aes::new().x("x").color("rank");
        let layer = Aes::new().color_value(Rgba::BLUE);
        let merged = base.merge(&layer);
        assert!(merged.color.is_none());
        assert_eq!(merged.color_value, Some(Rgba::BLUE));

        let remapped = Aes::new().color_value(Rgba::RED).merge(&Aes::new().color("sex"));
        assert_eq!(remapped.color.as_deref(), Some("sex"));
        assert!(remapped.color_value.is_none());
    }

    #[test]
    fn test_interval_channels() {
        let aes = Aes::new().x("sex").ymin("lower").ymax("upper");
        assert_eq!(aes.column(Channel::Ymin), Some("lower"));
        assert_eq!(aes.column(Channel::Ymax), Some("upper"));
        assert_eq!(aes.column(Channel::Y), None);
    }

    #[test]
    fn test_mappings_lists_columns_in_channel_order() {
        let aes = Aes::new().shape("sex").x("yrs").color("rank").alpha_value(0.5);
        let pairs = aes.mappings();
        assert_eq!(
            pairs,
            vec![(Channel::X, "yrs"), (Channel::Color, "rank"), (Channel::Shape, "sex")]
        );
    }

    #[test]
    fn test_aes_alpha_value_clamp() {
        assert_eq!(Aes::new().alpha_value(1.5).alpha_value, Some(1.0));
        assert_eq!(Aes::new().alpha_value(-0.5).alpha_value, Some(0.0));
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Color.name(), "color");
        assert_eq!(Channel::LEGEND.len(), 5);
    }
}
