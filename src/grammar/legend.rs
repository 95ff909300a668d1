//! Legend guides built from trained aesthetic scales.

use crate::color::Rgba;
use crate::render::PointShape;
use crate::scale::nice_breaks;

use super::aes::{Aes, Channel};
use super::geom::{Geom, GeomType};
use super::labels::Labels;
use super::marks::Style;
use super::scales::{legend_breaks, legend_format, AestheticScales, ColorScale, NumericScale};

/// Glyph drawn inside a legend key for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyGlyph {
    /// Point marker.
    Point,
    /// Horizontal line.
    Path,
    /// Filled box.
    Rect,
}

impl KeyGlyph {
    fn of(geom: &Geom) -> Option<Self> {
        match geom.geom_type {
            GeomType::Point => Some(KeyGlyph::Point),
            GeomType::Line | GeomType::Smooth { .. } | GeomType::Errorbar => Some(KeyGlyph::Path),
            GeomType::Histogram { .. } | GeomType::Col { .. } => Some(KeyGlyph::Rect),
            GeomType::Hline { .. } | GeomType::Vline { .. } => None,
        }
    }
}

/// A layer contributing glyphs to a legend.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLayer {
    /// Glyph kind.
    pub glyph: KeyGlyph,
    /// The layer's fixed appearance.
    pub style: Style,
    /// Legend channels this layer maps to the legend's column.
    pub channels: Vec<Channel>,
}

impl KeyLayer {
    /// The layer's style with the key's values applied to mapped channels.
    #[must_use]
    pub fn styled(&self, key: &LegendKey) -> Style {
        let mut style = self.style;
        for channel in &self.channels {
            match channel {
                Channel::Color => {
                    if let Some(color) = key.color {
                        style.color = color;
                        if self.glyph == KeyGlyph::Rect {
                            style.outline = Some(color);
                        }
                    }
                }
                Channel::Fill => style.fill = key.fill.unwrap_or(style.fill),
                Channel::Shape => style.shape = key.shape.unwrap_or(style.shape),
                Channel::Size => style.size = key.size.unwrap_or(style.size),
                Channel::Alpha => style.alpha = key.alpha.unwrap_or(style.alpha),
                _ => {}
            }
        }
        style
    }
}

/// One entry of a key legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendKey {
    /// Entry label.
    pub label: String,
    /// Mapped color.
    pub color: Option<Rgba>,
    /// Mapped fill.
    pub fill: Option<Rgba>,
    /// Mapped shape.
    pub shape: Option<PointShape>,
    /// Mapped point size in millimetres.
    pub size: Option<f32>,
    /// Mapped opacity.
    pub alpha: Option<f32>,
}

impl LegendKey {
    fn labelled(label: String) -> Self {
        Self { label, color: None, fill: None, shape: None, size: None, alpha: None }
    }
}

/// How a legend presents its scale.
#[derive(Debug, Clone, PartialEq)]
pub enum Guide {
    /// Discrete keys, each drawn with every contributing layer.
    Keys {
        /// Entries, top to bottom.
        keys: Vec<LegendKey>,
        /// Layers drawn in each key.
        layers: Vec<KeyLayer>,
    },
    /// Continuous gradient bar.
    ColorBar {
        /// Color at the bottom.
        low: Rgba,
        /// Color at the top.
        high: Rgba,
        /// `(position in [0, 1], label)` ticks.
        ticks: Vec<(f32, String)>,
    },
}

/// A legend for one mapped column.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    /// Legend title.
    pub title: String,
    /// Column shown.
    pub column: String,
    /// Channels merged into this legend.
    pub channels: Vec<Channel>,
    /// Presentation.
    pub guide: Guide,
}

/// Build one legend per mapped column, merging channels that share it.
#[must_use]
pub fn build_legends(
    scales: &AestheticScales,
    labels: &Labels,
    layers: &[(&Geom, &Aes)],
) -> Vec<Legend> {
    let mut groups: Vec<(String, Vec<Channel>)> = Vec::new();
    for channel in Channel::LEGEND {
        if let Some(column) = scales.column(channel) {
            match groups.iter_mut().find(|(c, _)| c == column) {
                Some((_, channels)) => channels.push(channel),
                None => groups.push((column.to_string(), vec![channel])),
            }
        }
    }

    groups
        .into_iter()
        .map(|(column, channels)| {
            let title = channels
                .iter()
                .find_map(|c| labels.channel(*c))
                .map_or_else(|| column.clone(), str::to_string);
            let guide = guide(scales, &column, &channels, layers);
            Legend { title, column, channels, guide }
        })
        .collect()
}

fn guide(
    scales: &AestheticScales,
    column: &str,
    channels: &[Channel],
    layers: &[(&Geom, &Aes)],
) -> Guide {
    if let Some(levels) = channels.iter().find_map(|c| scales.levels(*c)) {
        let keys = levels.iter().map(|level| discrete_key(scales, channels, level)).collect();
        return Guide::Keys { keys, layers: key_layers(column, channels, layers) };
    }

    let only_colors = channels.iter().all(|c| matches!(c, Channel::Color | Channel::Fill));
    let gradient = channels.iter().find_map(|c| match c {
        Channel::Color => scales.color.as_ref().map(|m| &m.scale),
        Channel::Fill => scales.fill.as_ref().map(|m| &m.scale),
        _ => None,
    });
    if let (true, Some(&ColorScale::Gradient { domain, low, high })) = (only_colors, gradient) {
        let breaks: Vec<f32> = nice_breaks(domain.0, domain.1, 5)
            .into_iter()
            .filter(|b| *b >= domain.0 && *b <= domain.1)
            .collect();
        let labels = legend_format(domain).format_breaks(&breaks);
        let ticks = breaks
            .iter()
            .zip(labels)
            .map(|(&b, label)| {
                let span = domain.1 - domain.0;
                let t = if span > 0.0 { (b - domain.0) / span } else { 0.5 };
                (t, label)
            })
            .collect();
        return Guide::ColorBar { low, high, ticks };
    }

    let domain = channels
        .iter()
        .find_map(|c| match c {
            Channel::Size => scales.size.as_ref(),
            Channel::Alpha => scales.alpha.as_ref(),
            _ => None,
        })
        .and_then(|m| match m.scale {
            NumericScale::Continuous { domain, .. } => Some(domain),
            NumericScale::Discrete(_) => None,
        })
        .unwrap_or((0.0, 1.0));
    let breaks = legend_breaks(domain);
    let labels = legend_format(domain).format_breaks(&breaks);
    let keys = breaks
        .iter()
        .zip(labels)
        .map(|(&value, label)| continuous_key(scales, channels, value, label))
        .collect();
    Guide::Keys { keys, layers: key_layers(column, channels, layers) }
}

fn discrete_key(scales: &AestheticScales, channels: &[Channel], level: &str) -> LegendKey {
    let mut key = LegendKey::labelled(level.to_string());
    let color = |scale: Option<&ColorScale>| match scale {
        Some(ColorScale::Discrete(map)) => map.get(level),
        _ => None,
    };
    let numeric = |scale: Option<&NumericScale>| match scale {
        Some(NumericScale::Discrete(map)) => map.get(level),
        _ => None,
    };
    for channel in channels {
        match channel {
            Channel::Color => key.color = color(scales.color.as_ref().map(|m| &m.scale)),
            Channel::Fill => key.fill = color(scales.fill.as_ref().map(|m| &m.scale)),
            Channel::Shape => key.shape = scales.shape.as_ref().and_then(|m| m.scale.0.get(level)),
            Channel::Size => key.size = numeric(scales.size.as_ref().map(|m| &m.scale)),
            Channel::Alpha => key.alpha = numeric(scales.alpha.as_ref().map(|m| &m.scale)),
            _ => {}
        }
    }
    key
}

fn continuous_key(
    scales: &AestheticScales,
    channels: &[Channel],
    value: f32,
    label: String,
) -> LegendKey {
    let mut key = LegendKey::labelled(label);
    for channel in channels {
        match channel {
            Channel::Color => {
                key.color = scales.color.as_ref().and_then(|m| m.scale.gradient(value));
            }
            Channel::Fill => key.fill = scales.fill.as_ref().and_then(|m| m.scale.gradient(value)),
            Channel::Size => key.size = scales.size.as_ref().and_then(|m| m.scale.value(value)),
            Channel::Alpha => key.alpha = scales.alpha.as_ref().and_then(|m| m.scale.value(value)),
            _ => {}
        }
    }
    key
}

fn key_layers(column: &str, channels: &[Channel], layers: &[(&Geom, &Aes)]) -> Vec<KeyLayer> {
    layers
        .iter()
        .filter_map(|(geom, aes)| {
            let glyph = KeyGlyph::of(geom)?;
            let mapped: Vec<Channel> =
                channels.iter().copied().filter(|c| aes.column(*c) == Some(column)).collect();
            (!mapped.is_empty()).then(|| KeyLayer {
                glyph,
                style: Style::defaults(geom, aes),
                channels: mapped,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Factor};
    use crate::grammar::scales::{train_color, train_numeric, train_shape, Mapped, SIZE_RANGE};

    fn mapped<S>(column: &str, scale: S) -> Option<Mapped<S>> {
        Some(Mapped { column: column.into(), scale })
    }

    fn rank() -> Column {
        Column::Categorical(Factor::new(&["Prof", "AsstProf", "AssocProf"]))
    }

    #[test]
    fn test_shared_column_merges_channels() {
        let col = rank();
        let scales = AestheticScales {
            color: mapped("rank", train_color(&[("rank", &col)], None).unwrap()),
            shape: mapped("rank", train_shape(&[("rank", &col)]).unwrap()),
            ..AestheticScales::default()
        };
        let geom = Geom::point();
        let aes = Aes::new().x("x").y("y").color("rank").shape("rank");
        let legends = build_legends(&scales, &Labels::new(), &[(&geom, &aes)]);
        assert_eq!(legends.len(), 1);
        assert_eq!(legends[0].channels, vec![Channel::Color, Channel::Shape]);
        match &legends[0].guide {
            Guide::Keys { keys, layers } => {
                assert_eq!(keys.len(), 3);
                assert_eq!(keys[1].shape, Some(PointShape::Triangle));
                assert_eq!(layers[0].glyph, KeyGlyph::Point);
                let style = layers[0].styled(&keys[0]);
                assert_eq!(Some(style.color), keys[0].color);
            }
            Guide::ColorBar { .. } => panic!("expected keys"),
        }
    }

    #[test]
    fn test_title_from_labels() {
        let col = rank();
        let scales = AestheticScales {
            color: mapped("rank", train_color(&[("rank", &col)], None).unwrap()),
            ..AestheticScales::default()
        };
        let legends = build_legends(&scales, &Labels::new().color("Rank"), &[]);
        assert_eq!(legends[0].title, "Rank");
    }

    #[test]
    fn test_continuous_color_bar() {
        let col = Column::Numeric(vec![0.0, 50.0, 100.0]);
        let scales = AestheticScales {
            color: mapped("v", train_color(&[("v", &col)], None).unwrap()),
            ..AestheticScales::default()
        };
        let legends = build_legends(&scales, &Labels::new(), &[]);
        match &legends[0].guide {
            Guide::ColorBar { ticks, .. } => {
                assert!(ticks.len() >= 3);
                assert_eq!(ticks[0], (0.0, "0".to_string()));
            }
            Guide::Keys { .. } => panic!("expected bar"),
        }
    }

    #[test]
    fn test_continuous_size_four_keys() {
        let col = Column::Numeric(vec![1.0e6, 5.0e8, 1.3e9]);
        let scales = AestheticScales {
            size: mapped("pop", train_numeric(&[("pop", &col)], SIZE_RANGE, true).unwrap()),
            ..AestheticScales::default()
        };
        let geom = Geom::point();
        let aes = Aes::new().size("pop");
        let legends = build_legends(&scales, &Labels::new(), &[(&geom, &aes)]);
        match &legends[0].guide {
            Guide::Keys { keys, .. } => {
                assert_eq!(keys.len(), 4);
                assert!(keys.windows(2).all(|w| w[0].size < w[1].size));
                assert!(keys[0].label.contains(','));
            }
            Guide::ColorBar { .. } => panic!("expected keys"),
        }
    }

    #[test]
    fn test_reference_lines_add_no_glyph() {
        let col = rank();
        let scales = AestheticScales {
            color: mapped("rank", train_color(&[("rank", &col)], None).unwrap()),
            ..AestheticScales::default()
        };
        let hline = Geom::hline(1.0);
        let smooth = Geom::smooth();
        let aes = Aes::new().color("rank");
        let legends = build_legends(&scales, &Labels::new(), &[(&hline, &aes), (&smooth, &aes)]);
        match &legends[0].guide {
            Guide::Keys { layers, .. } => {
                assert_eq!(layers.len(), 1);
                assert_eq!(layers[0].glyph, KeyGlyph::Path);
            }
            Guide::ColorBar { .. } => panic!("expected keys"),
        }
    }
}
