//! Main GGPlot builder.
//!
//! Combines data, aesthetics, layers, facets, scales, labels and a theme
//! into a [`BuiltGGPlot`]: a fully trained scene that any [`Canvas`] can
//! draw.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};

use crate::color::Rgba;
use crate::data::DataFrame;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::output::{PngEncoder, SvgEncoder};
use crate::render::Canvas;

use super::aes::{Aes, Channel};
use super::facet::{Facet, FacetLayout, Panel};
use super::geom::{Geom, GeomType};
use super::labels::Labels;
use super::legend::{build_legends, Legend};
use super::marks::{union_extent, LayerContext, Mark};
use super::scales::{
    position_levels, train_color, train_numeric, train_shape, AestheticScales, Mapped,
    PositionScale, ScaleSpec, Trainee, ALPHA_RANGE, SIZE_RANGE,
};
use super::theme::Theme;

/// A layer in the plot.
#[derive(Debug, Clone)]
pub struct Layer {
    /// The geometry.
    pub geom: Geom,
    /// Layer-specific data (if different from plot data).
    pub data: Option<DataFrame>,
    /// Layer-specific aesthetics.
    pub aes: Aes,
}

impl Layer {
    /// Create a new layer from a geometry.
    #[must_use]
    pub fn new(geom: Geom) -> Self {
        Self { aes: geom.aes.clone().unwrap_or_default(), geom, data: None }
    }

    /// Set layer-specific data.
    #[must_use]
    pub fn data(mut self, data: DataFrame) -> Self {
        self.data = Some(data);
        self
    }

    /// Add layer aesthetics; they take precedence over the geometry's own.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = self.aes.merge(&aes);
        self
    }
}

/// Grammar of Graphics plot builder.
#[derive(Debug, Clone)]
pub struct GGPlot {
    data: DataFrame,
    aes: Aes,
    layers: Vec<Layer>,
    facet: Facet,
    theme: Theme,
    width: u32,
    height: u32,
    labels: Labels,
    scale_x: ScaleSpec,
    scale_y: ScaleSpec,
    color_values: Option<Vec<Rgba>>,
    fill_values: Option<Vec<Rgba>>,
}

impl Default for GGPlot {
    fn default() -> Self {
        Self::new()
    }
}

impl GGPlot {
    /// Create a new plot builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: DataFrame::new(),
            aes: Aes::new(),
            layers: Vec::new(),
            facet: Facet::None,
            theme: Theme::grey(),
            width: 800,
            height: 600,
            labels: Labels::new(),
            scale_x: ScaleSpec::new(),
            scale_y: ScaleSpec::new(),
            color_values: None,
            fill_values: None,
        }
    }

    /// Set the data.
    #[must_use]
    pub fn data(mut self, data: DataFrame) -> Self {
        self.data = data;
        self
    }

    /// Set global aesthetics.
    #[must_use]
    pub fn aes(mut self, aes: Aes) -> Self {
        self.aes = aes;
        self
    }

    /// Add a geometry layer.
    #[must_use]
    pub fn geom(mut self, geom: Geom) -> Self {
        self.layers.push(Layer::new(geom));
        self
    }

    /// Add a layer.
    #[must_use]
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Set faceting.
    #[must_use]
    pub fn facet(mut self, facet: Facet) -> Self {
        self.facet = facet;
        self
    }

    /// Set theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set labels; fields set here replace earlier ones.
    #[must_use]
    pub fn labs(mut self, labels: Labels) -> Self {
        self.labels = self.labels.merge(labels);
        self
    }

    /// Set title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.labels.title = Some(title.into());
        self
    }

    /// Set x-axis label.
    #[must_use]
    pub fn xlab(mut self, label: impl Into<String>) -> Self {
        self.labels.x = Some(label.into());
        self
    }

    /// Set y-axis label.
    #[must_use]
    pub fn ylab(mut self, label: impl Into<String>) -> Self {
        self.labels.y = Some(label.into());
        self
    }

    /// Configure the x position scale.
    #[must_use]
    pub fn scale_x(mut self, spec: ScaleSpec) -> Self {
        self.scale_x = spec;
        self
    }

    /// Configure the y position scale.
    #[must_use]
    pub fn scale_y(mut self, spec: ScaleSpec) -> Self {
        self.scale_y = spec;
        self
    }

    /// Use `values` for discrete color levels, in level order.
    #[must_use]
    pub fn scale_color_manual(mut self, values: &[Rgba]) -> Self {
        self.color_values = Some(values.to_vec());
        self
    }

    /// Use `values` for discrete fill levels, in level order.
    #[must_use]
    pub fn scale_fill_manual(mut self, values: &[Rgba]) -> Self {
        self.fill_values = Some(values.to_vec());
        self
    }

    /// Train every scale, facet the data and compute the marks.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no layers, the size is zero, a layer
    /// lacks a required aesthetic, a mapped column is missing or of the wrong
    /// kind, or a palette is too small.
    pub fn build(self) -> Result<BuiltGGPlot> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        if self.layers.is_empty() {
            return Err(Error::Rendering("no geometry layers specified".into()));
        }

        let resolved: Vec<Resolved<'_>> = self
            .layers
            .iter()
            .map(|layer| {
                let data = layer.data.as_ref().unwrap_or(&self.data);
                (&layer.geom, self.aes.merge(&layer.aes), data)
            })
            .collect();
        for (geom, aes, data) in &resolved {
            let missing: Vec<&str> = geom
                .required()
                .iter()
                .filter(|ch| aes.column(**ch).is_none())
                .map(|ch| ch.name())
                .collect();
            if !missing.is_empty() {
                return Err(Error::Rendering(format!(
                    "{} requires the following missing aesthetics: {}",
                    geom.name(),
                    missing.join(", ")
                )));
            }
            for (_, column) in aes.mappings() {
                data.column(column)?;
            }
        }

        let x_levels = position_levels(&channel_columns(&resolved, &[Channel::X], true))?;
        let y_channels = [Channel::Y, Channel::Ymin, Channel::Ymax];
        let y_levels = position_levels(&channel_columns(&resolved, &y_channels, true))?;
        let scales = self.train_aesthetics(&resolved)?;

        let facet_data = resolved
            .iter()
            .map(|(_, _, data)| *data)
            .find(|data| self.facet.vars().iter().all(|v| data.has_column(v)))
            .unwrap_or(&self.data);
        let layout = self.facet.layout(facet_data)?;
        debug!(
            "building {} layer(s) over {} panel(s) ({}x{})",
            resolved.len(),
            layout.panels.len(),
            layout.nrow,
            layout.ncol
        );

        let contexts = resolved
            .iter()
            .map(|(geom, aes, data)| {
                LayerContext::new(
                    geom,
                    aes,
                    data,
                    &scales,
                    x_levels.as_deref(),
                    y_levels.as_deref(),
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let mut panel_marks = Vec::with_capacity(layout.panels.len());
        let mut dropped = 0usize;
        for panel in &layout.panels {
            let mut marks = Vec::new();
            for (ctx, (_, _, data)) in contexts.iter().zip(&resolved) {
                let rows = self.panel_rows(panel, data)?;
                for mark in ctx.marks(&rows)? {
                    match mark.within(self.scale_x.limits, self.scale_y.limits) {
                        Some(mark) => marks.push(mark),
                        None => dropped += 1,
                    }
                }
            }
            panel_marks.push(marks);
        }
        if dropped > 0 {
            warn!("removed {dropped} mark(s) outside the scale limits");
        }

        let (x_scales, y_scales) =
            self.train_positions(&layout, &panel_marks, x_levels.as_deref(), y_levels.as_deref());
        let panels = panel_marks
            .into_iter()
            .zip(x_scales.into_iter().zip(y_scales))
            .map(|(marks, (x, y))| PanelScene { x, y, marks })
            .collect();

        let legend_layers: Vec<(&Geom, &Aes)> = resolved.iter().map(|(g, a, _)| (*g, a)).collect();
        let legends = build_legends(&scales, &self.labels, &legend_layers);
        let x_title = self.axis_title(Channel::X, &resolved);
        let y_title = self.axis_title(Channel::Y, &resolved);

        Ok(BuiltGGPlot {
            width: self.width,
            height: self.height,
            theme: self.theme.clone(),
            labels: self.labels.clone(),
            facet: self.facet.clone(),
            layout,
            panels,
            legends,
            x_title,
            y_title,
        })
    }

    fn train_aesthetics(&self, resolved: &[Resolved<'_>]) -> Result<AestheticScales> {
        fn mapped<S>(
            trainees: &[Trainee<'_>],
            train: impl FnOnce(&[Trainee<'_>]) -> Result<S>,
        ) -> Result<Option<Mapped<S>>> {
            match trainees.first() {
                Some((name, _)) => {
                    Ok(Some(Mapped { column: (*name).to_string(), scale: train(trainees)? }))
                }
                None => Ok(None),
            }
        }
        let columns = |channel: Channel| channel_columns(resolved, &[channel], false);

        Ok(AestheticScales {
            color: mapped(&columns(Channel::Color), |t| {
                train_color(t, self.color_values.as_deref())
            })?,
            fill: mapped(&columns(Channel::Fill), |t| train_color(t, self.fill_values.as_deref()))?,
            shape: mapped(&columns(Channel::Shape), train_shape)?,
            size: mapped(&columns(Channel::Size), |t| train_numeric(t, SIZE_RANGE, true))?,
            alpha: mapped(&columns(Channel::Alpha), |t| train_numeric(t, ALPHA_RANGE, false))?,
        })
    }

    /// Rows of `data` drawn in `panel`. Data lacking a faceting variable is
    /// repeated in every panel.
    fn panel_rows(&self, panel: &Panel, data: &DataFrame) -> Result<Vec<usize>> {
        let keys = self.facet.panel_keys(panel);
        if keys.iter().any(|(var, _)| !data.has_column(var)) {
            return Ok((0..data.nrow()).collect());
        }
        let factors = keys
            .iter()
            .map(|(var, level)| data.factor(var).map(|f| (f, *level)))
            .collect::<Result<Vec<_>>>()?;
        Ok((0..data.nrow())
            .filter(|&row| factors.iter().all(|(f, level)| f.label(row) == *level))
            .collect())
    }

    /// One x and one y scale per panel, shared according to the facet's
    /// scale mode. Discrete axes are always shared.
    fn train_positions(
        &self,
        layout: &FacetLayout,
        marks: &[Vec<Mark>],
        x_levels: Option<&[String]>,
        y_levels: Option<&[String]>,
    ) -> (Vec<PositionScale>, Vec<PositionScale>) {
        let mode = self.facet.facet_scales();
        let grid = matches!(self.facet, Facet::Grid { .. });
        let x_key = |i: usize, p: &Panel| match (mode.free_x() && x_levels.is_none(), grid) {
            (false, _) => 0,
            (true, true) => p.col,
            (true, false) => i,
        };
        let y_key = |i: usize, p: &Panel| match (mode.free_y() && y_levels.is_none(), grid) {
            (false, _) => 0,
            (true, true) => p.row,
            (true, false) => i,
        };

        let train = |key: &dyn Fn(usize, &Panel) -> usize,
                     extent: fn(&Mark) -> Option<(f32, f32)>,
                     levels: Option<&[String]>,
                     spec: &ScaleSpec| {
            let mut pooled: BTreeMap<usize, Option<(f32, f32)>> = BTreeMap::new();
            for (i, (panel, marks)) in layout.panels.iter().zip(marks).enumerate() {
                let slot = pooled.entry(key(i, panel)).or_insert(None);
                *slot = marks.iter().map(extent).fold(*slot, union_extent);
            }
            layout
                .panels
                .iter()
                .enumerate()
                .map(|(i, panel)| {
                    let extent = pooled.get(&key(i, panel)).copied().flatten();
                    match levels {
                        Some(levels) => PositionScale::discrete(levels, extent),
                        None => PositionScale::continuous(extent, spec),
                    }
                })
                .collect::<Vec<_>>()
        };

        (
            train(&x_key, Mark::x_extent, x_levels, &self.scale_x),
            train(&y_key, Mark::y_extent, y_levels, &self.scale_y),
        )
    }

    /// Axis title: scale title, then label, then the first mapped column.
    fn axis_title(&self, channel: Channel, resolved: &[Resolved<'_>]) -> String {
        let (spec, label) = match channel {
            Channel::X => (&self.scale_x, &self.labels.x),
            _ => (&self.scale_y, &self.labels.y),
        };
        if let Some(title) = spec.title.as_ref().or(label.as_ref()) {
            return title.clone();
        }
        if let Some(column) = resolved.iter().find_map(|(_, aes, _)| aes.column(channel)) {
            return column.to_string();
        }
        if channel == Channel::Y {
            if resolved.iter().any(|(g, ..)| matches!(g.geom_type, GeomType::Histogram { .. })) {
                return "count".to_string();
            }
            if let Some(column) =
                resolved.iter().find_map(|(_, aes, _)| aes.column(Channel::Ymin))
            {
                return column.to_string();
            }
        }
        String::new()
    }
}

impl batuta_common::display::WithDimensions for GGPlot {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// A layer with plot aesthetics merged in and its data chosen.
type Resolved<'a> = (&'a Geom, Aes, &'a DataFrame);

/// Columns mapped to any of `channels`, layer by layer. Reference lines are
/// skipped when training positions.
fn channel_columns<'a>(
    resolved: &'a [Resolved<'a>],
    channels: &[Channel],
    positional: bool,
) -> Vec<Trainee<'a>> {
    resolved
        .iter()
        .filter(|(geom, ..)| !positional || !is_reference_line(geom))
        .flat_map(|(_, aes, data)| {
            channels.iter().filter_map(move |ch| {
                let name = aes.column(*ch)?;
                data.column(name).ok().map(|c| (name, c))
            })
        })
        .collect()
}

fn is_reference_line(geom: &Geom) -> bool {
    matches!(geom.geom_type, GeomType::Hline { .. } | GeomType::Vline { .. })
}

/// Trained scales and marks of one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelScene {
    /// Horizontal scale.
    pub x: PositionScale,
    /// Vertical scale.
    pub y: PositionScale,
    /// Marks in layer order.
    pub marks: Vec<Mark>,
}

/// A built GGPlot ready for rendering.
#[derive(Debug, Clone)]
pub struct BuiltGGPlot {
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) theme: Theme,
    pub(super) labels: Labels,
    pub(super) facet: Facet,
    pub(super) layout: FacetLayout,
    pub(super) panels: Vec<PanelScene>,
    pub(super) legends: Vec<Legend>,
    pub(super) x_title: String,
    pub(super) y_title: String,
}

impl BuiltGGPlot {
    /// Computed panel arrangement.
    #[must_use]
    pub fn panels(&self) -> &FacetLayout {
        &self.layout
    }

    /// Scales and marks per panel, parallel to [`FacetLayout::panels`].
    #[must_use]
    pub fn scenes(&self) -> &[PanelScene] {
        &self.panels
    }

    /// Legends in drawing order.
    #[must_use]
    pub fn legends(&self) -> &[Legend] {
        &self.legends
    }

    /// X axis title.
    #[must_use]
    pub fn x_title(&self) -> &str {
        &self.x_title
    }

    /// Y axis title.
    #[must_use]
    pub fn y_title(&self) -> &str {
        &self.y_title
    }

    /// Output size in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render to framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the plot area is too small for the panels.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        self.render(&mut fb)?;
        Ok(fb)
    }

    /// Render to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns an error if the plot area is too small for the panels.
    pub fn to_svg(&self) -> Result<SvgEncoder> {
        let mut svg = SvgEncoder::new(self.width, self.height);
        self.render(&mut svg)?;
        Ok(svg)
    }

    /// Render and write a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering, encoding or writing fails.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<()> {
        PngEncoder::write_to_file(&self.to_framebuffer()?, path)
    }

    /// Render and write an SVG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        self.to_svg()?.write_to_file(path)
    }

    /// Draw the plot onto any canvas.
    ///
    /// # Errors
    ///
    /// Returns an error if the plot area is too small for the panels.
    pub fn render(&self, canvas: &mut dyn Canvas) -> Result<()> {
        super::draw::render(self, canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::facet::FacetScales;
    use crate::grammar::legend::Guide;
    use crate::scale::LabelFormat;
    use batuta_common::display::WithDimensions;

    fn salaries() -> DataFrame {
        DataFrame::new()
            .with_numeric("phd", vec![1.0, 5.0, 10.0, 20.0, 30.0, 40.0])
            .unwrap()
            .with_numeric(
                "salary",
                vec![80_000.0, 90_000.0, 100_000.0, 130_000.0, 150_000.0, 140_000.0],
            )
            .unwrap()
            .with_categorical_levels(
                "rank",
                &["AsstProf", "AsstProf", "AssocProf", "Prof", "Prof", "Prof"],
                &["AsstProf", "AssocProf", "Prof"],
            )
            .unwrap()
            .with_categorical("sex", &["Female", "Male", "Male", "Male", "Female", "Male"])
            .unwrap()
    }

    fn scatter() -> GGPlot {
        GGPlot::new().data(salaries()).aes(Aes::new().x("phd").y("salary")).dimensions(400, 300)
    }

    #[test]
    fn test_ggplot_basic() {
        let plot = scatter().geom(Geom::point()).build().unwrap();
        let fb = plot.to_framebuffer().unwrap();
        assert_eq!(fb.width(), 400);
        assert_eq!(fb.height(), 300);
        assert_eq!(plot.scenes()[0].marks.len(), 6);
        assert_eq!(plot.x_title(), "phd");
    }

    #[test]
    fn test_ggplot_error_no_layers() {
        assert!(matches!(scatter().build(), Err(Error::Rendering(_))));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let result = scatter().geom(Geom::point()).dimensions(0, 300).build();
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let result = scatter()
            .aes(Aes::new().x("phd").y("salary").color("nope"))
            .geom(Geom::point())
            .build();
        assert!(matches!(result, Err(Error::UnknownColumn(c)) if c == "nope"));
    }

    #[test]
    fn test_missing_required_aesthetic() {
        let result =
            GGPlot::new().data(salaries()).aes(Aes::new().x("phd")).geom(Geom::point()).build();
        match result {
            Err(Error::Rendering(msg)) => assert!(msg.contains("geom_point") && msg.contains('y')),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_numeric_shape_rejected() {
        let result = scatter()
            .aes(Aes::new().x("phd").y("salary").shape("phd"))
            .geom(Geom::point())
            .build();
        assert!(matches!(result, Err(Error::ColumnType { .. })));
    }

    #[test]
    fn test_manual_palette_too_small() {
        let result = scatter()
            .aes(Aes::new().x("phd").y("salary").color("rank"))
            .geom(Geom::point())
            .scale_color_manual(&[Rgba::RED])
            .build();
        assert!(matches!(result, Err(Error::Palette(_))));
    }

    #[test]
    fn test_color_and_shape_legends() {
        let plot = scatter()
            .aes(Aes::new().x("phd").y("salary").color("rank").shape("sex"))
            .geom(Geom::point())
            .build()
            .unwrap();
        let legends = plot.legends();
        assert_eq!(legends.len(), 2);
        assert_eq!(legends[0].title, "rank");
        assert_eq!(legends[1].title, "sex");
    }

    #[test]
    fn test_wrap_panels_and_shared_scales() {
        let plot =
            scatter().geom(Geom::point()).facet(Facet::wrap(&["rank"]).ncol(1)).build().unwrap();
        assert_eq!(plot.panels().panels.len(), 3);
        assert_eq!((plot.panels().nrow, plot.panels().ncol), (3, 1));
        let scenes = plot.scenes();
        assert_eq!(scenes[0].marks.len(), 2);
        assert_eq!(scenes[0].x, scenes[2].x);
    }

    #[test]
    fn test_free_y_scales_differ() {
        let plot = scatter()
            .geom(Geom::point())
            .facet(Facet::wrap(&["rank"]).scales(FacetScales::FreeY))
            .build()
            .unwrap();
        let scenes = plot.scenes();
        assert_ne!(scenes[0].y, scenes[2].y);
        assert_eq!(scenes[0].x, scenes[2].x);
    }

    #[test]
    fn test_grid_panels() {
        let plot =
            scatter().geom(Geom::point()).facet(Facet::grid(&["sex"], &["rank"])).build().unwrap();
        assert_eq!(plot.panels().panels.len(), 6);
        let total: usize = plot.scenes().iter().map(|s| s.marks.len()).sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn test_layer_without_facet_column_repeats() {
        let reference = DataFrame::new()
            .with_numeric("phd", vec![0.0, 40.0])
            .unwrap()
            .with_numeric("salary", vec![1.0e5, 1.0e5])
            .unwrap();
        let plot = scatter()
            .geom(Geom::point())
            .layer(Layer::new(Geom::line()).data(reference))
            .facet(Facet::wrap(&["rank"]))
            .build()
            .unwrap();
        let has_path = |s: &PanelScene| s.marks.iter().any(|m| matches!(m, Mark::Path { .. }));
        assert!(plot.scenes().iter().all(has_path));
    }

    #[test]
    fn test_limits_drop_marks() {
        let plot = scatter()
            .geom(Geom::point())
            .scale_x(ScaleSpec::new().limits(0.0, 15.0))
            .build()
            .unwrap();
        assert_eq!(plot.scenes()[0].marks.len(), 3);
        let (lo, hi) = plot.scenes()[0].x.range;
        assert!((lo + 0.75).abs() < 1e-4 && (hi - 15.75).abs() < 1e-4);
    }

    #[test]
    fn test_timestamp_axis_builds() {
        let ticks = DataFrame::new()
            .with_numeric("time", vec![1.7e9, 1.7e9 + 120.0, 1.7e9 + 300.0])
            .unwrap()
            .with_numeric("load", vec![0.2, 0.4, 0.3])
            .unwrap();
        let plot = GGPlot::new()
            .data(ticks)
            .aes(Aes::new().x("time").y("load"))
            .geom(Geom::line())
            .build()
            .unwrap();
        let x = &plot.scenes()[0].x;
        assert!(!x.breaks.is_empty() && x.breaks.len() <= 10);
        assert_eq!(x.breaks.len(), x.labels.len());
    }

    #[test]
    fn test_dollar_breaks() {
        let plot = scatter()
            .geom(Geom::point())
            .scale_y(
                ScaleSpec::new()
                    .breaks_seq(0.0, 200_000.0, 25_000.0)
                    .format(LabelFormat::Dollar),
            )
            .build()
            .unwrap();
        assert!(plot.scenes()[0].y.labels.iter().all(|l| l.starts_with('$')));
    }

    #[test]
    fn test_histogram_y_title_and_discrete_axis() {
        let hist = GGPlot::new()
            .data(salaries())
            .aes(Aes::new().x("salary"))
            .geom(Geom::histogram().bins(5))
            .build()
            .unwrap();
        assert_eq!(hist.y_title(), "count");

        let bars = GGPlot::new()
            .data(salaries())
            .aes(Aes::new().x("rank").y("salary"))
            .geom(Geom::col())
            .build()
            .unwrap();
        assert_eq!(bars.scenes()[0].x.labels, vec!["AsstProf", "AssocProf", "Prof"]);
    }

    #[test]
    fn test_axis_labels_override_columns() {
        let plot = scatter()
            .geom(Geom::point())
            .xlab("Years since PhD")
            .ylab("Salary")
            .build()
            .unwrap();
        assert_eq!(plot.x_title(), "Years since PhD");
        assert_eq!(plot.y_title(), "Salary");
    }

    #[test]
    fn test_manual_fill_palette() {
        let palette = [Rgba::RED, Rgba::BLUE, Rgba::STEELBLUE];
        let plot = GGPlot::new()
            .data(salaries())
            .aes(Aes::new().x("rank").y("salary").fill("rank"))
            .geom(Geom::col())
            .scale_fill_manual(&palette)
            .build()
            .unwrap();
        let fills: Vec<Rgba> = plot.scenes()[0]
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Rect { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert!(!fills.is_empty());
        assert!(fills.iter().all(|f| palette.contains(f)));
        assert!(palette.iter().all(|p| fills.contains(p)));

        let short = GGPlot::new()
            .data(salaries())
            .aes(Aes::new().x("rank").y("salary").fill("rank"))
            .geom(Geom::col())
            .scale_fill_manual(&palette[..2])
            .build();
        assert!(matches!(short, Err(Error::Palette(_))));
    }

    #[test]
    fn test_continuous_color_gets_bar() {
        let plot = scatter()
            .aes(Aes::new().x("phd").y("salary").color("salary"))
            .geom(Geom::point())
            .build()
            .unwrap();
        assert!(matches!(plot.legends()[0].guide, Guide::ColorBar { .. }));
    }

    #[test]
    fn test_with_dimensions() {
        let mut plot = scatter().geom(Geom::point());
        plot.set_dimensions(320, 200);
        let built = plot.build().unwrap();
        assert_eq!(built.dimensions(), (320, 200));
    }

    #[test]
    fn test_svg_and_png_render() {
        let plot = scatter()
            .aes(Aes::new().x("phd").y("salary").color("rank"))
            .geom(Geom::point())
            .title("Salaries")
            .build()
            .unwrap();
        let svg = plot.to_svg().unwrap().render();
        assert!(svg.contains("Salaries"));
        assert!(svg.contains("<circle"));
        let fb = plot.to_framebuffer().unwrap();
        assert!(fb.count_color(Rgba::WHITE) > 0);
    }
}
