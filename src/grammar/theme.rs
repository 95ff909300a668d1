//! Theme system for Grammar of Graphics.
//!
//! Controls the non-data visual appearance of plots. Every size scales with
//! `base_size`, the body text size in pixels.

use crate::color::Rgba;

/// Where legends are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    /// Stacked to the right of the panels.
    #[default]
    Right,
    /// Laid out horizontally below the axis title.
    Bottom,
    /// Legends are not drawn.
    None,
}

/// Theme specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Body text size in pixels.
    pub base_size: f32,
    /// Plot background color.
    pub background: Rgba,
    /// Panel background color.
    pub panel_background: Rgba,
    /// Panel border color, if drawn.
    pub panel_border: Option<Rgba>,
    /// Major grid line color, if drawn.
    pub grid_major: Option<Rgba>,
    /// Minor grid line color, if drawn.
    pub grid_minor: Option<Rgba>,
    /// Draw vertical major grid lines.
    pub grid_major_x: bool,
    /// Draw minor grid lines along y.
    pub grid_minor_y: bool,
    /// Axis line color, if drawn.
    pub axis_line: Option<Rgba>,
    /// Tick mark color, if drawn.
    pub ticks: Option<Rgba>,
    /// Title and axis title color.
    pub text_color: Rgba,
    /// Tick label color.
    pub axis_text: Rgba,
    /// Strip background color, if drawn.
    pub strip_background: Option<Rgba>,
    /// Strip border color, if drawn.
    pub strip_border: Option<Rgba>,
    /// Strip text color.
    pub strip_text: Rgba,
    /// Background behind legend keys.
    pub legend_key: Rgba,
    /// Legend placement.
    pub legend_position: LegendPosition,
}

impl Default for Theme {
    fn default() -> Self {
        Self::grey()
    }
}

const GREY10: Rgba = Rgba::rgb(26, 26, 26);
const GREY20: Rgba = Rgba::rgb(51, 51, 51);
const GREY30: Rgba = Rgba::rgb(77, 77, 77);
const GREY85: Rgba = Rgba::rgb(217, 217, 217);
const GREY92: Rgba = Rgba::rgb(235, 235, 235);
const GREY95: Rgba = Rgba::rgb(242, 242, 242);

impl Theme {
    /// Grey panel with white grid lines (the default).
    #[must_use]
    pub fn grey() -> Self {
        Self {
            base_size: 11.0,
            background: Rgba::WHITE,
            panel_background: GREY92,
            panel_border: None,
            grid_major: Some(Rgba::WHITE),
            grid_minor: Some(GREY95),
            grid_major_x: true,
            grid_minor_y: true,
            axis_line: None,
            ticks: Some(GREY20),
            text_color: Rgba::BLACK,
            axis_text: GREY30,
            strip_background: Some(GREY85),
            strip_border: None,
            strip_text: GREY10,
            legend_key: GREY95,
            legend_position: LegendPosition::Right,
        }
    }

    /// Black and white theme.
    #[must_use]
    pub fn bw() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            panel_border: Some(GREY20),
            grid_major: Some(GREY92),
            grid_minor: Some(GREY95),
            strip_border: Some(GREY20),
            legend_key: Rgba::WHITE,
            ..Self::grey()
        }
    }

    /// Minimal theme: grid lines only, no strip backgrounds or ticks.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            panel_border: None,
            ticks: None,
            strip_background: None,
            strip_border: None,
            ..Self::bw()
        }
    }

    /// Classic theme with axis lines and no grid.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid_major: None,
            grid_minor: None,
            axis_line: Some(Rgba::BLACK),
            strip_background: Some(Rgba::WHITE),
            strip_border: Some(Rgba::BLACK),
            legend_key: Rgba::WHITE,
            ..Self::grey()
        }
    }

    /// Dark panel theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            panel_background: Rgba::rgb(127, 127, 127),
            grid_major: Some(Rgba::rgb(107, 107, 107)),
            grid_minor: Some(Rgba::rgb(117, 117, 117)),
            strip_background: Some(Rgba::rgb(38, 38, 38)),
            strip_text: Rgba::rgb(230, 230, 230),
            legend_key: Rgba::rgb(127, 127, 127),
            ..Self::grey()
        }
    }

    /// Set the body text size; every derived size follows.
    #[must_use]
    pub fn base_size(mut self, size: f32) -> Self {
        self.base_size = size.max(4.0);
        self
    }

    /// Set legend placement.
    #[must_use]
    pub fn legend_position(mut self, position: LegendPosition) -> Self {
        self.legend_position = position;
        self
    }

    /// Set background color.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Set panel background color.
    #[must_use]
    pub fn panel_background(mut self, color: Rgba) -> Self {
        self.panel_background = color;
        self
    }

    /// Show or hide vertical major grid lines.
    #[must_use]
    pub fn grid_major_x(mut self, show: bool) -> Self {
        self.grid_major_x = show;
        self
    }

    /// Show or hide minor grid lines along y.
    #[must_use]
    pub fn grid_minor_y(mut self, show: bool) -> Self {
        self.grid_minor_y = show;
        self
    }

    // ------------------------------------------------------------------
    // Derived sizes (pixels)
    // ------------------------------------------------------------------

    /// Plot title size.
    #[must_use]
    pub fn title_size(&self) -> f32 {
        self.base_size * 1.2
    }

    /// Tick label, strip and caption size.
    #[must_use]
    pub fn small_size(&self) -> f32 {
        self.base_size * 0.8
    }

    /// Half-line spacing unit.
    #[must_use]
    pub fn half_line(&self) -> f32 {
        self.base_size / 2.0
    }

    /// Tick mark length.
    #[must_use]
    pub fn tick_length(&self) -> f32 {
        self.half_line() / 2.0
    }

    /// Height of one strip.
    #[must_use]
    pub fn strip_size(&self) -> f32 {
        self.small_size() + 2.0 * 4.4 * self.base_size / 11.0
    }

    /// Gap between panels.
    #[must_use]
    pub fn panel_spacing(&self) -> f32 {
        self.half_line()
    }

    /// Side length of a legend key box.
    #[must_use]
    pub fn key_size(&self) -> f32 {
        self.base_size * 1.6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_grey() {
        assert_eq!(Theme::default(), Theme::grey());
        assert_eq!(Theme::grey().panel_background, GREY92);
    }

    #[test]
    fn test_theme_variants_differ() {
        let themes =
            [Theme::grey(), Theme::bw(), Theme::minimal(), Theme::classic(), Theme::dark()];
        for (i, a) in themes.iter().enumerate() {
            for b in &themes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_bw_has_border_minimal_does_not() {
        assert!(Theme::bw().panel_border.is_some());
        assert!(Theme::minimal().panel_border.is_none());
        assert!(Theme::minimal().ticks.is_none());
    }

    #[test]
    fn test_classic_axis_lines_no_grid() {
        let t = Theme::classic();
        assert!(t.axis_line.is_some());
        assert!(t.grid_major.is_none());
    }

    #[test]
    fn test_base_size_scales_derived_sizes() {
        let small = Theme::grey().base_size(9.0);
        let large = Theme::grey().base_size(18.0);
        assert!(large.title_size() > small.title_size());
        assert!((large.strip_size() - 2.0 * small.strip_size()).abs() < 1e-4);
        assert_eq!(Theme::grey().base_size(0.0).base_size, 4.0);
    }

    #[test]
    fn test_builders() {
        let t = Theme::bw()
            .legend_position(LegendPosition::None)
            .grid_major_x(false)
            .grid_minor_y(false);
        assert_eq!(t.legend_position, LegendPosition::None);
        assert!(!t.grid_major_x);
        assert!(!t.grid_minor_y);
    }
}
