//! Faceting for Grammar of Graphics.
//!
//! Creates small multiples by splitting data on one or more categorical
//! variables. `wrap` lays panels out in reading order; `grid` crosses row
//! variables with column variables.

use std::collections::{BTreeMap, BTreeSet};

use crate::data::{DataFrame, Factor};
use crate::error::{Error, Result};

/// Which position scales may vary between panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacetScales {
    /// Every panel shares both scales.
    #[default]
    Fixed,
    /// X scale varies (per panel for wrap, per column for grid).
    FreeX,
    /// Y scale varies (per panel for wrap, per row for grid).
    FreeY,
    /// Both scales vary.
    Free,
}

impl FacetScales {
    /// Whether the x scale may vary.
    #[must_use]
    pub fn free_x(self) -> bool {
        matches!(self, FacetScales::FreeX | FacetScales::Free)
    }

    /// Whether the y scale may vary.
    #[must_use]
    pub fn free_y(self) -> bool {
        matches!(self, FacetScales::FreeY | FacetScales::Free)
    }
}

/// Faceting specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Facet {
    /// No faceting.
    #[default]
    None,
    /// Facet into wrapped panels.
    Wrap {
        /// Variables to facet by.
        vars: Vec<String>,
        /// Number of columns.
        ncol: Option<usize>,
        /// Number of rows.
        nrow: Option<usize>,
        /// Drop level combinations that do not occur.
        drop: bool,
        /// Shared or free position scales.
        scales: FacetScales,
    },
    /// Facet into a grid of panels.
    Grid {
        /// Row variables.
        rows: Vec<String>,
        /// Column variables.
        cols: Vec<String>,
        /// Drop levels that do not occur.
        drop: bool,
        /// Shared or free position scales.
        scales: FacetScales,
    },
}

/// One facet sub-plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    /// Row in the panel layout (0-based).
    pub row: usize,
    /// Column in the panel layout (0-based).
    pub col: usize,
    /// Wrap strip text or grid column strip levels, one per variable.
    pub col_keys: Vec<String>,
    /// Grid row strip levels, one per row variable.
    pub row_keys: Vec<String>,
    /// Indices of the data rows drawn in this panel.
    pub rows: Vec<usize>,
}

impl Panel {
    /// Strip label for wrap panels: levels joined by `", "`.
    #[must_use]
    pub fn label(&self) -> String {
        self.col_keys.iter().chain(&self.row_keys).cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Computed arrangement of panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetLayout {
    /// Number of panel rows.
    pub nrow: usize,
    /// Number of panel columns.
    pub ncol: usize,
    /// Panels in reading order.
    pub panels: Vec<Panel>,
}

impl FacetLayout {
    /// Panel at a layout position, if occupied.
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> Option<&Panel> {
        self.panels.iter().find(|p| p.row == row && p.col == col)
    }

    /// Whether nothing sits below `panel` in its column.
    #[must_use]
    pub fn is_bottom(&self, panel: &Panel) -> bool {
        ((panel.row + 1)..self.nrow).all(|r| self.at(r, panel.col).is_none())
    }
}

impl Facet {
    /// No faceting.
    #[must_use]
    pub fn none() -> Self {
        Facet::None
    }

    /// Facet with wrapping over the combinations of `vars`.
    #[must_use]
    pub fn wrap(vars: &[&str]) -> Self {
        Facet::Wrap {
            vars: vars.iter().map(|v| (*v).to_string()).collect(),
            ncol: None,
            nrow: None,
            drop: true,
            scales: FacetScales::Fixed,
        }
    }

    /// Facet into a grid of `rows` by `cols`; either side may be empty.
    #[must_use]
    pub fn grid(rows: &[&str], cols: &[&str]) -> Self {
        Facet::Grid {
            rows: rows.iter().map(|v| (*v).to_string()).collect(),
            cols: cols.iter().map(|v| (*v).to_string()).collect(),
            drop: true,
            scales: FacetScales::Fixed,
        }
    }

    /// Fix the number of wrap columns. No effect on grids.
    #[must_use]
    pub fn ncol(mut self, n: usize) -> Self {
        if let Facet::Wrap { ncol, .. } = &mut self {
            *ncol = Some(n.max(1));
        }
        self
    }

    /// Fix the number of wrap rows. No effect on grids.
    #[must_use]
    pub fn nrow(mut self, n: usize) -> Self {
        if let Facet::Wrap { nrow, .. } = &mut self {
            *nrow = Some(n.max(1));
        }
        self
    }

    /// Keep (`false`) or drop (`true`, default) empty level combinations.
    #[must_use]
    pub fn drop(mut self, value: bool) -> Self {
        match &mut self {
            Facet::Wrap { drop, .. } | Facet::Grid { drop, .. } => *drop = value,
            Facet::None => {}
        }
        self
    }

    /// Choose shared or free position scales.
    #[must_use]
    pub fn scales(mut self, value: FacetScales) -> Self {
        match &mut self {
            Facet::Wrap { scales, .. } | Facet::Grid { scales, .. } => *scales = value,
            Facet::None => {}
        }
        self
    }

    /// Scale sharing mode.
    #[must_use]
    pub fn facet_scales(&self) -> FacetScales {
        match self {
            Facet::Wrap { scales, .. } | Facet::Grid { scales, .. } => *scales,
            Facet::None => FacetScales::Fixed,
        }
    }

    /// Every faceting variable.
    #[must_use]
    pub fn vars(&self) -> Vec<&str> {
        match self {
            Facet::None => Vec::new(),
            Facet::Wrap { vars, .. } => vars.iter().map(String::as_str).collect(),
            Facet::Grid { rows, cols, .. } => rows.iter().chain(cols).map(String::as_str).collect(),
        }
    }

    /// Number of stacked strips above each panel (wrap) or the top row (grid).
    #[must_use]
    pub fn top_strips(&self) -> usize {
        match self {
            Facet::None => 0,
            Facet::Wrap { vars, .. } => usize::from(!vars.is_empty()),
            Facet::Grid { cols, .. } => cols.len(),
        }
    }

    /// Number of strips right of the last column (grid rows).
    #[must_use]
    pub fn side_strips(&self) -> usize {
        match self {
            Facet::Grid { rows, .. } => rows.len(),
            _ => 0,
        }
    }

    /// `(variable, level)` pairs that select the rows of `panel`.
    #[must_use]
    pub fn panel_keys<'a>(&'a self, panel: &'a Panel) -> Vec<(&'a str, &'a str)> {
        fn pairs<'a>(
            vars: &'a [String],
            keys: &'a [String],
        ) -> impl Iterator<Item = (&'a str, &'a str)> {
            vars.iter().map(String::as_str).zip(keys.iter().map(String::as_str))
        }
        match self {
            Facet::None => Vec::new(),
            Facet::Wrap { vars, .. } => pairs(vars, &panel.col_keys).collect(),
            Facet::Grid { rows, cols, .. } => {
                pairs(rows, &panel.row_keys).chain(pairs(cols, &panel.col_keys)).collect()
            }
        }
    }

    /// Partition `data` into panels.
    ///
    /// # Errors
    ///
    /// Returns an error if a faceting variable is missing or not categorical,
    /// or if there is nothing to facet.
    pub fn layout(&self, data: &DataFrame) -> Result<FacetLayout> {
        match self {
            Facet::None => Ok(FacetLayout {
                nrow: 1,
                ncol: 1,
                panels: vec![Panel {
                    row: 0,
                    col: 0,
                    col_keys: Vec::new(),
                    row_keys: Vec::new(),
                    rows: (0..data.nrow()).collect(),
                }],
            }),
            Facet::Wrap { vars, ncol, nrow, drop, .. } => {
                let factors = factors(data, vars)?;
                let combos = combinations(&factors, data.nrow(), *drop);
                if combos.is_empty() {
                    return Err(Error::EmptyData);
                }
                let (nrow, ncol) = wrap_dims(combos.len(), *ncol, *nrow);
                let mut members = members(&factors, data.nrow());
                let panels = combos
                    .into_iter()
                    .enumerate()
                    .map(|(i, combo)| Panel {
                        row: i / ncol,
                        col: i % ncol,
                        col_keys: labels(&factors, &combo),
                        row_keys: Vec::new(),
                        rows: members.remove(&combo).unwrap_or_default(),
                    })
                    .collect();
                Ok(FacetLayout { nrow, ncol, panels })
            }
            Facet::Grid { rows, cols, drop, .. } => {
                let row_factors = factors(data, rows)?;
                let col_factors = factors(data, cols)?;
                let row_combos = combinations(&row_factors, data.nrow(), *drop);
                let col_combos = combinations(&col_factors, data.nrow(), *drop);
                if row_combos.is_empty() || col_combos.is_empty() {
                    return Err(Error::EmptyData);
                }

                let mut cells: BTreeMap<(Vec<u32>, Vec<u32>), Vec<usize>> = BTreeMap::new();
                for row in 0..data.nrow() {
                    let cell = (key(&row_factors, row), key(&col_factors, row));
                    cells.entry(cell).or_default().push(row);
                }

                let mut panels = Vec::with_capacity(row_combos.len() * col_combos.len());
                for (r, row_combo) in row_combos.iter().enumerate() {
                    for (c, col_combo) in col_combos.iter().enumerate() {
                        panels.push(Panel {
                            row: r,
                            col: c,
                            col_keys: labels(&col_factors, col_combo),
                            row_keys: labels(&row_factors, row_combo),
                            rows: cells
                                .remove(&(row_combo.clone(), col_combo.clone()))
                                .unwrap_or_default(),
                        });
                    }
                }
                Ok(FacetLayout { nrow: row_combos.len(), ncol: col_combos.len(), panels })
            }
        }
    }
}

/// `(nrow, ncol)` for `k` wrapped panels.
///
/// Given `ncol`, rows follow as `ceil(k / ncol)` (and vice versa). Otherwise
/// up to 3 panels sit in one row, up to 6 in two rows, up to 12 in three,
/// and beyond that the layout is near-square with `ncol = ceil(sqrt(k))`.
#[must_use]
pub fn wrap_dims(k: usize, ncol: Option<usize>, nrow: Option<usize>) -> (usize, usize) {
    let k = k.max(1);
    match (ncol, nrow) {
        (Some(c), _) => (k.div_ceil(c), c),
        (None, Some(r)) => (r, k.div_ceil(r)),
        (None, None) => {
            if k <= 3 {
                (1, k)
            } else if k <= 6 {
                (2, k.div_ceil(2))
            } else if k <= 12 {
                (3, k.div_ceil(3))
            } else {
                let c = (k as f64).sqrt().ceil() as usize;
                (k.div_ceil(c), c)
            }
        }
    }
}

fn factors<'a>(data: &'a DataFrame, vars: &[String]) -> Result<Vec<&'a Factor>> {
    vars.iter().map(|v| data.factor(v)).collect()
}

fn key(factors: &[&Factor], row: usize) -> Vec<u32> {
    factors.iter().map(|f| f.codes()[row]).collect()
}

fn labels(factors: &[&Factor], combo: &[u32]) -> Vec<String> {
    factors.iter().zip(combo).map(|(f, &code)| f.levels()[code as usize].clone()).collect()
}

/// Level-code combinations in factor order: those occurring in the data,
/// or the full cross product of declared levels when `drop` is off.
fn combinations(factors: &[&Factor], n_rows: usize, drop: bool) -> Vec<Vec<u32>> {
    if factors.is_empty() {
        return vec![Vec::new()];
    }
    if drop {
        let seen: BTreeSet<Vec<u32>> = (0..n_rows).map(|row| key(factors, row)).collect();
        return seen.into_iter().collect();
    }
    factors.iter().fold(vec![Vec::new()], |acc, f| {
        acc.iter()
            .flat_map(|prefix| {
                (0..f.levels().len() as u32).map(move |code| {
                    let mut next = prefix.clone();
                    next.push(code);
                    next
                })
            })
            .collect()
    })
}

fn members(factors: &[&Factor], n_rows: usize) -> BTreeMap<Vec<u32>, Vec<usize>> {
    let mut groups: BTreeMap<Vec<u32>, Vec<usize>> = BTreeMap::new();
    for row in 0..n_rows {
        groups.entry(key(factors, row)).or_default().push(row);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new()
            .with_categorical_levels(
                "rank",
                &["Prof", "AsstProf", "Prof", "AssocProf"],
                &["AsstProf", "AssocProf", "Prof"],
            )
            .unwrap()
            .with_categorical("sex", &["Male", "Female", "Male", "Male"])
            .unwrap()
            .with_numeric("salary", vec![120.0, 80.0, 130.0, 95.0])
            .unwrap()
    }

    #[test]
    fn test_wrap_dims_defaults() {
        assert_eq!(wrap_dims(1, None, None), (1, 1));
        assert_eq!(wrap_dims(3, None, None), (1, 3));
        assert_eq!(wrap_dims(4, None, None), (2, 2));
        assert_eq!(wrap_dims(5, None, None), (2, 3));
        assert_eq!(wrap_dims(9, None, None), (3, 3));
        assert_eq!(wrap_dims(12, None, None), (3, 4));
        assert_eq!(wrap_dims(13, None, None), (4, 4));
        assert_eq!(wrap_dims(17, None, None), (4, 5));
    }

    #[test]
    fn test_wrap_dims_fixed() {
        assert_eq!(wrap_dims(3, Some(1), None), (3, 1));
        assert_eq!(wrap_dims(7, None, Some(2)), (2, 4));
        assert_eq!(wrap_dims(5, Some(2), Some(9)), (3, 2));
    }

    #[test]
    fn test_wrap_one_panel_per_level_in_level_order() {
        let layout = Facet::wrap(&["rank"]).ncol(1).layout(&frame()).unwrap();
        assert_eq!((layout.nrow, layout.ncol), (3, 1));
        let strips: Vec<String> = layout.panels.iter().map(Panel::label).collect();
        assert_eq!(strips, vec!["AsstProf", "AssocProf", "Prof"]);
        assert_eq!(layout.panels[2].rows, vec![0, 2]);
    }

    #[test]
    fn test_wrap_drop_false_keeps_empty_combinations() {
        let df = frame();
        assert_eq!(Facet::wrap(&["rank", "sex"]).layout(&df).unwrap().panels.len(), 3);
        let all = Facet::wrap(&["rank", "sex"]).drop(false).layout(&df).unwrap();
        assert_eq!(all.panels.len(), 6);
        assert_eq!(all.panels[0].label(), "AsstProf, Female");
        assert!(all.panels.iter().any(|p| p.rows.is_empty()));
    }

    #[test]
    fn test_grid_cross_product() {
        let layout = Facet::grid(&["sex"], &["rank"]).layout(&frame()).unwrap();
        assert_eq!((layout.nrow, layout.ncol), (2, 3));
        assert_eq!(layout.panels.len(), 6);
        let total: usize = layout.panels.iter().map(|p| p.rows.len()).sum();
        assert_eq!(total, 4);
        let p = layout.at(1, 2).unwrap();
        assert_eq!(p.row_keys, vec!["Male"]);
        assert_eq!(p.col_keys, vec!["Prof"]);
        let facet = Facet::grid(&["sex"], &["rank"]);
        assert_eq!(facet.panel_keys(p), vec![("sex", "Male"), ("rank", "Prof")]);
    }

    #[test]
    fn test_grid_one_sided() {
        let layout = Facet::grid(&[], &["rank", "sex"]).layout(&frame()).unwrap();
        assert_eq!(layout.nrow, 1);
        assert_eq!(layout.ncol, 3);
        assert!(layout.panels.iter().all(|p| p.row_keys.is_empty()));
    }

    #[test]
    fn test_is_bottom_with_incomplete_last_row() {
        let df = DataFrame::new().with_categorical("g", &["a", "b", "c", "d", "e"]).unwrap();
        let layout = Facet::wrap(&["g"]).layout(&df).unwrap();
        assert_eq!((layout.nrow, layout.ncol), (2, 3));
        let third = &layout.panels[2];
        assert_eq!((third.row, third.col), (0, 2));
        assert!(layout.is_bottom(third));
        assert!(!layout.is_bottom(&layout.panels[0]));
    }

    #[test]
    fn test_facet_errors() {
        let df = frame();
        assert!(matches!(Facet::wrap(&["nope"]).layout(&df), Err(Error::UnknownColumn(_))));
        assert!(matches!(Facet::wrap(&["salary"]).layout(&df), Err(Error::ColumnType { .. })));
        let empty = df.filter("salary", |_| false).unwrap();
        assert!(matches!(Facet::wrap(&["rank"]).layout(&empty), Err(Error::EmptyData)));
    }

    #[test]
    fn test_no_facet_single_panel() {
        let layout = Facet::none().layout(&frame()).unwrap();
        assert_eq!(layout.panels.len(), 1);
        assert_eq!(layout.panels[0].rows.len(), 4);
    }

    #[test]
    fn test_scale_modes() {
        assert!(FacetScales::Free.free_x() && FacetScales::Free.free_y());
        assert!(!FacetScales::FreeY.free_x());
        let facet = Facet::wrap(&["g"]).scales(FacetScales::FreeY);
        assert_eq!(facet.facet_scales(), FacetScales::FreeY);
    }
}
