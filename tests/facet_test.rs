//! Faceting: panel counts, layout, and shared versus free scales on the
//! bundled datasets.
//!
//! Run: cargo test --test facet_test

#![allow(clippy::unwrap_used)]

use trueno_multivar::data::DataFrame;
use trueno_multivar::datasets;
use trueno_multivar::grammar::{wrap_dims, Aes, Facet, FacetScales, GGPlot, Geom};
use trueno_multivar::Error;

fn salaries() -> DataFrame {
    datasets::load("Salaries").unwrap()
}

fn scatter(data: DataFrame) -> GGPlot {
    GGPlot::new().data(data).aes(Aes::new().x("yrs.since.phd").y("salary")).geom(Geom::point())
}

// ============================================================================
// Panel counts
// ============================================================================

#[test]
fn wrap_makes_one_panel_per_level() {
    let df = salaries();
    for var in ["rank", "discipline", "sex"] {
        let k = df.factor(var).unwrap().present_levels().len();
        let layout = Facet::wrap(&[var]).layout(&df).unwrap();
        assert_eq!(layout.panels.len(), k, "facet by {var}");
        let rows: usize = layout.panels.iter().map(|p| p.rows.len()).sum();
        assert_eq!(rows, 397);
    }
}

#[test]
fn grid_is_cross_product() {
    let layout = Facet::grid(&["sex"], &["rank", "discipline"]).layout(&salaries()).unwrap();
    assert_eq!((layout.nrow, layout.ncol), (2, 6));
    assert_eq!(layout.panels.len(), 12);
    let first = &layout.panels[0];
    assert_eq!(first.row_keys, ["Female"]);
    assert_eq!(first.col_keys, ["AsstProf", "A"]);
}

#[test]
fn wrap_two_variables_drops_empty_combinations() {
    let df = datasets::load("Salaries").unwrap().filter_eq("sex", "Female").unwrap();
    let only_b = df.filter_eq("discipline", "B").unwrap();
    let dropped = Facet::wrap(&["rank", "discipline"]).layout(&only_b).unwrap();
    assert_eq!(dropped.panels.len(), 3);
    let kept = Facet::wrap(&["rank", "discipline"]).drop(false).layout(&only_b).unwrap();
    assert_eq!(kept.panels.len(), 6);
    assert!(kept.panels.iter().any(|p| p.rows.is_empty()));
}

#[test]
fn wrap_ncol_one_stacks_panels() {
    let layout = Facet::wrap(&["rank"]).ncol(1).layout(&salaries()).unwrap();
    assert_eq!((layout.nrow, layout.ncol), (3, 1));
    assert!(layout.panels.iter().all(|p| p.col == 0));
    assert!(layout.is_bottom(&layout.panels[2]));
    assert!(!layout.is_bottom(&layout.panels[0]));
}

#[test]
fn wrap_dims_defaults() {
    assert_eq!(wrap_dims(3, None, None), (1, 3));
    assert_eq!(wrap_dims(4, None, None), (2, 2));
    assert_eq!(wrap_dims(9, None, None), (3, 3));
    assert_eq!(wrap_dims(5, Some(2), None), (3, 2));
}

#[test]
fn numeric_facet_variable_is_an_error() {
    let err = Facet::wrap(&["salary"]).layout(&salaries()).unwrap_err();
    assert!(matches!(err, Error::ColumnType { .. }));
    let err = Facet::grid(&["tenure"], &[]).layout(&salaries()).unwrap_err();
    assert!(matches!(err, Error::UnknownColumn(_)));
}

// ============================================================================
// Scales across panels
// ============================================================================

#[test]
fn fixed_scales_are_shared() {
    let plot = scatter(salaries()).facet(Facet::wrap(&["rank"])).build().unwrap();
    let scenes = plot.scenes();
    assert_eq!(scenes.len(), 3);
    assert!(scenes.windows(2).all(|w| w[0].x == w[1].x && w[0].y == w[1].y));
}

#[test]
fn free_y_scales_follow_panel_data() {
    let plot = scatter(salaries())
        .facet(Facet::wrap(&["rank"]).scales(FacetScales::FreeY))
        .build()
        .unwrap();
    let scenes = plot.scenes();
    assert!(scenes.windows(2).all(|w| w[0].x == w[1].x));
    // assistant professors earn far less than full professors
    assert!(scenes[0].y.range.1 < scenes[2].y.range.1);
}

#[test]
fn marks_land_in_their_panels() {
    let plot = scatter(salaries()).facet(Facet::grid(&["sex"], &["discipline"])).build().unwrap();
    let counts: Vec<usize> = plot.scenes().iter().map(|s| s.marks.len()).collect();
    assert_eq!(counts.iter().sum::<usize>(), 397);
    let layout = plot.panels();
    for (panel, count) in layout.panels.iter().zip(&counts) {
        assert_eq!(panel.rows.len(), *count);
    }
}

#[test]
fn gapminder_asia_by_country() {
    let asia = datasets::load("gapminder").unwrap().filter_eq("continent", "Asia").unwrap();
    let countries = asia.factor("country").unwrap().present_levels().len();
    let plot = GGPlot::new()
        .data(asia)
        .aes(Aes::new().x("year").y("lifeExp"))
        .geom(Geom::line())
        .geom(Geom::point())
        .facet(Facet::wrap(&["country"]))
        .build()
        .unwrap();
    assert_eq!(plot.scenes().len(), countries);
    for scene in plot.scenes() {
        // one line plus twelve yearly points
        assert_eq!(scene.marks.len(), 13);
    }
}
