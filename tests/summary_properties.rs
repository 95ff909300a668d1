//! Grouped summary invariants.
//!
//! Run: cargo test --test summary_properties

#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use proptest::prelude::*;

use trueno_multivar::data::DataFrame;
use trueno_multivar::datasets;
use trueno_multivar::summary::group_summary;
use trueno_multivar::Error;

const SEX: [&str; 2] = ["Female", "Male"];
const DEPT: [&str; 3] = ["A", "B", "C"];

fn frame(rows: &[(usize, usize, f32)]) -> DataFrame {
    let sex: Vec<&str> = rows.iter().map(|r| SEX[r.0]).collect();
    let dept: Vec<&str> = rows.iter().map(|r| DEPT[r.1]).collect();
    DataFrame::new()
        .with_categorical("sex", &sex)
        .unwrap()
        .with_categorical("dept", &dept)
        .unwrap()
        .with_numeric("value", rows.iter().map(|r| r.2).collect())
        .unwrap()
}

fn rows() -> impl Strategy<Value = Vec<(usize, usize, f32)>> {
    prop::collection::vec((0..SEX.len(), 0..DEPT.len(), -1000.0f32..1000.0), 1..120)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_counts_sum_to_rows(rows in rows()) {
        let df = frame(&rows);
        for by in [&["sex"][..], &["dept"][..], &["sex", "dept"][..]] {
            let table = group_summary(&df, by, "value").unwrap();
            prop_assert_eq!(table.total(), rows.len());
            prop_assert!(table.rows().iter().all(|g| g.n >= 1));
        }
    }

    #[test]
    fn prop_standard_error(rows in rows()) {
        let table = group_summary(&frame(&rows), &["sex", "dept"], "value").unwrap();
        for group in table.rows() {
            prop_assert!(group.sd >= 0.0);
            if group.n >= 2 {
                prop_assert!(group.se >= 0.0);
                let expected = group.sd / (group.n as f32).sqrt();
                prop_assert!((group.se - expected).abs() <= 1e-3 * expected.max(1.0));
            } else {
                prop_assert_eq!(group.sd, 0.0);
                prop_assert!(group.se.is_nan());
            }
        }
    }

    #[test]
    fn prop_mean_within_group_range(rows in rows()) {
        let table = group_summary(&frame(&rows), &["sex"], "value").unwrap();
        for group in table.rows() {
            let members: Vec<f32> = rows
                .iter()
                .filter(|r| SEX[r.0] == group.keys[0])
                .map(|r| r.2)
                .collect();
            let lo = members.iter().copied().fold(f32::INFINITY, f32::min);
            let hi = members.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            prop_assert!(group.mean >= lo - 1e-2 && group.mean <= hi + 1e-2);
        }
    }
}

#[test]
fn salaries_by_rank() {
    let df = datasets::load("Salaries").unwrap();
    let table = group_summary(&df, &["rank"], "salary").unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.total(), 397);
    let keys: Vec<&str> = table.rows().iter().map(|g| g.keys[0].as_str()).collect();
    assert_eq!(keys, ["AsstProf", "AssocProf", "Prof"]);
    assert_eq!(table.get(&["Prof"]).unwrap().n, 266);
}

#[test]
fn salaries_by_sex_rank_discipline() {
    let df = datasets::load("Salaries").unwrap();
    let table = group_summary(&df, &["sex", "rank", "discipline"], "salary").unwrap();
    assert!(table.len() <= 12);
    assert_eq!(table.total(), 397);
    assert!(table.rows().iter().all(|g| g.n >= 1));

    let group = table.get(&["Female", "AssocProf", "A"]).unwrap();
    assert_eq!(group.n, 4);
    assert_relative_eq!(group.se, group.sd / 2.0, max_relative = 1e-5);
}

#[test]
fn summary_frame_feeds_error_bars() {
    let df = datasets::load("Salaries").unwrap();
    let frame = group_summary(&df, &["sex", "rank", "discipline"], "salary")
        .unwrap()
        .to_frame()
        .unwrap()
        .combine("lower", "mean", "se", |m, se| m - se)
        .unwrap();
    assert_eq!(frame.factor("rank").unwrap().levels(), &["AsstProf", "AssocProf", "Prof"]);
    let lower = frame.numeric("lower").unwrap();
    let mean = frame.numeric("mean").unwrap();
    assert!(lower.iter().zip(mean).all(|(l, m)| l <= m));
}

#[test]
fn single_member_group_is_not_an_error() {
    let df = frame(&[(0, 0, 5.0), (1, 0, 1.0), (1, 0, 3.0)]);
    let table = group_summary(&df, &["sex"], "value").unwrap();
    let single = table.get(&["Female"]).unwrap();
    assert_eq!(single.n, 1);
    assert_eq!(single.sd, 0.0);
    assert!(single.se.is_nan());
    assert_relative_eq!(table.get(&["Male"]).unwrap().mean, 2.0);
}

#[test]
fn unknown_columns_are_errors() {
    let df = datasets::load("Salaries").unwrap();
    assert!(matches!(group_summary(&df, &["tenure"], "salary"), Err(Error::UnknownColumn(_))));
    assert!(matches!(group_summary(&df, &["rank"], "income"), Err(Error::UnknownColumn(_))));
    assert!(matches!(group_summary(&df, &["salary"], "salary"), Err(Error::ColumnType { .. })));
}
