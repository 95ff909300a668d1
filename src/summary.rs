//! Grouped summary statistics.
//!
//! Splits a table by one or more categorical columns and reports, per group,
//! the count, mean, sample standard deviation and standard error of a numeric
//! column. Reductions run on trueno SIMD vectors.

use std::collections::BTreeMap;
use std::fmt;

use trueno::Vector;

use crate::data::DataFrame;
use crate::error::Result;

/// Summary statistics for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Level of each grouping column, in grouping order.
    pub keys: Vec<String>,
    /// Number of rows in the group.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f32,
    /// Sample standard deviation (n - 1 denominator); zero for a single row.
    pub sd: f32,
    /// Standard error `sd / sqrt(n)`; NaN when `n <= 1`.
    pub se: f32,
}

/// Result of [`group_summary`].
#[derive(Debug, Clone)]
pub struct SummaryTable {
    group_by: Vec<String>,
    levels: Vec<Vec<String>>,
    value: String,
    rows: Vec<GroupSummary>,
}

/// Group `frame` by the categorical `group_by` columns and summarize `value`.
///
/// Groups appear in lexicographic order of their factor levels, first
/// grouping column slowest. Only combinations that occur are reported.
///
/// # Errors
///
/// Returns an error if a grouping column is missing or not categorical, or if
/// `value` is missing or not numeric.
pub fn group_summary(frame: &DataFrame, group_by: &[&str], value: &str) -> Result<SummaryTable> {
    let values = frame.numeric(value)?;
    let factors = group_by.iter().map(|g| frame.factor(g)).collect::<Result<Vec<_>>>()?;

    let mut groups: BTreeMap<Vec<u32>, Vec<f32>> = BTreeMap::new();
    for (row, &v) in values.iter().enumerate() {
        let key: Vec<u32> = factors.iter().map(|f| f.codes()[row]).collect();
        groups.entry(key).or_default().push(v);
    }

    let rows = groups
        .into_iter()
        .map(|(key, members)| {
            let keys = key
                .iter()
                .zip(&factors)
                .map(|(&code, f)| f.levels()[code as usize].clone())
                .collect();
            summarize(keys, &members)
        })
        .collect();

    log::debug!("summarized {value} by {group_by:?}");
    Ok(SummaryTable {
        group_by: group_by.iter().map(|g| (*g).to_string()).collect(),
        levels: factors.iter().map(|f| f.levels().to_vec()).collect(),
        value: value.to_string(),
        rows,
    })
}

fn summarize(keys: Vec<String>, values: &[f32]) -> GroupSummary {
    let n = values.len();
    let (mean, sd) = mean_sd(values);
    let se = if n > 1 { sd / (n as f32).sqrt() } else { f32::NAN };
    GroupSummary { keys, n, mean, sd, se }
}

/// Mean and sample standard deviation.
fn mean_sd(values: &[f32]) -> (f32, f32) {
    let n = values.len();
    let mean = Vector::from_slice(values).mean().unwrap_or(f32::NAN);
    if n < 2 {
        return (mean, 0.0);
    }

    // Center before squaring to keep f32 precision on large magnitudes
    let centered = Vector::from_vec(values.iter().map(|v| v - mean).collect());
    let mean_sq = centered
        .mul(&centered)
        .ok()
        .and_then(|sq| sq.mean().ok())
        .unwrap_or(f32::NAN);
    let variance = mean_sq * n as f32 / (n - 1) as f32;
    (mean, variance.max(0.0).sqrt())
}

impl SummaryTable {
    /// Grouping columns.
    #[must_use]
    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    /// Summarized column.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// One entry per group.
    #[must_use]
    pub fn rows(&self) -> &[GroupSummary] {
        &self.rows
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no group was formed (empty input).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of group counts; equals the input row count.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().map(|r| r.n).sum()
    }

    /// Find a group by its key levels.
    #[must_use]
    pub fn get(&self, keys: &[&str]) -> Option<&GroupSummary> {
        self.rows.iter().find(|r| r.keys.iter().map(String::as_str).eq(keys.iter().copied()))
    }

    /// Convert to a plottable frame: grouping columns (with their source
    /// levels) followed by numeric `n`, `mean`, `sd`, `se`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut frame = DataFrame::new();
        for (i, (name, levels)) in self.group_by.iter().zip(&self.levels).enumerate() {
            let labels: Vec<&str> = self.rows.iter().map(|r| r.keys[i].as_str()).collect();
            frame = frame.with_categorical_levels(name, &labels, levels)?;
        }
        frame = frame
            .with_numeric("n", self.rows.iter().map(|r| r.n as f32).collect())?
            .with_numeric("mean", self.rows.iter().map(|r| r.mean).collect())?
            .with_numeric("sd", self.rows.iter().map(|r| r.sd).collect())?
            .with_numeric("se", self.rows.iter().map(|r| r.se).collect())?;
        Ok(frame)
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for g in &self.group_by {
            write!(f, "{g:<12}")?;
        }
        writeln!(f, "{:>6} {:>12} {:>12} {:>12}", "n", "mean", "sd", "se")?;
        for row in &self.rows {
            for k in &row.keys {
                write!(f, "{k:<12}")?;
            }
            writeln!(f, "{:>6} {:>12.1} {:>12.1} {:>12.1}", row.n, row.mean, row.sd, row.se)?;
        }
        Ok(())
    }
}
