//! Columnar data frame with numeric and categorical columns.

use std::collections::BTreeSet;

use crate::error::{Error, Result};

/// A categorical column: per-row codes into an ordered list of levels.
///
/// Level order is the factor order used by grouping, legends and facets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    levels: Vec<String>,
    codes: Vec<u32>,
}

impl Factor {
    /// Build a factor whose levels are the sorted distinct values.
    #[must_use]
    pub fn new<S: AsRef<str>>(values: &[S]) -> Self {
        let levels: Vec<String> = values
            .iter()
            .map(|v| v.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let codes = values
            .iter()
            .map(|v| levels.iter().position(|l| l == v.as_ref()).unwrap_or_default() as u32)
            .collect();
        Self { levels, codes }
    }

    /// Build a factor with an explicit level order.
    ///
    /// Levels that never occur are kept; values outside `levels` are an error.
    pub fn with_levels<S: AsRef<str>, L: AsRef<str>>(
        column: &str,
        values: &[S],
        levels: &[L],
    ) -> Result<Self> {
        let levels: Vec<String> = levels.iter().map(|l| l.as_ref().to_string()).collect();
        let codes = values
            .iter()
            .map(|v| {
                let code = levels.iter().position(|l| l == v.as_ref()).map(|i| i as u32);
                code.ok_or_else(|| Error::UnknownLevel {
                    column: column.to_string(),
                    level: v.as_ref().to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { levels, codes })
    }

    /// Declared levels, in factor order.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Per-row level codes.
    #[must_use]
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Label of a row.
    #[must_use]
    pub fn label(&self, row: usize) -> &str {
        &self.levels[self.codes[row] as usize]
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True when the factor has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes that occur at least once, ascending.
    #[must_use]
    pub fn present_codes(&self) -> Vec<u32> {
        self.codes.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Levels that occur at least once, in factor order.
    #[must_use]
    pub fn present_levels(&self) -> Vec<String> {
        self.present_codes().into_iter().map(|c| self.levels[c as usize].clone()).collect()
    }

    fn take(&self, rows: &[usize]) -> Self {
        Self { levels: self.levels.clone(), codes: rows.iter().map(|&r| self.codes[r]).collect() }
    }
}

/// A single column of a [`DataFrame`].
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Continuous values; missing entries are NaN.
    Numeric(Vec<f32>),
    /// Discrete values with ordered levels.
    Categorical(Factor),
}

impl Column {
    /// Number of rows in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(f) => f.len(),
        }
    }

    /// True when the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Categorical(_) => "categorical",
        }
    }

    fn take(&self, rows: &[usize]) -> Self {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&r| v[r]).collect()),
            Column::Categorical(f) => Column::Categorical(f.take(rows)),
        }
    }
}

/// An immutable, column-ordered table.
///
/// Builders consume `self` and return a new frame, so a loaded dataset is
/// never modified in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataFrame {
    /// Create a new empty data frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the frame already has columns
    /// and `column` has a different length.
    pub fn with_column(mut self, name: &str, column: Column) -> Result<Self> {
        let replacing = self.names.iter().position(|n| n == name);
        let others = self.columns.len() - usize::from(replacing.is_some());
        if others > 0 && column.len() != self.n_rows {
            return Err(Error::DataLengthMismatch { expected: self.n_rows, found: column.len() });
        }
        self.n_rows = column.len();
        match replacing {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name.to_string());
                self.columns.push(column);
            }
        }
        Ok(self)
    }

    /// Add a numeric column.
    pub fn with_numeric(self, name: &str, values: Vec<f32>) -> Result<Self> {
        self.with_column(name, Column::Numeric(values))
    }

    /// Add a categorical column with sorted levels.
    pub fn with_categorical<S: AsRef<str>>(self, name: &str, values: &[S]) -> Result<Self> {
        self.with_column(name, Column::Categorical(Factor::new(values)))
    }

    /// Add a categorical column with an explicit level order.
    pub fn with_categorical_levels<S: AsRef<str>, L: AsRef<str>>(
        self,
        name: &str,
        values: &[S],
        levels: &[L],
    ) -> Result<Self> {
        let factor = Factor::with_levels(name, values, levels)?;
        self.with_column(name, Column::Categorical(factor))
    }

    /// Get number of rows.
    #[must_use]
    pub fn nrow(&self) -> usize {
        self.n_rows
    }

    /// Get number of columns.
    #[must_use]
    pub fn ncol(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    /// Numeric column values.
    pub fn numeric(&self, name: &str) -> Result<&[f32]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            other => Err(Error::ColumnType {
                column: name.to_string(),
                expected: "numeric",
                found: other.kind(),
            }),
        }
    }

    /// Categorical column.
    pub fn factor(&self, name: &str) -> Result<&Factor> {
        match self.column(name)? {
            Column::Categorical(f) => Ok(f),
            other => Err(Error::ColumnType {
                column: name.to_string(),
                expected: "categorical",
                found: other.kind(),
            }),
        }
    }

    /// Levels of a categorical column that occur in the data.
    pub fn distinct_levels(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.factor(name)?.present_levels())
    }

    /// Sub-frame holding the given rows, in the given order.
    #[must_use]
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(rows)).collect(),
            n_rows: rows.len(),
        }
    }

    /// Rows whose categorical `column` equals `level`.
    pub fn filter_eq(&self, column: &str, level: &str) -> Result<Self> {
        let factor = self.factor(column)?;
        let code = factor.levels().iter().position(|l| l == level).ok_or_else(|| {
            Error::UnknownLevel { column: column.to_string(), level: level.to_string() }
        })? as u32;
        let rows: Vec<usize> = factor
            .codes()
            .iter()
            .enumerate()
            .filter_map(|(i, &c)| (c == code).then_some(i))
            .collect();
        Ok(self.take(&rows))
    }

    /// Rows whose numeric `column` satisfies `keep`.
    pub fn filter(&self, column: &str, keep: impl Fn(f32) -> bool) -> Result<Self> {
        let rows: Vec<usize> = self
            .numeric(column)?
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| keep(v).then_some(i))
            .collect();
        Ok(self.take(&rows))
    }

    /// Derive a numeric column from another numeric column.
    pub fn mutate(&self, name: &str, source: &str, f: impl Fn(f32) -> f32) -> Result<Self> {
        let values = self.numeric(source)?.iter().map(|&v| f(v)).collect();
        self.clone().with_numeric(name, values)
    }

    /// Derive a numeric column from two numeric columns, row by row.
    pub fn combine(
        &self,
        name: &str,
        left: &str,
        right: &str,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<Self> {
        let values =
            self.numeric(left)?.iter().zip(self.numeric(right)?).map(|(&a, &b)| f(a, b)).collect();
        self.clone().with_numeric(name, values)
    }

    /// Reorder the levels of a categorical column.
    ///
    /// Every current level must appear in `levels`.
    pub fn relevel<L: AsRef<str>>(&self, column: &str, levels: &[L]) -> Result<Self> {
        let factor = self.factor(column)?;
        let labels: Vec<&str> = (0..factor.len()).map(|r| factor.label(r)).collect();
        self.clone().with_categorical_levels(column, &labels, levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new()
            .with_categorical("rank", &["Prof", "AsstProf", "Prof", "AssocProf"])
            .unwrap()
            .with_numeric("salary", vec![140_000.0, 80_000.0, 120_000.0, 95_000.0])
            .unwrap()
    }

    #[test]
    fn test_dataframe_shape() {
        let df = sample();
        assert_eq!(df.nrow(), 4);
        assert_eq!(df.ncol(), 2);
        assert_eq!(df.column_names(), vec!["rank", "salary"]);
        assert!(df.has_column("rank"));
        assert!(!df.has_column("sex"));
    }

    #[test]
    fn test_factor_levels_sorted() {
        let df = sample();
        let f = df.factor("rank").unwrap();
        assert_eq!(f.levels(), &["AssocProf", "AsstProf", "Prof"]);
        assert_eq!(f.label(0), "Prof");
    }

    #[test]
    fn test_factor_explicit_levels() {
        let levels = ["AsstProf", "AssocProf", "Prof"];
        let f = Factor::with_levels("rank", &["Prof", "AsstProf"], &levels).unwrap();
        assert_eq!(f.codes(), &[2, 0]);
        assert_eq!(f.present_levels(), vec!["AsstProf", "Prof"]);
    }

    #[test]
    fn test_factor_unknown_level() {
        let err = Factor::with_levels("rank", &["Dean"], &["Prof"]).unwrap_err();
        assert!(matches!(err, Error::UnknownLevel { .. }));
    }

    #[test]
    fn test_length_mismatch() {
        let err = sample().with_numeric("short", vec![1.0]).unwrap_err();
        assert!(matches!(err, Error::DataLengthMismatch { expected: 4, found: 1 }));
    }

    #[test]
    fn test_replace_column_keeps_order() {
        let df = sample().with_numeric("salary", vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(df.column_names(), vec!["rank", "salary"]);
        assert_eq!(df.numeric("salary").unwrap(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_unknown_and_wrong_kind() {
        let df = sample();
        assert!(matches!(df.numeric("missing"), Err(Error::UnknownColumn(_))));
        assert!(matches!(df.numeric("rank"), Err(Error::ColumnType { .. })));
        assert!(matches!(df.factor("salary"), Err(Error::ColumnType { .. })));
    }

    #[test]
    fn test_filter_eq() {
        let profs = sample().filter_eq("rank", "Prof").unwrap();
        assert_eq!(profs.nrow(), 2);
        assert_eq!(profs.numeric("salary").unwrap(), &[140_000.0, 120_000.0]);
        // Levels survive filtering
        assert_eq!(profs.factor("rank").unwrap().levels().len(), 3);
        assert_eq!(profs.distinct_levels("rank").unwrap(), vec!["Prof"]);
    }

    #[test]
    fn test_filter_numeric_and_mutate() {
        let df = sample().filter("salary", |s| s >= 95_000.0).unwrap();
        assert_eq!(df.nrow(), 3);
        let df = df.mutate("salary_k", "salary", |s| s / 1000.0).unwrap();
        assert_eq!(df.numeric("salary_k").unwrap(), &[140.0, 120.0, 95.0]);
    }

    #[test]
    fn test_combine() {
        let df = sample()
            .with_numeric("bonus", vec![1.0, 2.0, 3.0, 4.0])
            .unwrap()
            .combine("total", "salary", "bonus", |s, b| s + b)
            .unwrap();
        assert_eq!(df.numeric("total").unwrap()[3], 95_004.0);
    }

    #[test]
    fn test_relevel() {
        let df = sample().relevel("rank", &["AsstProf", "AssocProf", "Prof"]).unwrap();
        let f = df.factor("rank").unwrap();
        assert_eq!(f.levels()[0], "AsstProf");
        assert_eq!(f.label(1), "AsstProf");
        assert!(sample().relevel("rank", &["Prof"]).is_err());
    }

    #[test]
    fn test_empty_frame() {
        let df = DataFrame::new();
        assert_eq!(df.nrow(), 0);
        assert_eq!(df.ncol(), 0);
        assert!(df.column("anything").is_err());
    }
}
